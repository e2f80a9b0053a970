pub mod file;
pub mod settings;

use clap::Parser;
use std::path::PathBuf;

pub use file::FileConfig;
pub use settings::Settings;

#[derive(Debug, Clone, Parser)]
#[command(name = "aoc-setup")]
#[command(about = "Fetch Advent of Code puzzle input and examples and set up a day skeleton")]
pub struct CliConfig {
    /// Puzzle year
    #[arg(short, long, value_parser = clap::value_parser!(u16).range(2015..))]
    pub year: u16,

    /// Puzzle day
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=25))]
    pub day: u8,

    /// Repository root; every other path is relative to it
    #[arg(short, long)]
    pub repo_root: PathBuf,

    /// Source directory [default: src]
    #[arg(short, long)]
    pub src_dir: Option<PathBuf>,

    /// Shared library directory [default: src/lib]
    #[arg(short, long)]
    pub lib_dir: Option<PathBuf>,

    /// Day template directory [default: tools/templates/day]
    #[arg(short, long)]
    pub template_dir: Option<PathBuf>,

    /// Session token (value of the `session` cookie)
    #[arg(long, env = "AOC_SESSION", hide_env_values = true)]
    pub token: Option<String>,

    /// Command that prints session tokens, one per line (e.g. "aocd-token")
    #[arg(long)]
    pub token_command: Option<String>,

    /// Token file [default: ~/.config/aocd/token]
    #[arg(long)]
    pub token_file: Option<PathBuf>,

    /// Do not look for the session cookie in browser profiles
    #[arg(long)]
    pub no_browser: bool,

    /// TOML config file [default: <repo-root>/.aoc-setup.toml if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Base URL of the puzzle site
    #[arg(long)]
    pub base_url: Option<String>,

    /// Timeout in seconds for HTTP requests and the token command
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Overwrite existing files and fetch the input again
    #[arg(long)]
    pub force: bool,

    /// Fetch and log everything without writing files
    #[arg(long)]
    pub dry_run: bool,

    /// Do not render the day template
    #[arg(long)]
    pub skip_skeleton: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_arguments() {
        let cli = CliConfig::try_parse_from(["aoc-setup", "-y", "2022", "-d", "1", "-r", "."]).unwrap();
        assert_eq!(cli.year, 2022);
        assert_eq!(cli.day, 1);
        assert_eq!(cli.repo_root, PathBuf::from("."));
        assert!(cli.src_dir.is_none());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_year_and_day_are_range_checked() {
        assert!(CliConfig::try_parse_from(["aoc-setup", "-y", "2014", "-d", "1", "-r", "."]).is_err());
        assert!(CliConfig::try_parse_from(["aoc-setup", "-y", "2020", "-d", "0", "-r", "."]).is_err());
        assert!(CliConfig::try_parse_from(["aoc-setup", "-y", "2020", "-d", "26", "-r", "."]).is_err());
    }

    #[test]
    fn test_repo_root_is_required() {
        assert!(CliConfig::try_parse_from(["aoc-setup", "-y", "2020", "-d", "1"]).is_err());
    }
}
