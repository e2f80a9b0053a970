use crate::adapters::http::{default_user_agent, DEFAULT_BASE_URL};
use crate::adapters::{
    CommandTokenSource, FirefoxCookieSource, StaticTokenSource, TokenChain, TokenFileSource,
};
use crate::config::{CliConfig, FileConfig};
use crate::domain::model::PuzzleId;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AocError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_positive_number, validate_puzzle,
    validate_url, Validate,
};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_SRC_DIR: &str = "src";
pub const DEFAULT_LIB_DIR: &str = "src/lib";
pub const DEFAULT_TEMPLATE_DIR: &str = "tools/templates/day";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Everything one run needs, merged from CLI > environment > config file.
#[derive(Clone)]
pub struct Settings {
    pub puzzle: PuzzleId,
    pub repo_root: PathBuf,
    pub src_dir: PathBuf,
    pub lib_dir: PathBuf,
    pub template_dir: PathBuf,
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    pub token: Option<(String, String)>,
    pub token_command: Option<Vec<String>>,
    pub token_file: Option<PathBuf>,
    pub browser: bool,
    pub firefox_profiles: Vec<PathBuf>,
    pub force: bool,
    pub dry_run: bool,
    pub skip_skeleton: bool,
    now: DateTime<Utc>,
}

impl Settings {
    pub fn resolve(cli: &CliConfig, file: Option<FileConfig>, now: DateTime<Utc>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let token = match (&cli.token, file.token) {
            (Some(token), _) => Some((token.clone(), "--token / AOC_SESSION".to_string())),
            (None, Some(token)) => Some((token, "config file token".to_string())),
            (None, None) => None,
        };

        let token_command = cli
            .token_command
            .as_ref()
            .map(|cmd| cmd.split_whitespace().map(str::to_string).collect())
            .or(file.token_command);

        let settings = Self {
            puzzle: PuzzleId::new(cli.year, cli.day),
            repo_root: cli.repo_root.clone(),
            src_dir: pick(&cli.src_dir, file.src_dir, DEFAULT_SRC_DIR),
            lib_dir: pick(&cli.lib_dir, file.lib_dir, DEFAULT_LIB_DIR),
            template_dir: pick(&cli.template_dir, file.template_dir, DEFAULT_TEMPLATE_DIR),
            base_url: cli
                .base_url
                .clone()
                .or(file.base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            user_agent: file.user_agent.unwrap_or_else(default_user_agent),
            timeout: Duration::from_secs(
                cli.timeout
                    .or(file.timeout_seconds)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
            token,
            token_command,
            token_file: cli.token_file.clone().or(file.token_file),
            browser: !cli.no_browser && file.browser.unwrap_or(true),
            firefox_profiles: file
                .firefox_profiles
                .unwrap_or_else(FirefoxCookieSource::default_roots),
            force: cli.force,
            dry_run: cli.dry_run,
            skip_skeleton: cli.skip_skeleton,
            now,
        };

        settings.validate()?;
        Ok(settings)
    }

    /// An explicit token short-circuits discovery. Otherwise: token
    /// command, token file, then browser profiles.
    pub fn token_chain(&self) -> Result<TokenChain> {
        if let Some((token, origin)) = &self.token {
            return Ok(TokenChain::new().with(StaticTokenSource::new(token.clone(), origin.clone())));
        }

        let mut chain = TokenChain::new();
        if let Some(argv) = &self.token_command {
            chain = chain.with(CommandTokenSource::new(argv, self.timeout)?);
        }
        if let Some(path) = self.token_file.clone().or_else(TokenFileSource::default_path) {
            chain = chain.with(TokenFileSource::new(path));
        }
        if self.browser {
            let mut firefox = FirefoxCookieSource::new(self.firefox_profiles.clone());
            if let Some(domain) = self.cookie_domain() {
                firefox = firefox.with_domain(domain);
            }
            chain = chain.with(firefox);
        }

        if chain.is_empty() {
            return Err(AocError::MissingConfigError {
                field: "token".to_string(),
            });
        }
        Ok(chain)
    }

    /// Host the session cookie is set for, following `base_url`.
    pub fn cookie_domain(&self) -> Option<String> {
        url::Url::parse(&self.base_url)
            .ok()?
            .host_str()
            .map(|host| host.trim_start_matches("www.").to_string())
    }

    /// Name/value pairs for the startup banner. The token is never included.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Year", self.puzzle.year.to_string()),
            ("Day", self.puzzle.day.to_string()),
            ("Repo root", self.repo_root.display().to_string()),
            ("Src dir", self.src_dir.display().to_string()),
            ("Lib dir", self.lib_dir.display().to_string()),
            ("Template dir", self.template_dir.display().to_string()),
            ("Base url", self.base_url.clone()),
            ("Force", self.force.to_string()),
            ("Dry run", self.dry_run.to_string()),
        ]
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("puzzle", &self.puzzle)
            .field("repo_root", &self.repo_root)
            .field("src_dir", &self.src_dir)
            .field("lib_dir", &self.lib_dir)
            .field("template_dir", &self.template_dir)
            .field("base_url", &self.base_url)
            .field("user_agent", &self.user_agent)
            .field("timeout", &self.timeout)
            .field("token", &self.token.as_ref().map(|(_, origin)| format!("<redacted> (from {})", origin)))
            .field("token_command", &self.token_command)
            .field("token_file", &self.token_file)
            .field("browser", &self.browser)
            .field("firefox_profiles", &self.firefox_profiles)
            .field("force", &self.force)
            .field("dry_run", &self.dry_run)
            .field("skip_skeleton", &self.skip_skeleton)
            .finish()
    }
}

fn pick(cli: &Option<PathBuf>, file: Option<PathBuf>, default: &str) -> PathBuf {
    cli.clone().or(file).unwrap_or_else(|| PathBuf::from(default))
}

fn path_str(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_puzzle(self.puzzle.year, self.puzzle.day, self.now)?;
        if !self.puzzle.is_unlocked(self.now) {
            return Err(AocError::PuzzleLocked {
                year: self.puzzle.year,
                day: self.puzzle.day,
            });
        }

        validate_path("repo_root", &path_str(&self.repo_root))?;
        validate_path("src_dir", &path_str(&self.src_dir))?;
        validate_path("lib_dir", &path_str(&self.lib_dir))?;
        validate_path("template_dir", &path_str(&self.template_dir))?;
        if !self.repo_root.is_dir() {
            return Err(AocError::InvalidConfigValueError {
                field: "repo_root".to_string(),
                value: path_str(&self.repo_root),
                reason: "Directory does not exist".to_string(),
            });
        }
        if !self.repo_root.join(&self.lib_dir).is_dir() {
            tracing::warn!("Lib dir {} does not exist yet", self.lib_dir.display());
        }

        validate_url("base_url", &self.base_url)?;
        validate_non_empty_string("user_agent", &self.user_agent)?;
        validate_positive_number("timeout", self.timeout.as_secs(), 1)?;

        if let Some(argv) = &self.token_command {
            if argv.is_empty() {
                return Err(AocError::MissingConfigError {
                    field: "token_command".to_string(),
                });
            }
        }
        Ok(())
    }
}

impl ConfigProvider for Settings {
    fn puzzle(&self) -> PuzzleId {
        self.puzzle
    }

    fn src_dir(&self) -> &Path {
        &self.src_dir
    }

    fn lib_dir(&self) -> &Path {
        &self.lib_dir
    }

    fn template_dir(&self) -> &Path {
        &self.template_dir
    }

    fn force(&self) -> bool {
        self.force
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }

    fn skip_skeleton(&self) -> bool {
        self.skip_skeleton
    }
}
