use aoc_setup::core::skeleton::SkeletonTemplate;
use aoc_setup::utils::logger;
use aoc_setup::{
    AocClient, AocError, CliConfig, FileConfig, LocalStorage, PuzzleSession, SetupEngine,
    SetupReport, Settings,
};
use clap::Parser;

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    match run(cli).await {
        Ok(report) => {
            for line in report_lines(&report) {
                println!("{}", line);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Setup failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            if e.is_retryable() {
                eprintln!("🔁 This may succeed if you run it again later");
            }

            let exit_code = e.exit_code();
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }
}

fn report_lines(report: &SetupReport) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(title) = &report.title {
        lines.push(format!("✅ {}", title));
    }
    for path in &report.written {
        lines.push(format!("📁 {}", path.display()));
    }
    for path in &report.planned {
        lines.push(format!("📝 would write {}", path.display()));
    }
    lines
}

async fn run(cli: CliConfig) -> Result<SetupReport, AocError> {
    let file = FileConfig::discover(cli.config.as_deref(), &cli.repo_root)?;
    let settings = Settings::resolve(&cli, file, chrono::Utc::now())?;

    tracing::info!("----- Setting up advent of code skeleton -----");
    for (name, value) in settings.summary() {
        tracing::info!("{}: {}", name, value);
    }

    let tokens = settings.token_chain()?;
    let client = AocClient::new(&settings.base_url, &settings.user_agent, settings.timeout)?;
    let session = PuzzleSession::new(settings.puzzle, tokens, client);

    let template = if settings.skip_skeleton {
        None
    } else {
        SkeletonTemplate::load(&settings.repo_root.join(&settings.template_dir))?
    };
    let storage = LocalStorage::new(settings.repo_root.clone());

    let mut engine = SetupEngine::new(session, storage, settings).with_template(template);
    engine.run().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_report_lines_list_planned_files() {
        let report = SetupReport {
            title: Some("Camp Cleanup".to_string()),
            planned: vec![PathBuf::from("src/2022/04/data/input.txt")],
            ..SetupReport::default()
        };

        assert_eq!(
            report_lines(&report),
            vec![
                "✅ Camp Cleanup".to_string(),
                "📝 would write src/2022/04/data/input.txt".to_string(),
            ]
        );
    }
}
