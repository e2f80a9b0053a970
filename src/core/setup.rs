use crate::core::session::PuzzleSession;
use crate::core::skeleton::{SkeletonTemplate, TemplateVars};
use crate::domain::model::{Example, PuzzleData};
use crate::domain::ports::{ConfigProvider, PuzzleProvider, Storage, TokenSource};
use crate::utils::error::Result;
use std::path::{Path, PathBuf};

const INPUT_PREVIEW_LINES: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct SetupReport {
    pub title: Option<String>,
    pub examples: usize,
    /// Answers the site already accepted for this puzzle.
    pub answers: Vec<String>,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    /// Files a dry run would have written.
    pub planned: Vec<PathBuf>,
}

pub struct SetupEngine<T, P, S, C>
where
    T: TokenSource,
    P: PuzzleProvider,
    S: Storage,
    C: ConfigProvider,
{
    session: PuzzleSession<T, P>,
    storage: S,
    config: C,
    template: Option<SkeletonTemplate>,
}

impl<T, P, S, C> SetupEngine<T, P, S, C>
where
    T: TokenSource,
    P: PuzzleProvider,
    S: Storage,
    C: ConfigProvider,
{
    pub fn new(session: PuzzleSession<T, P>, storage: S, config: C) -> Self {
        Self {
            session,
            storage,
            config,
            template: None,
        }
    }

    pub fn with_template(mut self, template: Option<SkeletonTemplate>) -> Self {
        self.template = template;
        self
    }

    pub async fn run(&mut self) -> Result<SetupReport> {
        let puzzle = self.config.puzzle();
        let day_dir = self.config.day_dir();
        let data_dir = day_dir.join("data");
        let mut report = SetupReport::default();

        tracing::info!("----- Searching for AOC session -----");
        self.session.session_token(false).await?;

        report.title = self.session.title().await?;
        tracing::info!(
            "----- Found AOC year {}, day {}{} -----",
            puzzle.year,
            puzzle.day,
            report
                .title
                .as_deref()
                .map(|t| format!(": {}", t))
                .unwrap_or_default()
        );
        report.answers = self.session.submitted_answers().await?;
        for (part, answer) in ["a", "b"].iter().zip(&report.answers) {
            tracing::info!("Already solved part {}: {}", part, answer);
        }

        let input_path = data_dir.join("input.txt");
        let input = self.load_input(&input_path, &mut report).await?;
        let data = PuzzleData {
            input,
            examples: self.session.examples().await?,
        };
        report.examples = data.examples.len();

        log_examples(&data.examples)?;
        log_input(&data.input);

        self.write_examples(&data_dir, &data.examples, &mut report)
            .await?;
        self.write_skeleton(&day_dir, report.title.clone(), &mut report)
            .await?;

        tracing::info!(
            "----- Done: {} written, {} skipped{} -----",
            report.written.len(),
            report.skipped.len(),
            if self.config.dry_run() {
                format!(", {} planned (dry run)", report.planned.len())
            } else {
                String::new()
            }
        );
        Ok(report)
    }

    /// A previously downloaded input is reused unless `force` is set.
    async fn load_input(&mut self, path: &Path, report: &mut SetupReport) -> Result<String> {
        if !self.config.force() && self.storage.exists(path).await {
            tracing::info!("Reusing cached input {}", path.display());
            let bytes = self.storage.read_file(path).await?;
            report.skipped.push(path.to_path_buf());
            return Ok(String::from_utf8_lossy(&bytes).into_owned());
        }

        let input = self.session.input().await?;
        self.put(path, input.as_bytes(), report).await?;
        Ok(input)
    }

    async fn write_examples(
        &self,
        data_dir: &Path,
        examples: &[Example],
        report: &mut SetupReport,
    ) -> Result<()> {
        if examples.is_empty() {
            tracing::warn!("No examples found on the puzzle page");
            return Ok(());
        }

        for (i, example) in examples.iter().enumerate() {
            let name = if i == 0 {
                "example.txt".to_string()
            } else {
                format!("example_{}.txt", i + 1)
            };
            self.put(&data_dir.join(name), example.input_data.as_bytes(), report)
                .await?;
        }

        let json = serde_json::to_string_pretty(examples)?;
        self.put(&data_dir.join("examples.json"), json.as_bytes(), report)
            .await
    }

    async fn write_skeleton(
        &self,
        day_dir: &Path,
        title: Option<String>,
        report: &mut SetupReport,
    ) -> Result<()> {
        if self.config.skip_skeleton() {
            tracing::debug!("Skeleton rendering disabled");
            return Ok(());
        }
        let Some(template) = &self.template else {
            tracing::warn!(
                "Template directory {} not found, skipping skeleton",
                self.config.template_dir().display()
            );
            return Ok(());
        };

        let vars = TemplateVars::for_puzzle(
            self.config.puzzle(),
            title.as_deref(),
            self.config.src_dir(),
            self.config.lib_dir(),
            day_dir,
        );
        for file in template.render(&vars)? {
            self.put(&day_dir.join(&file.relative), file.contents.as_bytes(), report)
                .await?;
        }
        Ok(())
    }

    async fn put(&self, path: &Path, data: &[u8], report: &mut SetupReport) -> Result<()> {
        if !self.config.force() && self.storage.exists(path).await {
            tracing::info!("Keeping existing {}", path.display());
            report.skipped.push(path.to_path_buf());
            return Ok(());
        }
        if self.config.dry_run() {
            tracing::info!("Would write {} ({} bytes)", path.display(), data.len());
            report.planned.push(path.to_path_buf());
            return Ok(());
        }

        self.storage.write_file(path, data).await?;
        tracing::info!("Wrote {}", path.display());
        report.written.push(path.to_path_buf());
        Ok(())
    }
}

fn log_examples(examples: &[Example]) -> Result<()> {
    tracing::info!("Examples:\n{}", serde_json::to_string_pretty(examples)?);
    Ok(())
}

fn log_input(input: &str) {
    let lines: Vec<&str> = input.lines().collect();
    if lines.len() <= INPUT_PREVIEW_LINES {
        tracing::info!("Input:\n{}", input.trim_end());
    } else {
        tracing::info!(
            "Input ({} lines):\n{}\n...",
            lines.len(),
            lines[..INPUT_PREVIEW_LINES].join("\n")
        );
        tracing::debug!("Full input:\n{}", input);
    }
}
