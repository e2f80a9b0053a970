use crate::core::capture::{capture_stdout, describe};
use crate::domain::model::{DiscoveredToken, SessionToken};
use crate::domain::ports::TokenSource;
use crate::utils::error::{AocError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

/// A token given on the command line, in `AOC_SESSION`, or in the config file.
pub struct StaticTokenSource {
    token: String,
    origin: String,
}

impl StaticTokenSource {
    pub fn new(token: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            origin: origin.into(),
        }
    }
}

#[async_trait]
impl TokenSource for StaticTokenSource {
    fn name(&self) -> String {
        self.origin.clone()
    }

    async fn discover(&self) -> Result<Vec<DiscoveredToken>> {
        Ok(vec![DiscoveredToken {
            token: SessionToken::parse(&self.token)?,
            origin: self.origin.clone(),
        }])
    }
}

/// Plain-text token file, `~/.config/aocd/token` by default.
pub struct TokenFileSource {
    path: PathBuf,
}

impl TokenFileSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config").join("aocd").join("token"))
    }
}

#[async_trait]
impl TokenSource for TokenFileSource {
    fn name(&self) -> String {
        format!("token file {}", self.path.display())
    }

    async fn discover(&self) -> Result<Vec<DiscoveredToken>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No token file at {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            tracing::warn!("Token file {} is empty", self.path.display());
            return Ok(Vec::new());
        }

        Ok(vec![DiscoveredToken {
            token: SessionToken::parse(&contents)?,
            origin: self.name(),
        }])
    }
}

/// Runs a scraper such as `aocd-token` and reads one token per output line.
/// Only the first whitespace-separated field of a line is the token; the
/// rest describes where the scraper found it.
pub struct CommandTokenSource {
    program: String,
    args: Vec<String>,
    timeout: Duration,
}

impl CommandTokenSource {
    pub fn new(argv: &[String], timeout: Duration) -> Result<Self> {
        let (program, args) = argv.split_first().ok_or_else(|| AocError::MissingConfigError {
            field: "token_command".to_string(),
        })?;
        Ok(Self {
            program: program.clone(),
            args: args.to_vec(),
            timeout,
        })
    }
}

#[async_trait]
impl TokenSource for CommandTokenSource {
    fn name(&self) -> String {
        format!("command `{}`", describe(&self.program, &self.args))
    }

    async fn discover(&self) -> Result<Vec<DiscoveredToken>> {
        let captured = capture_stdout(&self.program, &self.args, self.timeout).await?;

        if !captured.success {
            return Err(AocError::CaptureError {
                command: describe(&self.program, &self.args),
                message: if captured.stderr.is_empty() {
                    "exited with a failure status".to_string()
                } else {
                    captured.stderr
                },
            });
        }

        captured
            .lines
            .iter()
            .filter_map(|line| {
                let mut fields = line.split_whitespace();
                let token = fields.next()?;
                let detail = fields.collect::<Vec<_>>().join(" ");
                Some((token.to_string(), detail))
            })
            .map(|(token, detail)| {
                Ok(DiscoveredToken {
                    token: SessionToken::parse(&token)?,
                    origin: if detail.is_empty() {
                        self.name()
                    } else {
                        format!("{} ({})", self.name(), detail)
                    },
                })
            })
            .collect()
    }
}

/// Asks each source in order; the first one that finds anything wins.
#[derive(Default)]
pub struct TokenChain {
    sources: Vec<Box<dyn TokenSource>>,
}

impl TokenChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl TokenSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[async_trait]
impl TokenSource for TokenChain {
    fn name(&self) -> String {
        self.sources
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    async fn discover(&self) -> Result<Vec<DiscoveredToken>> {
        for source in &self.sources {
            tracing::debug!("Looking for a session token in {}", source.name());
            let found = source.discover().await?;
            if !found.is_empty() {
                tracing::debug!("{} yielded {} token(s)", source.name(), found.len());
                return Ok(found);
            }
        }
        Ok(Vec::new())
    }
}

/// Collapses duplicates and insists on exactly one distinct token.
pub async fn resolve_single<T: TokenSource + ?Sized>(source: &T) -> Result<DiscoveredToken> {
    let found = source.discover().await?;

    let mut distinct: Vec<DiscoveredToken> = Vec::new();
    for candidate in found {
        if !distinct.iter().any(|d| d.token == candidate.token) {
            distinct.push(candidate);
        }
    }

    match distinct.len() {
        0 => Err(AocError::TokenNotFound {
            tried: vec![source.name()],
        }),
        1 => Ok(distinct.remove(0)),
        _ => Err(AocError::AmbiguousToken {
            source_name: source.name(),
            origins: distinct.into_iter().map(|d| d.origin).collect(),
        }),
    }
}
