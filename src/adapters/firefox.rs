//! Session cookie lookup in Firefox profile cookie stores.
//!
//! Firefox keeps `cookies.sqlite` locked while it runs, so every database is
//! copied (with its WAL, if any) into a scratch directory before being read.

use crate::domain::model::{DiscoveredToken, SessionToken};
use crate::domain::ports::TokenSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{ConnectOptions, Connection};
use std::path::{Path, PathBuf};

pub const DEFAULT_COOKIE_DOMAIN: &str = "adventofcode.com";

const COOKIE_DB: &str = "cookies.sqlite";

pub struct FirefoxCookieSource {
    roots: Vec<PathBuf>,
    domain: String,
}

impl FirefoxCookieSource {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self {
            roots,
            domain: DEFAULT_COOKIE_DOMAIN.to_string(),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    /// Profile directories for regular, snap and flatpak installs on Linux,
    /// plus the macOS and Windows locations.
    pub fn default_roots() -> Vec<PathBuf> {
        let mut roots = Vec::new();
        if let Some(home) = dirs::home_dir() {
            roots.push(home.join(".mozilla").join("firefox"));
            roots.push(home.join("snap/firefox/common/.mozilla/firefox"));
            roots.push(home.join(".var/app/org.mozilla.firefox/.mozilla/firefox"));
        }
        if let Some(config) = dirs::config_dir() {
            roots.push(config.join("Firefox").join("Profiles"));
            roots.push(config.join("Mozilla").join("Firefox").join("Profiles"));
        }
        roots
    }

    fn cookie_databases(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for root in &self.roots {
            let Ok(entries) = std::fs::read_dir(root) else {
                continue;
            };
            for entry in entries.flatten() {
                let db = entry.path().join(COOKIE_DB);
                if db.is_file() {
                    found.push(db);
                }
            }
        }
        found.sort();
        found
    }
}

#[async_trait]
impl TokenSource for FirefoxCookieSource {
    fn name(&self) -> String {
        "firefox profiles".to_string()
    }

    async fn discover(&self) -> Result<Vec<DiscoveredToken>> {
        let mut tokens = Vec::new();

        for db in self.cookie_databases() {
            let profile = db
                .parent()
                .and_then(Path::file_name)
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            match read_session_cookies(&db, &self.domain).await {
                Ok(values) => {
                    tracing::debug!("Profile {} has {} session cookie(s)", profile, values.len());
                    for value in values {
                        match SessionToken::parse(&value) {
                            Ok(token) => tokens.push(DiscoveredToken {
                                token,
                                origin: format!("firefox profile {}", profile),
                            }),
                            Err(e) => tracing::warn!("Ignoring cookie in {}: {}", profile, e),
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!("Skipping cookie store {}: {}", db.display(), e);
                }
            }
        }

        Ok(tokens)
    }
}

async fn read_session_cookies(db: &Path, domain: &str) -> Result<Vec<String>> {
    let scratch = tempfile::TempDir::new()?;
    let copy = scratch.path().join(COOKIE_DB);
    tokio::fs::copy(db, &copy).await?;

    let wal = db.with_file_name(format!("{}-wal", COOKIE_DB));
    if tokio::fs::try_exists(&wal).await.unwrap_or(false) {
        tokio::fs::copy(&wal, scratch.path().join(format!("{}-wal", COOKIE_DB))).await?;
    }

    let mut conn = SqliteConnectOptions::new()
        .filename(&copy)
        .connect()
        .await?;

    let values = sqlx::query_scalar::<_, String>(
        "SELECT value FROM moz_cookies \
         WHERE name = 'session' AND (host = ?1 OR host = ?2) \
         ORDER BY lastAccessed DESC",
    )
    .bind(domain)
    .bind(format!(".{}", domain))
    .fetch_all(&mut conn)
    .await?;

    conn.close().await?;
    Ok(values)
}
