use crate::utils::error::{AocError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = ".aoc-setup.toml";

static ENV_VAR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("regex"));

/// Optional settings read from TOML. Every field can be overridden on the
/// command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub token: Option<String>,
    pub token_command: Option<Vec<String>>,
    pub token_file: Option<PathBuf>,
    pub browser: Option<bool>,
    pub firefox_profiles: Option<Vec<PathBuf>>,
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub src_dir: Option<PathBuf>,
    pub lib_dir: Option<PathBuf>,
    pub template_dir: Option<PathBuf>,
}

impl FileConfig {
    /// Loads the config from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| AocError::ConfigError {
            message: format!("Cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AocError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Explicit `--config` must exist; otherwise the repo-root default is
    /// used only when present.
    pub fn discover(explicit: Option<&Path>, repo_root: &Path) -> Result<Option<Self>> {
        if let Some(path) = explicit {
            tracing::debug!("Loading config from {}", path.display());
            return Self::from_file(path).map(Some);
        }

        let default_path = repo_root.join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            tracing::debug!("Loading config from {}", default_path.display());
            return Self::from_file(default_path).map(Some);
        }

        Ok(None)
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}
