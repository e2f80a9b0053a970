use thiserror::Error;

#[derive(Error, Debug)]
pub enum AocError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cookie store error: {0}")]
    CookieStoreError(#[from] sqlx::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("No session token found (tried: {})", tried.join(", "))]
    TokenNotFound { tried: Vec<String> },

    #[error("Found {} different session tokens in {source_name}", origins.len())]
    AmbiguousToken {
        source_name: String,
        origins: Vec<String>,
    },

    #[error("Command `{command}` failed: {message}")]
    CaptureError { command: String, message: String },

    #[error("Session token rejected by the server (HTTP {status})")]
    InvalidSession { status: u16 },

    #[error("Puzzle {year} day {day} is not available yet")]
    PuzzleLocked { year: u16, day: u8 },

    #[error("Unexpected HTTP {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("Template error in {path}: {message}")]
    TemplateError { path: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Authentication,
    Network,
    Storage,
    Parsing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AocError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AocError::HttpError(_)
            | AocError::PuzzleLocked { .. }
            | AocError::UnexpectedStatus { .. } => ErrorCategory::Network,
            AocError::IoError(_) | AocError::CookieStoreError(_) => ErrorCategory::Storage,
            AocError::SerializationError(_) | AocError::TemplateError { .. } => {
                ErrorCategory::Parsing
            }
            AocError::ConfigError { .. }
            | AocError::InvalidConfigValueError { .. }
            | AocError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AocError::TokenNotFound { .. }
            | AocError::AmbiguousToken { .. }
            | AocError::CaptureError { .. }
            | AocError::InvalidSession { .. } => ErrorCategory::Authentication,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AocError::HttpError(_)
            | AocError::PuzzleLocked { .. }
            | AocError::UnexpectedStatus { .. } => ErrorSeverity::Medium,
            AocError::IoError(_) | AocError::CookieStoreError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.severity() == ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AocError::HttpError(_) => {
                "Check your network connection and try again later".to_string()
            }
            AocError::IoError(_) => {
                "Check that the repository root exists and is writable".to_string()
            }
            AocError::SerializationError(_) => "Re-run with --verbose and report the puzzle page that failed to serialize".to_string(),
            AocError::CookieStoreError(_) => {
                "Close the browser or pass the token explicitly with --token".to_string()
            }
            AocError::ConfigError { .. } | AocError::InvalidConfigValueError { .. } => {
                "Fix the command line arguments or the config file and run again".to_string()
            }
            AocError::MissingConfigError { field } => {
                format!("Provide '{}' on the command line or in the config file", field)
            }
            AocError::TokenNotFound { .. } => {
                "Log in to adventofcode.com in Firefox, or pass --token / set AOC_SESSION"
                    .to_string()
            }
            AocError::AmbiguousToken { .. } => {
                "Log out of the extra browser profiles or pass --token explicitly".to_string()
            }
            AocError::CaptureError { .. } => {
                "Check that the token command is installed and prints one token per line"
                    .to_string()
            }
            AocError::InvalidSession { .. } => {
                "The session cookie has expired; log in again and refresh the token".to_string()
            }
            AocError::PuzzleLocked { .. } => {
                "Wait until the puzzle unlocks at midnight UTC-5".to_string()
            }
            AocError::UnexpectedStatus { .. } => {
                "The service may be down; try again in a few minutes".to_string()
            }
            AocError::TemplateError { .. } => {
                "Make sure every template file is valid UTF-8".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Authentication => format!("Authentication problem: {}", self),
            ErrorCategory::Network => format!("Could not fetch the puzzle: {}", self),
            ErrorCategory::Storage => format!("Could not access local files: {}", self),
            ErrorCategory::Parsing => format!("Could not process puzzle data: {}", self),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, AocError>;
