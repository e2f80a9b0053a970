pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{AocClient, LocalStorage};
pub use config::{CliConfig, FileConfig, Settings};
pub use core::{session::PuzzleSession, setup::SetupEngine, setup::SetupReport};
pub use utils::error::{AocError, Result};
