pub mod capture;
pub mod examples;
pub mod session;
pub mod setup;
pub mod skeleton;

pub use crate::domain::model::{Example, PuzzleId, PuzzlePage, SessionToken};
pub use crate::domain::ports::{ConfigProvider, PuzzleProvider, Storage, TokenSource};
pub use crate::utils::error::Result;
