// Adapters layer: concrete implementations for external systems
// (puzzle site over HTTP, browser cookie stores, token sources, local files).

pub mod firefox;
pub mod http;
pub mod storage;
pub mod token;

pub use firefox::FirefoxCookieSource;
pub use http::AocClient;
pub use storage::LocalStorage;
pub use token::{CommandTokenSource, StaticTokenSource, TokenChain, TokenFileSource};
