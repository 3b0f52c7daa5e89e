//! # Pushgate: server-side push gating for git
//!
//! A pre-receive hook that reconstructs the commits a push introduces and
//! gates the whole push behind a check pipeline: format verification once
//! per ref, test execution once per commit, oldest first. Any failure denies
//! every ref update in the push.
//!
//! ## Quick start
//!
//! ```bash
//! # on the server, in the bare repository
//! cargo install pushgate
//! ln -s $(which pushgate) hooks/pre-receive
//! ```
//!
//! Configuration lives in `hooks/pushgate.toml` (see `default-config.toml`
//! for the built-in defaults) or `PUSHGATE_*` environment variables.

pub mod cache;
pub mod checks;
pub mod cli;
pub mod config;
pub mod exec;
pub mod git;
pub mod hooks;

pub use cli::{Cli, Output};
pub use config::HookConfig;

/// Result type alias for pushgate operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
