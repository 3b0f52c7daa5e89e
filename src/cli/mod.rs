//! Command-line interface
//!
//! The binary is installed as `hooks/pre-receive` and normally takes no
//! arguments: git-receive-pack sets `GIT_DIR` and feeds the ref updates on
//! stdin. The flags exist for operators and for testing; they override the
//! merged file/env configuration.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod output;

pub use output::Output;

use crate::config::HookConfig;
use crate::hooks::{self, HookContext};

/// Server-side pre-receive gate: format and test checks on every pushed commit
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Server-side git directory (set by git when the hook runs)
    #[arg(long, env = "GIT_DIR", value_name = "DIR")]
    pub git_dir: PathBuf,

    /// Configuration file path (default: <git-dir>/hooks/pushgate.toml)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Only check refs with this exact name (overrides configuration)
    #[arg(long, value_name = "REF")]
    pub target_ref: Option<String>,

    /// Cache directory for extracted trees and build artifacts (overrides
    /// configuration)
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Enable quiet output (failures only)
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Run the hook against stdin. `Ok(true)` accepts the push, `Ok(false)`
    /// denies it; `Err` is a fatal protocol or infrastructure failure, which
    /// also denies.
    pub fn run(self) -> Result<bool> {
        let output = Output::new(self.verbose, self.quiet);

        let mut config = HookConfig::load(&self.git_dir, self.config.as_deref())?;
        if let Some(target_ref) = self.target_ref {
            config.target_ref = target_ref;
        }
        if let Some(cache_dir) = self.cache_dir {
            config.cache_dir = Some(cache_dir);
        }

        let context = HookContext {
            config,
            git_dir: self.git_dir,
        };
        hooks::pre_receive::execute(&context, &output)
    }
}
