//! Hook implementations

pub mod pre_receive;

use std::path::PathBuf;

use crate::config::HookConfig;

/// Everything a hook needs at composition time, resolved before any
/// protocol input is read.
pub struct HookContext {
    pub config: HookConfig,
    pub git_dir: PathBuf,
}
