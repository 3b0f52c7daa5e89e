//! Layered configuration
//!
//! Defaults are embedded at compile time, then merged with the repository's
//! `hooks/pushgate.toml` (if present) and `PUSHGATE_`-prefixed environment
//! variables, highest priority last. The result is extracted into a typed
//! structure and validated fail-fast before any protocol input is read.

use anyhow::{bail, Context, Result};
use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;
use std::path::{Path, PathBuf};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

const CONFIG_FILE: &str = "pushgate.toml";
const CACHE_DIR: &str = "pushgate-cache";

#[derive(Debug, Clone, Deserialize)]
pub struct HookConfig {
    /// Only refs with exactly this name are checked.
    pub target_ref: String,
    /// Cache root override; defaults to `<git-dir>/hooks/pushgate-cache`.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    pub format: FormatConfig,
    pub test: TestConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormatConfig {
    /// Formatter invocation; the net-changed file list is appended.
    pub command: String,
    /// File extensions the formatter applies to.
    pub extensions: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestConfig {
    /// Test-suite invocation, run from each commit's extracted tree.
    pub command: String,
    /// Environment variable used to point the build output at the shared
    /// cache directory.
    pub build_dir_env: String,
}

impl HookConfig {
    /// Load and validate the merged configuration for one repository.
    pub fn load(git_dir: &Path, custom_config: Option<&Path>) -> Result<Self> {
        let config = Self::merged(git_dir, custom_config)
            .extract::<HookConfig>()
            .context("invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn merged(git_dir: &Path, custom_config: Option<&Path>) -> Figment {
        let file = custom_config
            .map(Path::to_path_buf)
            .unwrap_or_else(|| git_dir.join("hooks").join(CONFIG_FILE));

        Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .merge(Toml::file(file))
            .merge(Env::prefixed("PUSHGATE_").split("__"))
    }

    /// Fail fast on configuration that could only blow up mid-push.
    pub fn validate(&self) -> Result<()> {
        if self.target_ref.is_empty() {
            bail!("target_ref must not be empty");
        }
        for (label, command) in [("format", &self.format.command), ("test", &self.test.command)] {
            let tool = command
                .split_whitespace()
                .next()
                .with_context(|| format!("{label} command must not be empty"))?;
            if which::which(tool).is_err() {
                bail!("{label} tool `{tool}` not found on PATH");
            }
        }
        Ok(())
    }

    /// Where this repository's cache root lives.
    pub fn cache_root(&self, git_dir: &Path) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| git_dir.join("hooks").join(CACHE_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> HookConfig {
        Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG))
            .extract()
            .unwrap()
    }

    #[test]
    fn embedded_defaults_extract_into_typed_config() {
        let config = defaults();
        assert_eq!(config.target_ref, "refs/heads/master");
        assert_eq!(config.format.extensions, vec!["rs".to_string()]);
        assert_eq!(config.test.build_dir_env, "CARGO_TARGET_DIR");
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn repo_file_overrides_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let hooks = tmp.path().join("hooks");
        std::fs::create_dir_all(&hooks).unwrap();
        std::fs::write(
            hooks.join(CONFIG_FILE),
            "target_ref = \"refs/heads/main\"\n[format]\ncommand = \"true\"\nextensions = [\"rs\", \"toml\"]\n",
        )
        .unwrap();

        let config: HookConfig = HookConfig::merged(tmp.path(), None).extract().unwrap();
        assert_eq!(config.target_ref, "refs/heads/main");
        assert_eq!(config.format.command, "true");
        assert_eq!(config.format.extensions.len(), 2);
        // untouched section keeps its defaults
        assert_eq!(config.test.command, "cargo test --release");
    }

    #[test]
    fn validation_rejects_empty_target_ref() {
        let mut config = defaults();
        config.target_ref.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validation_rejects_missing_tools() {
        let mut config = defaults();
        config.format.command = "definitely-not-a-real-binary --check".to_string();
        let err = config.validate().unwrap_err();
        assert!(format!("{err:#}").contains("not found on PATH"));
    }

    #[test]
    fn validation_accepts_tools_on_path() {
        let mut config = defaults();
        config.format.command = "true".to_string();
        config.test.command = "true".to_string();
        config.validate().unwrap();
    }

    #[test]
    fn cache_root_defaults_under_hook_data_area() {
        let config = defaults();
        let root = config.cache_root(Path::new("/srv/repo.git"));
        assert_eq!(root, Path::new("/srv/repo.git/hooks/pushgate-cache"));

        let mut config = defaults();
        config.cache_dir = Some(PathBuf::from("/var/cache/pushgate"));
        assert_eq!(
            config.cache_root(Path::new("/srv/repo.git")),
            Path::new("/var/cache/pushgate")
        );
    }
}
