//! Test check, once per commit
//!
//! Each commit's test suite runs inside that commit's materialized tree, but
//! build output is redirected (via the configured environment override, e.g.
//! `CARGO_TARGET_DIR`) into the cache's shared build directory. Separating
//! checkout from build output lets dependency artifacts persist across the
//! commits of a push instead of being recompiled per commit.
//!
//! `GIT_QUARANTINE_PATH` is stripped from the child environment: during
//! pre-receive, git quarantines the incoming objects and any git command the
//! test suite happens to run would otherwise fail inside the quarantine.

use anyhow::Result;

use super::{Check, CheckOutcome};
use crate::cache::BuildCache;
use crate::config::TestConfig;
use crate::exec;
use crate::git::Commit;

pub struct TestCheck<'a> {
    commit: &'a mut Commit,
    cache: &'a BuildCache,
    config: &'a TestConfig,
}

impl<'a> TestCheck<'a> {
    pub fn new(commit: &'a mut Commit, cache: &'a BuildCache, config: &'a TestConfig) -> Self {
        TestCheck {
            commit,
            cache,
            config,
        }
    }
}

impl Check for TestCheck<'_> {
    fn describe(&self) -> String {
        self.commit.display()
    }

    fn evaluate(&mut self) -> Result<CheckOutcome> {
        let tree = self.commit.materialize(self.cache)?;
        let build_dir = self.cache.build_dir().to_string_lossy().into_owned();

        let output = exec::run_with_env(
            &self.config.command,
            Some(&tree),
            &[(self.config.build_dir_env.as_str(), build_dir.as_str())],
            &["GIT_QUARANTINE_PATH"],
        )?;
        Ok(CheckOutcome::from_cmd(output))
    }
}
