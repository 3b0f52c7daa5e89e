//! Format check, batched once per ref
//!
//! Formatting is a property of the final tree, not of each intermediate
//! commit, so the check runs once against the last commit's materialized
//! tree with every file the push net-changed. Files deleted anywhere in the
//! push are excluded even if modified earlier in it.

use anyhow::{Context, Result};

use super::{Check, CheckOutcome};
use crate::cache::BuildCache;
use crate::config::FormatConfig;
use crate::exec::{self, shell_quote};
use crate::git::Ref;

pub struct FormatCheck<'a> {
    reference: &'a mut Ref,
    cache: &'a BuildCache,
    config: &'a FormatConfig,
}

impl<'a> FormatCheck<'a> {
    pub fn new(reference: &'a mut Ref, cache: &'a BuildCache, config: &'a FormatConfig) -> Self {
        FormatCheck {
            reference,
            cache,
            config,
        }
    }
}

impl Check for FormatCheck<'_> {
    fn describe(&self) -> String {
        match self.reference.commits.last() {
            Some(commit) => commit.display(),
            None => self.reference.name.clone(),
        }
    }

    fn evaluate(&mut self) -> Result<CheckOutcome> {
        let files: Vec<String> = self
            .reference
            .net_changed_files()
            .into_iter()
            .filter(|f| matches_extensions(f, &self.config.extensions))
            .collect();

        // nothing relevant changed: vacuous pass, the tool is never invoked
        if files.is_empty() {
            return Ok(CheckOutcome::pass());
        }

        let last = self
            .reference
            .commits
            .last_mut()
            .context("ref changed files but has no commits")?;
        let tree = last.materialize(self.cache)?;

        let quoted: Vec<String> = files.iter().map(|f| shell_quote(f)).collect();
        let command = format!("{} {}", self.config.command, quoted.join(" "));
        let output = exec::run(&command, Some(&tree))?;
        Ok(CheckOutcome::from_cmd(output))
    }
}

fn matches_extensions(path: &str, extensions: &[String]) -> bool {
    extensions.iter().any(|ext| {
        path.rsplit_once('.')
            .is_some_and(|(_, found)| found == ext)
    })
}
