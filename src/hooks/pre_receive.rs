//! Pre-receive hook: the composition root
//!
//! For every ref whose name matches the configured target: run the format
//! check once against the push's final tree, then run the test check against
//! every commit oldest-first. The first failure anywhere denies the push and
//! stops all further checking. There are no retries; a failing tool is a
//! definitive result. Refs with any other name pass through untouched.

use anyhow::Result;

use super::HookContext;
use crate::cache::BuildCache;
use crate::checks::{CheckRunner, FormatCheck, TestCheck};
use crate::cli::Output;
use crate::git::PushEvent;

/// Read the protocol from stdin and gate the push. `Ok(true)` accepts.
pub fn execute(context: &HookContext, output: &Output) -> Result<bool> {
    output.step("Entering pre-receive hook");
    let event = PushEvent::from_stdin()?;
    let accepted = run(context, event, output)?;
    if accepted {
        output.success("Pre-receive hook success");
    }
    Ok(accepted)
}

/// Run the check pipeline over an already-parsed push event.
pub fn run(context: &HookContext, mut event: PushEvent, output: &Output) -> Result<bool> {
    let config = &context.config;
    let cache = BuildCache::create(&config.cache_root(&context.git_dir))?;
    let runner = CheckRunner::new(output);

    for reference in &mut event.refs {
        if reference.name != config.target_ref {
            output.verbose(&format!("skipping {} (not the target ref)", reference.name));
            continue;
        }

        output.step(&format!("  Running checks on {}", reference.name));

        // Format first: one batched run over the push's final state. A
        // failure here makes per-commit testing pointless.
        output.item(&config.format.command);
        let mut format = FormatCheck::new(reference, &cache, &config.format);
        if !runner.check(&mut format)? {
            output.error("format check failed");
            return Ok(false);
        }

        // Tests oldest-first; each run warms the shared build cache for the
        // next one, and the first failure stops everything.
        output.item(&config.test.command);
        for commit in &mut reference.commits {
            let label = commit.display();
            let mut test = TestCheck::new(commit, &cache, &config.test);
            if !runner.check(&mut test)? {
                output.error(&format!("tests failed on commit {label}"));
                return Ok(false);
            }
        }
    }

    Ok(true)
}
