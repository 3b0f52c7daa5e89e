//! The push event: what git-receive-pack tells us on stdin
//!
//! One line per updated ref, `<old-value> SP <new-value> SP <ref-name>`.
//! Each line resolves into a [`Ref`] holding the full [`Commit`] objects the
//! update introduces, oldest first. The protocol is fixed-format and
//! untrusted at the edges: a malformed line aborts the whole event before
//! any check runs.

use anyhow::{bail, Context, Result};
use std::collections::BTreeSet;
use std::io::{self, BufRead};

use crate::git::commit::{self, Commit};

/// One updated reference and the commits its update introduces.
#[derive(Debug)]
pub struct Ref {
    pub name: String,
    /// Oldest to newest, exactly the revision-range result. Order is
    /// significant: checks run oldest-first and later test runs assume
    /// earlier ones warmed the shared build cache.
    pub commits: Vec<Commit>,
}

impl Ref {
    /// Net changed files over the whole ref: everything updated or added in
    /// any commit, minus everything deleted in any commit. Deletion
    /// dominates: a file modified early and deleted later in the same push
    /// no longer exists in the final tree and must not be checked.
    pub fn net_changed_files(&self) -> BTreeSet<String> {
        let mut files = BTreeSet::new();
        let mut deleted = BTreeSet::new();
        for commit in &self.commits {
            files.extend(commit.updated_files.iter().cloned());
            files.extend(commit.new_files.iter().cloned());
            deleted.extend(commit.deleted_files.iter().cloned());
        }
        files.retain(|f| !deleted.contains(f));
        files
    }
}

/// Everything one pre-receive invocation was asked to gate.
#[derive(Debug, Default)]
pub struct PushEvent {
    /// One entry per input line, in input order.
    pub refs: Vec<Ref>,
}

impl PushEvent {
    pub fn from_stdin() -> Result<Self> {
        Self::from_reader(io::stdin().lock())
    }

    /// Parse the protocol stream and resolve every ref's commits via the
    /// engine. Line order and revision-range order are both preserved.
    pub fn from_reader(reader: impl BufRead) -> Result<Self> {
        let mut event = PushEvent::default();

        for line in reader.lines() {
            let line = line.context("failed to read pre-receive input")?;
            let (old, new, name) = parse_update_line(&line)?;

            let hashes = commit::hashes_between(old, new)?;
            let commits = hashes
                .iter()
                .map(|hash| Commit::from_rev(hash))
                .collect::<Result<Vec<_>>>()?;

            event.refs.push(Ref {
                name: name.to_string(),
                commits,
            });
        }

        Ok(event)
    }
}

fn parse_update_line(line: &str) -> Result<(&str, &str, &str)> {
    let mut fields = line.split_whitespace();
    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(old), Some(new), Some(name), None) => Ok((old, new, name)),
        _ => bail!("malformed pre-receive line (want `<old> <new> <ref-name>`): {line:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_line_splits_into_three_fields() {
        let (old, new, name) = parse_update_line("aaa bbb refs/heads/master").unwrap();
        assert_eq!((old, new, name), ("aaa", "bbb", "refs/heads/master"));

        // any whitespace separates fields
        let (old, new, name) = parse_update_line("aaa\tbbb  refs/heads/dev").unwrap();
        assert_eq!((old, new, name), ("aaa", "bbb", "refs/heads/dev"));
    }

    #[test]
    fn update_line_with_wrong_field_count_is_fatal() {
        assert!(parse_update_line("").is_err());
        assert!(parse_update_line("aaa bbb").is_err());
        assert!(parse_update_line("aaa bbb refs/heads/master extra").is_err());
    }

    #[test]
    fn malformed_line_aborts_the_whole_event() {
        let input = "not-three-fields\n".as_bytes();
        assert!(PushEvent::from_reader(input).is_err());
    }

    #[test]
    fn deletion_dominates_in_net_changed_files() {
        let r = Ref {
            name: "refs/heads/master".to_string(),
            commits: vec![
                Commit::fake("a1", &["src/lib.rs", "doomed.rs"], &["src/new.rs"], &[]),
                Commit::fake("a2", &[], &["later.rs"], &["doomed.rs"]),
            ],
        };
        let files = r.net_changed_files();
        assert!(files.contains("src/lib.rs"));
        assert!(files.contains("src/new.rs"));
        assert!(files.contains("later.rs"));
        assert!(!files.contains("doomed.rs"));
    }

    #[test]
    fn net_changed_files_of_empty_ref_is_empty() {
        let r = Ref {
            name: "refs/heads/master".to_string(),
            commits: Vec::new(),
        };
        assert!(r.net_changed_files().is_empty());
    }
}
