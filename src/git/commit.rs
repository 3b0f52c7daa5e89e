//! One pushed commit: metadata, changed-file sets, and a lazily
//! materialized source tree.

use anyhow::{bail, Context, Result};
use console::style;
use std::path::PathBuf;
use tempfile::TempDir;

use crate::cache::BuildCache;
use crate::exec::{self, shell_quote};

/// Field separator for the single-line metadata query. Chosen to be absent
/// from normal commit text; exactly five fields are expected back.
const METADATA_SEP: &str = "»¦«";

/// A commit being introduced by the push.
///
/// The three file sets are disjoint by construction: the status query reports
/// each path exactly once, and each status code maps to exactly one set.
#[derive(Debug)]
pub struct Commit {
    pub hash: String,
    pub timestamp: String,
    pub short_hash: String,
    pub author: String,
    pub subject: String,
    pub body: String,
    pub updated_files: Vec<String>,
    pub new_files: Vec<String>,
    pub deleted_files: Vec<String>,
    /// Extracted source tree, created at most once. The directory lives
    /// until this handle drops with the owning push event at process end.
    tree: Option<TempDir>,
}

impl Commit {
    /// Resolve a full revision id into a commit via one metadata query and
    /// one changed-path query. Both queries are infrastructure: any failure
    /// is fatal.
    pub fn from_rev(hash: &str) -> Result<Self> {
        let raw = exec::run_or_fail(
            &format!(
                "git log -n1 --pretty=%ai{s}%h{s}%an{s}%s{s}%b {hash}",
                s = METADATA_SEP
            ),
            None,
        )?;
        let (timestamp, short_hash, author, subject, body) = parse_metadata(raw.trim_end())
            .with_context(|| format!("unparseable metadata for commit {hash}"))?;

        let mut commit = Commit {
            hash: hash.to_string(),
            timestamp,
            short_hash,
            author,
            subject,
            body,
            updated_files: Vec::new(),
            new_files: Vec::new(),
            deleted_files: Vec::new(),
            tree: None,
        };

        // --root: without it a parentless commit diffs against nothing and
        // reports no changed paths at all
        let raw = exec::run_or_fail(
            &format!("git diff-tree -z --no-commit-id --name-status -r --root {hash}"),
            None,
        )?;
        for (status, path) in parse_name_status(&raw)? {
            match status {
                "A" => commit.new_files.push(path.to_string()),
                "D" => commit.deleted_files.push(path.to_string()),
                "M" => commit.updated_files.push(path.to_string()),
                other => bail!("unexpected status {other} for file {path} in commit {hash}"),
            }
        }

        Ok(commit)
    }

    /// Extract this commit's full source tree under the cache root, at most
    /// once. Every call, first or later, re-touches the updated and new
    /// files: archive extraction preserves committed timestamps, and a
    /// previous check run may have left build artifacts newer than the
    /// sources, either of which makes incremental build tools skip them.
    pub fn materialize(&mut self, cache: &BuildCache) -> Result<PathBuf> {
        let dir = match &mut self.tree {
            Some(dir) => dir,
            tree @ None => {
                let dir = cache.extraction_dir(&self.hash)?;
                exec::run_or_fail(
                    &format!(
                        "git archive {} | tar -x -C {}",
                        self.hash,
                        shell_quote(&dir.path().to_string_lossy())
                    ),
                    None,
                )?;
                tree.insert(dir)
            }
        };
        let root = dir.path().to_path_buf();

        let changed: Vec<String> = self
            .updated_files
            .iter()
            .chain(&self.new_files)
            .map(|f| shell_quote(f))
            .collect();
        if !changed.is_empty() {
            exec::run_or_fail(&format!("touch -- {}", changed.join(" ")), Some(&root))?;
        }

        Ok(root)
    }

    /// Display string used as a check label: `subject (short hash)`.
    pub fn display(&self) -> String {
        style(format!("{} ({})", self.subject, self.short_hash))
            .yellow()
            .for_stderr()
            .to_string()
    }

    #[cfg(test)]
    pub(crate) fn fake(hash: &str, updated: &[&str], new: &[&str], deleted: &[&str]) -> Self {
        Commit {
            hash: hash.to_string(),
            timestamp: "2026-01-01 00:00:00 +0000".to_string(),
            short_hash: hash.chars().take(7).collect(),
            author: "test".to_string(),
            subject: format!("commit {hash}"),
            body: String::new(),
            updated_files: updated.iter().map(|s| s.to_string()).collect(),
            new_files: new.iter().map(|s| s.to_string()).collect(),
            deleted_files: deleted.iter().map(|s| s.to_string()).collect(),
            tree: None,
        }
    }
}

/// List the revisions a ref update introduces, oldest first.
///
/// An all-zero old value marks ref creation; the range then degenerates to
/// everything reachable from the new tip. An all-zero new value marks ref
/// deletion and introduces nothing. An empty result is valid.
pub fn hashes_between(old: &str, new: &str) -> Result<Vec<String>> {
    if is_zero_id(new) {
        return Ok(Vec::new());
    }
    let range = if is_zero_id(old) {
        new.to_string()
    } else {
        format!("{old}..{new}")
    };
    let out = exec::run_or_fail(
        &format!("git rev-list --reverse --topo-order {range}"),
        None,
    )?;
    Ok(out.lines().map(str::to_string).collect())
}

pub fn is_zero_id(id: &str) -> bool {
    !id.is_empty() && id.bytes().all(|b| b == b'0')
}

fn parse_metadata(line: &str) -> Result<(String, String, String, String, String)> {
    let fields: Vec<&str> = line.split(METADATA_SEP).collect();
    match fields.as_slice() {
        [timestamp, short_hash, author, subject, body] => Ok((
            timestamp.to_string(),
            short_hash.to_string(),
            author.to_string(),
            subject.to_string(),
            body.to_string(),
        )),
        _ => bail!(
            "expected 5 `{METADATA_SEP}`-separated fields, got {}",
            fields.len()
        ),
    }
}

/// Split NUL-delimited `status NUL path NUL ...` output into pairs. An odd
/// number of entries means the output was truncated mid-record.
fn parse_name_status(raw: &str) -> Result<Vec<(&str, &str)>> {
    let raw = raw.trim_end_matches('\0');
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let entries: Vec<&str> = raw.split('\0').collect();
    if entries.len() % 2 != 0 {
        bail!("truncated name-status output: {} entries", entries.len());
    }
    Ok(entries.chunks_exact(2).map(|p| (p[0], p[1])).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_parses_five_fields() {
        let line = "2024-05-01 12:00:00 +0200»¦«abc1234»¦«Ada»¦«fix the thing»¦«longer body";
        let (ts, short, author, subject, body) = parse_metadata(line).unwrap();
        assert_eq!(ts, "2024-05-01 12:00:00 +0200");
        assert_eq!(short, "abc1234");
        assert_eq!(author, "Ada");
        assert_eq!(subject, "fix the thing");
        assert_eq!(body, "longer body");
    }

    #[test]
    fn metadata_tolerates_empty_body_and_multiline_body() {
        let (.., body) = parse_metadata("t»¦«h»¦«a»¦«s»¦«").unwrap();
        assert_eq!(body, "");
        let (.., body) = parse_metadata("t»¦«h»¦«a»¦«s»¦«line1\nline2").unwrap();
        assert_eq!(body, "line1\nline2");
    }

    #[test]
    fn metadata_with_wrong_field_count_is_fatal() {
        assert!(parse_metadata("only»¦«four»¦«fields»¦«here").is_err());
        assert!(parse_metadata("").is_err());
    }

    #[test]
    fn name_status_splits_pairs() {
        let pairs = parse_name_status("A\0src/new.rs\0M\0src/lib.rs\0D\0old.rs\0").unwrap();
        assert_eq!(
            pairs,
            vec![("A", "src/new.rs"), ("M", "src/lib.rs"), ("D", "old.rs")]
        );
    }

    #[test]
    fn name_status_empty_output_means_no_changes() {
        assert!(parse_name_status("").unwrap().is_empty());
        assert!(parse_name_status("\0").unwrap().is_empty());
    }

    #[test]
    fn name_status_odd_entry_count_is_fatal() {
        assert!(parse_name_status("A\0src/new.rs\0M\0").is_err());
    }

    #[test]
    fn zero_id_detection() {
        assert!(is_zero_id("0000000000000000000000000000000000000000"));
        assert!(!is_zero_id("00000000000000000000000000000000000000a0"));
        assert!(!is_zero_id(""));
    }
}
