//! External command execution
//!
//! Everything this hook does to the outside world goes through here: git
//! queries, tree exports, and the check tools themselves. Commands run under
//! `bash` with `set -eufo pipefail` so that a failing stage of a pipe (e.g.
//! `git archive | tar -x`) surfaces as a nonzero exit.
//!
//! Two contracts are exposed on purpose. [`run`] treats a nonzero exit as
//! data: the caller inspects it, which is what checks want since a failing
//! formatter or test suite is a result, not a crash. [`run_or_fail`] treats a
//! nonzero exit as fatal, which is what engine queries want since a broken
//! `git` invocation means the server side is broken.

use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Captured result of one external command.
#[derive(Debug)]
pub struct CmdOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CmdOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run a shell command, capturing output. Never errors on a nonzero exit;
/// errors only if the shell itself cannot be spawned.
pub fn run(command: &str, cwd: Option<&Path>) -> Result<CmdOutput> {
    run_with_env(command, cwd, &[], &[])
}

/// Like [`run`], with per-invocation environment overrides. `set` adds or
/// replaces variables, `remove` strips inherited ones before spawning.
pub fn run_with_env(
    command: &str,
    cwd: Option<&Path>,
    set: &[(&str, &str)],
    remove: &[&str],
) -> Result<CmdOutput> {
    let mut cmd = Command::new("bash");
    cmd.arg("-c").arg(format!("set -eufo pipefail;{command}"));

    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    for (key, value) in set {
        cmd.env(key, value);
    }
    for key in remove {
        cmd.env_remove(key);
    }

    let output = cmd
        .output()
        .with_context(|| format!("failed to spawn `{command}`"))?;

    Ok(CmdOutput {
        // None means the process died from a signal
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Run a shell command and return its stdout; a nonzero exit is a fatal error
/// carrying the command, the exit code, and the captured stderr.
pub fn run_or_fail(command: &str, cwd: Option<&Path>) -> Result<String> {
    let output = run(command, cwd)?;
    if !output.success() {
        bail!(
            "command `{}` failed with exit code {}: {}",
            command,
            output.exit_code,
            output.stderr.trim_end()
        );
    }
    Ok(output.stdout)
}

/// Quote a path or argument for interpolation into a shell command line.
pub fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b'/' | b'+'));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_captures_stdout_and_exit_code() {
        let out = run("echo hello", None).unwrap();
        assert_eq!(out.exit_code, 0);
        assert_eq!(out.stdout, "hello\n");
        assert!(out.success());
    }

    #[test]
    fn run_does_not_error_on_nonzero_exit() {
        let out = run("echo oops >&2; exit 3", None).unwrap();
        assert_eq!(out.exit_code, 3);
        assert_eq!(out.stderr, "oops\n");
        assert!(!out.success());
    }

    #[test]
    fn run_respects_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let out = run("pwd", Some(dir.path())).unwrap();
        assert_eq!(
            out.stdout.trim_end(),
            dir.path().canonicalize().unwrap().to_str().unwrap()
        );
    }

    #[test]
    fn pipefail_surfaces_failing_pipe_stage() {
        let out = run("false | cat", None).unwrap();
        assert!(!out.success());
    }

    #[test]
    fn run_or_fail_reports_command_and_stderr() {
        let err = run_or_fail("echo broken >&2; exit 7", None).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("exit code 7"), "got: {msg}");
        assert!(msg.contains("broken"), "got: {msg}");
    }

    #[test]
    fn run_with_env_sets_and_removes_variables() {
        let out = run_with_env(
            "echo ${MARKER:-unset} ${HOME:-gone}",
            None,
            &[("MARKER", "set")],
            &["HOME"],
        )
        .unwrap();
        assert_eq!(out.stdout, "set gone\n");
    }

    #[test]
    fn shell_quote_passes_plain_paths_through() {
        assert_eq!(shell_quote("src/lib.rs"), "src/lib.rs");
        assert_eq!(shell_quote("a b.rs"), "'a b.rs'");
        assert_eq!(shell_quote("it's.rs"), r"'it'\''s.rs'");
        assert_eq!(shell_quote(""), "''");
    }
}
