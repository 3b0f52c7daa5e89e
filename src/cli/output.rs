//! Output handling for the hook
//!
//! Everything goes to stderr: during a push, stderr is the stream
//! git-receive-pack forwards to the remote pusher's terminal, and it is the
//! only place a denial can be explained. Styling degrades to plain text when
//! stderr is not a terminal.

use console::style;

/// Output handler for consistent hook reporting.
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    /// Create a new output handler
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("✔").green().for_stderr(), message);
        }
    }

    /// Print an error message. Errors are always shown, even in quiet mode.
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red().for_stderr(), message);
    }

    /// Print a verbose message (only if verbose mode is enabled)
    pub fn verbose(&self, message: &str) {
        if self.verbose {
            eprintln!("{}", style(message).dim().for_stderr());
        }
    }

    /// Print a phase header, magenta like the rest of the hook chatter.
    pub fn step(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", style(message).magenta().for_stderr());
        }
    }

    /// Print an indented pipeline item (e.g. the command a check will run).
    pub fn item(&self, message: &str) {
        if !self.quiet {
            eprintln!("    {message}");
        }
    }

    /// Print the label of the check about to run.
    pub fn check_label(&self, label: &str) {
        if !self.quiet {
            eprintln!("      {label}");
        }
    }

    pub fn check_ok(&self) {
        if !self.quiet {
            eprintln!("        {}", style("OK").green().for_stderr());
        }
    }

    /// KO is always shown; a denial must be explainable.
    pub fn check_ko(&self) {
        eprintln!("        {}", style("KO").red().for_stderr());
    }

    /// Surface a failed check's captured tool output, indented under the KO.
    pub fn check_diagnostics(&self, stdout: &str, stderr: &str) {
        for line in stdout.lines().chain(stderr.lines()) {
            eprintln!("        {}", style(line).dim().for_stderr());
        }
    }
}
