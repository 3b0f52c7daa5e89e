//! The check pipeline
//!
//! A check is a named pass/fail gate over a ref or a commit. Concrete checks
//! implement [`Check`]; [`CheckRunner::check`] is the single place where a
//! check's outcome is both decided and reported, so the policy layer never
//! duplicates reporting.
//!
//! A check tool exiting nonzero is the check's *result*, never an error.
//! Errors coming out of `evaluate` mean infrastructure broke underneath the
//! check (an engine query or tree export failed) and abort the hook.

pub mod format;
pub mod test_run;

pub use format::FormatCheck;
pub use test_run::TestCheck;

use anyhow::Result;

use crate::cli::Output;
use crate::exec::CmdOutput;

/// Outcome of one evaluated check. Captured tool output is retained so a
/// denied push can be diagnosed from the pusher's terminal.
#[derive(Debug)]
pub struct CheckOutcome {
    pub passed: bool,
    pub stdout: String,
    pub stderr: String,
}

impl CheckOutcome {
    /// Vacuous success: nothing to check, no tool was invoked.
    pub fn pass() -> Self {
        CheckOutcome {
            passed: true,
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn from_cmd(output: CmdOutput) -> Self {
        CheckOutcome {
            passed: output.success(),
            stdout: output.stdout,
            stderr: output.stderr,
        }
    }
}

/// A named pass/fail gate.
pub trait Check {
    /// Human-readable label for what is being checked.
    fn describe(&self) -> String;

    /// Evaluate the check. `Err` is reserved for infrastructure failures.
    fn evaluate(&mut self) -> Result<CheckOutcome>;
}

/// Runs checks and reports their outcome.
pub struct CheckRunner<'a> {
    output: &'a Output,
}

impl<'a> CheckRunner<'a> {
    pub fn new(output: &'a Output) -> Self {
        CheckRunner { output }
    }

    /// Print the label, evaluate, print OK/KO, surface captured tool output
    /// on failure. Returns whether the check passed.
    pub fn check(&self, check: &mut dyn Check) -> Result<bool> {
        self.output.check_label(&check.describe());
        let outcome = check.evaluate()?;
        if outcome.passed {
            self.output.check_ok();
        } else {
            self.output.check_ko();
            self.output.check_diagnostics(&outcome.stdout, &outcome.stderr);
        }
        Ok(outcome.passed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Scripted {
        passes: bool,
        evaluations: usize,
    }

    impl Check for Scripted {
        fn describe(&self) -> String {
            "scripted".to_string()
        }
        fn evaluate(&mut self) -> Result<CheckOutcome> {
            self.evaluations += 1;
            Ok(CheckOutcome {
                passed: self.passes,
                stdout: String::new(),
                stderr: "detail".to_string(),
            })
        }
    }

    #[test]
    fn runner_returns_the_outcome_and_evaluates_once() {
        let output = Output::new(false, true);
        let runner = CheckRunner::new(&output);

        let mut passing = Scripted {
            passes: true,
            evaluations: 0,
        };
        assert!(runner.check(&mut passing).unwrap());
        assert_eq!(passing.evaluations, 1);

        let mut failing = Scripted {
            passes: false,
            evaluations: 0,
        };
        assert!(!runner.check(&mut failing).unwrap());
        assert_eq!(failing.evaluations, 1);
    }
}
