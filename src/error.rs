//! Errors raised by the registry and the run entry points
//!
//! Skips and failures are ordinary outcomes and never show up here. Only conditions that stop an operation
//! outright are errors.

use miette::Diagnostic;
use thiserror::Error;

use crate::result::Results;

#[derive(Debug, Error, Diagnostic)]
pub enum RosterError {
    /// A test with the same (suite, name) is already registered; the first registration stays.
    #[error("test `{name}` is already registered in suite `{suite}`")]
    #[diagnostic(
        code(roster::duplicate_test),
        help("give the test a different name or move it to another suite")
    )]
    DuplicateTest { suite: String, name: String },

    /// A test aborted the run. `partial` holds the results of the tests that finished before it.
    #[error("run aborted by `{test}`: {message}")]
    #[diagnostic(code(roster::aborted), help("results gathered before the abort are partial"))]
    Aborted {
        test: String,
        message: String,
        partial: Results,
    },
}

impl RosterError {
    /// Results that completed before the error, if the error carries any.
    pub fn partial_results(&self) -> Option<&Results> {
        match self {
            RosterError::Aborted { partial, .. } => Some(partial),
            RosterError::DuplicateTest { .. } => None,
        }
    }
}

pub type RosterResult<T> = Result<T, RosterError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::TestResult;

    #[test]
    fn test_duplicate_message() {
        let err = RosterError::DuplicateTest {
            suite: "math".to_string(),
            name: "adds".to_string(),
        };
        assert_eq!(err.to_string(), "test `adds` is already registered in suite `math`");
        assert!(err.partial_results().is_none());
    }

    #[test]
    fn test_aborted_keeps_partial_results() {
        let err = RosterError::Aborted {
            test: "b".to_string(),
            message: "lost connection".to_string(),
            partial: vec![TestResult {
                suite: String::new(),
                name: "a".to_string(),
                success: true,
                message: String::new(),
            }],
        };
        assert_eq!(err.to_string(), "run aborted by `b`: lost connection");
        assert_eq!(err.partial_results().map(Vec::len), Some(1));
    }

    #[test]
    fn test_diagnostic_codes() {
        let err = RosterError::DuplicateTest {
            suite: String::new(),
            name: "t".to_string(),
        };
        assert_eq!(err.code().map(|c| c.to_string()).as_deref(), Some("roster::duplicate_test"));
    }
}
