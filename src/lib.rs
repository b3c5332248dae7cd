//! Roster: a self-registering test catalog and runner
//!
//! Tests are defined wherever they live and inserted into a [`TestRegistry`] under a suite name, either by
//! an explicit [`TestRegistry::register`] call or at load time with [`declare_test!`]. A caller builds
//! [`RunParams`] and asks the registry to run everything, one suite, or one test. The registry orders the
//! candidates, drives each through configure / execute / cleanup, streams lifecycle events to an
//! [`Outputter`], and returns the ordered [`Results`].
//!
//! ## Outcomes
//!
//! - **Skip**: `configure()` returned `false`. Reported, counted in the run total, never tallied as pass/fail.
//! - **Fail**: `execute()` returned [`Outcome::Fail`] or the test marked its [`TestState`] failed. The run
//!   continues.
//! - **Abort**: `execute()` returned [`Outcome::Abort`], or any of configure / execute / cleanup panicked. The
//!   run halts and the entry point returns [`RosterError::Aborted`] carrying the partial results.
//!
//! ## Panic Policy
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//! - **Test bodies**: a panic inside `configure()`, `execute()` or `cleanup()` is caught by the runner and
//!   turned into an abort.

pub mod cli;
pub mod declare;
pub mod error;
pub mod output;
pub mod params;
pub mod registry;
pub mod result;

#[doc(hidden)]
pub use inventory;

pub use declare::TestDeclaration;
pub use error::{RosterError, RosterResult};
pub use output::{HumanOutputter, OutputKind, Outputter, TapOutputter, make_outputter};
pub use params::{RunFlags, RunParams};
pub use registry::{TestHandle, TestRegistry, global};
pub use result::{Results, TestResult, summary};
pub use test::{FnTest, Outcome, Test, TestState};

/// Run every test in the process-wide registry.
pub fn run_all(params: &RunParams<'_>) -> RosterResult<Results> {
    global().run_all(params)
}

/// Run every test of one suite in the process-wide registry.
pub fn run_suite(suite: &str, params: &RunParams<'_>) -> RosterResult<Results> {
    global().run_suite(suite, params)
}

/// Run a single named test from the process-wide registry.
pub fn run_one(name: &str, params: &RunParams<'_>) -> RosterResult<Results> {
    global().run_one(name, params)
}
