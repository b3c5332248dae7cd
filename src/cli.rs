//! Command-line entry point for test binaries
//!
//! A test binary declares or registers its tests and then hands control to [`run`]:
//!
//! ```ignore
//! fn main() {
//!     roster::cli::run();
//! }
//! ```
//!
//! ## Design
//!
//! Arguments are parsed with clap derive into [`Args`], which maps onto [`RunParams`]. [`execute`] returns a
//! `CliResult<ExitCode>` instead of calling `process::exit`; only [`run`] handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use std::fmt;
use std::io::Write;
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use crate::error::RosterError;
use crate::output::make_outputter;
use crate::params::{RunFlags, RunParams};
use crate::registry::{self, TestRegistry};
use crate::result::summary;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    /// At least one test failed
    pub const FAILURE: ExitCode = ExitCode(1);
    /// The run was aborted
    pub const ABORTED: ExitCode = ExitCode(2);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<RosterError> for CliError {
    fn from(err: RosterError) -> Self {
        let exit_code = match err {
            RosterError::Aborted { .. } => ExitCode::ABORTED,
            RosterError::DuplicateTest { .. } => ExitCode::FAILURE,
        };
        CliError::new(format!("{:?}", miette::Report::new(err)), exit_code)
    }
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Run the tests registered in this binary
#[derive(Parser, Debug, Clone)]
#[command(about = "Run the tests registered in this binary", long_about = None)]
pub struct Args {
    /// Run tests in alphabetical (suite, name) order instead of shuffled
    #[arg(long)]
    pub alpha: bool,

    /// Disable ANSI colors
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Report passing tests too
    #[arg(short, long)]
    pub verbose: bool,

    /// Output format: TAP, or anything else for human-readable
    #[arg(long, value_name = "NAME", default_value = "human")]
    pub output: String,

    /// Shuffle seed (default: derived from the clock and reported)
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Number of cases for property-based tests
    #[arg(long = "num-checks", value_name = "N", default_value_t = RunParams::DEFAULT_PROPERTY_CHECKS)]
    pub num_checks: usize,

    /// Run only this suite
    #[arg(long, value_name = "NAME", conflicts_with = "test")]
    pub suite: Option<String>,

    /// Run only this test
    #[arg(long, value_name = "NAME")]
    pub test: Option<String>,
}

impl Args {
    /// Flags selected by the arguments.
    pub fn flags(&self) -> RunFlags {
        RunFlags::NONE
            .with(RunFlags::COLOR, !self.no_color)
            .with(RunFlags::ALPHA_ORDER, self.alpha)
            .with(RunFlags::QUIET_SUCCESS, !self.verbose)
    }
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Parse the process arguments, run the process-wide registry and exit.
///
/// This is the only place where `process::exit` is called.
pub fn run() -> ! {
    // Default to warn so log lines stay out of the way of TAP consumers
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let args = Args::parse();

    match execute(&args, registry::global(), std::io::stdout()) {
        Ok(exit_code) => process::exit(exit_code.0),
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Run `registry` as described by `args`, reporting to `out`.
pub fn execute<W: Write + 'static>(args: &Args, registry: &TestRegistry, out: W) -> CliResult<ExitCode> {
    if let Some(suite) = &args.suite {
        if !registry.has_suite(suite) {
            return Err(CliError::failure(format!("no suite named `{suite}`")));
        }
    }
    if let Some(test) = &args.test {
        if !registry.has_test(test) {
            return Err(CliError::failure(format!("no test named `{test}`")));
        }
    }

    let flags = args.flags();
    let outputter = make_outputter(&args.output, flags, out);

    let seed = match args.seed {
        Some(seed) => seed,
        None => {
            let seed = clock_seed();
            if !args.alpha {
                outputter.diagnostic(&format!("seed: {seed}"));
            }
            seed
        }
    };

    let params = RunParams::new(outputter.as_ref())
        .with_flags(flags)
        .with_property_checks(args.num_checks)
        .with_seed(seed);

    let results = match (&args.suite, &args.test) {
        (Some(suite), _) => registry.run_suite(suite, &params)?,
        (None, Some(test)) => registry.run_one(test, &params)?,
        (None, None) => registry.run_all(&params)?,
    };

    let (executed, passed) = summary(&results);
    if passed == executed {
        Ok(ExitCode::SUCCESS)
    } else {
        // Results were already reported by the outputter
        Err(CliError::new("", ExitCode::FAILURE))
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

// ============================================================================
// Tests
// ============================================================================
