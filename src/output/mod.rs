//! Reporting strategies for run lifecycle events
//!
//! The runner never formats anything itself. It calls the [`Outputter`] carried by
//! [`RunParams`](crate::RunParams) at each lifecycle point, and the strategy decides what (if anything) to write.
//!
//! ## Strategies
//!
//! - [`HumanOutputter`] - `PASS:` / `FAIL:` lines with optional ANSI color and a closing tally
//! - [`TapOutputter`] - Test Anything Protocol lines for external harnesses
//!
//! Adding a strategy means implementing [`Outputter`]; the run loop does not change.

mod human;
mod tap;

pub use human::HumanOutputter;
pub use tap::TapOutputter;

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Write};

use crate::params::RunFlags;

/// Sink for run lifecycle events.
///
/// Methods take `&self`: the engine treats the strategy as read-only configuration, so any per-run state
/// lives behind interior mutability. The required methods must render to the strategy's destination.
pub trait Outputter {
    /// A run is starting with `total` candidate tests (skips included).
    fn start_run(&self, _total: usize) {}

    /// `configure()` refused to run the test.
    fn skip_test(&self, _name: &str, _reason: &str) {}

    fn start_test(&self, _name: &str) {}

    /// Free-form text attached to the run, such as a failure message.
    fn diagnostic(&self, message: &str);

    fn end_test(&self, name: &str, success: bool);

    /// The run is halting; no further events follow.
    fn abort(&self, message: &str);

    fn end_run(&self, total: usize, successes: usize);
}

/// Which strategy a name selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputKind {
    #[default]
    Human,
    Tap,
}

impl OutputKind {
    /// Map a strategy name to a kind. Unrecognized names select [`OutputKind::Human`].
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("tap") {
            OutputKind::Tap
        } else {
            OutputKind::Human
        }
    }
}

/// Build the strategy named `name` writing to `out`.
///
/// `"TAP"` (any case) selects [`TapOutputter`]; anything else selects [`HumanOutputter`] configured by `flags`.
pub fn make_outputter<W: Write + 'static>(name: &str, flags: RunFlags, out: W) -> Box<dyn Outputter> {
    match OutputKind::from_name(name) {
        OutputKind::Tap => Box::new(TapOutputter::new(out)),
        OutputKind::Human => Box::new(HumanOutputter::new(out, flags)),
    }
}

/// Line-oriented destination shared by the strategies.
struct LineSink<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> LineSink<W> {
    fn new(out: W) -> Self {
        Self { out: RefCell::new(out) }
    }

    fn line(&self, args: fmt::Arguments<'_>) {
        let mut out = self.out.borrow_mut();
        if let Err(e) = writeln!(out, "{}", args).and_then(|_| out.flush()) {
            report_write_error(&e);
        }
    }

    fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

fn report_write_error(err: &io::Error) {
    tracing::warn!(error = %err, "failed to write test output");
}
