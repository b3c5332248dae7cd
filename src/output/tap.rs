//! Test Anything Protocol reporting
//!
//! ```text
//! 1..3
//! ok 1 parses_empty
//! not ok 2 parses_nested
//! # expected 2 children, found 1
//! ok 3 fetches_remote # skip no network
//! ```

use std::borrow::Cow;
use std::cell::Cell;
use std::io::{self, Write};

use super::{LineSink, Outputter};

/// TAP reporter. Keeps a 1-based test counter that [`Outputter::start_run`] resets.
///
/// The counter is per-instance state, so one reporter must not serve overlapping runs.
pub struct TapOutputter<W: Write = io::Stdout> {
    sink: LineSink<W>,
    count: Cell<usize>,
}

impl TapOutputter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TapOutputter<W> {
    pub fn new(out: W) -> Self {
        Self {
            sink: LineSink::new(out),
            count: Cell::new(0),
        }
    }

    /// Consume the reporter and return its destination.
    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }

    fn next_number(&self) -> usize {
        let n = self.count.get() + 1;
        self.count.set(n);
        n
    }
}

impl<W: Write> Outputter for TapOutputter<W> {
    fn start_run(&self, total: usize) {
        self.count.set(0);
        self.sink.line(format_args!("1..{}", total));
    }

    fn skip_test(&self, name: &str, reason: &str) {
        let n = self.next_number();
        let mut lines = reason.lines();
        let first = lines.next().unwrap_or("");
        self.sink.line(format_args!("ok {} {} # skip {}", n, single_line(name), first));
        for rest in lines {
            self.diagnostic(rest);
        }
    }

    fn diagnostic(&self, message: &str) {
        self.sink.line(format_args!("# {}", message));
    }

    fn end_test(&self, name: &str, success: bool) {
        let n = self.next_number();
        let status = if success { "ok" } else { "not ok" };
        self.sink.line(format_args!("{} {} {}", status, n, single_line(name)));
    }

    fn abort(&self, message: &str) {
        self.sink.line(format_args!("Bail out! {}", single_line(message)));
    }

    // The plan line already carries the total.
    fn end_run(&self, _total: usize, _successes: usize) {}
}

/// A test line is one line: embedded line breaks in a name become spaces.
fn single_line(text: &str) -> Cow<'_, str> {
    if text.contains(['\n', '\r']) {
        Cow::Owned(text.replace("\r\n", " ").replace(['\n', '\r'], " "))
    } else {
        Cow::Borrowed(text)
    }
}
