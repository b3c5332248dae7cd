//! Human-readable reporting

use std::io::{self, Write};

use super::{LineSink, Outputter};
use crate::params::RunFlags;

const RED: &str = "\x1b[31;1m";
const GREEN: &str = "\x1b[32;1m";
const YELLOW: &str = "\x1b[33;1m";
const NORMAL: &str = "\x1b[0m";

/// Console reporter: `PASS: name`, `FAIL: name`, `ABORT (message)` and a closing tally.
///
/// Honors [`RunFlags::COLOR`] and [`RunFlags::QUIET_SUCCESS`]; other flags are ignored.
pub struct HumanOutputter<W: Write = io::Stdout> {
    sink: LineSink<W>,
    flags: RunFlags,
}

impl HumanOutputter<io::Stdout> {
    pub fn stdout(flags: RunFlags) -> Self {
        Self::new(io::stdout(), flags)
    }
}

impl<W: Write> HumanOutputter<W> {
    pub fn new(out: W, flags: RunFlags) -> Self {
        Self {
            sink: LineSink::new(out),
            flags,
        }
    }

    /// Consume the reporter and return its destination.
    pub fn into_inner(self) -> W {
        self.sink.into_inner()
    }

    fn colorize<'a>(&self, color: &str, token: &'a str) -> std::borrow::Cow<'a, str> {
        if self.flags.contains(RunFlags::COLOR) {
            format!("{color}{token}{NORMAL}").into()
        } else {
            token.into()
        }
    }
}

impl<W: Write> Outputter for HumanOutputter<W> {
    fn skip_test(&self, name: &str, reason: &str) {
        if reason.is_empty() {
            self.sink.line(format_args!("{}: {}", self.colorize(YELLOW, "SKIP"), name));
        } else {
            self.sink
                .line(format_args!("{}: {} ({})", self.colorize(YELLOW, "SKIP"), name, reason));
        }
    }

    fn diagnostic(&self, message: &str) {
        self.sink.line(format_args!("{}", message));
    }

    fn end_test(&self, name: &str, success: bool) {
        if !success {
            self.sink.line(format_args!("{}: {}", self.colorize(RED, "FAIL"), name));
        } else if !self.flags.contains(RunFlags::QUIET_SUCCESS) {
            self.sink.line(format_args!("{}: {}", self.colorize(GREEN, "PASS"), name));
        }
    }

    fn abort(&self, message: &str) {
        self.sink.line(format_args!("{} ({})", self.colorize(RED, "ABORT"), message));
    }

    fn end_run(&self, total: usize, successes: usize) {
        self.sink.line(format_args!("{}/{} tests passed.", successes, total));
    }
}
