//! Per-invocation run configuration
//!
//! [`RunParams`] bundles the reporting strategy with the behavior flags, the property-check count and the
//! shuffle seed. It is built once per run and never mutated by the engine.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::output::Outputter;

/// Behavior flags for a run.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RunFlags(u32);

impl RunFlags {
    pub const NONE: RunFlags = RunFlags(0);
    /// ANSI color coded output: red for fail, green for pass
    pub const COLOR: RunFlags = RunFlags(1 << 0);
    /// Run tests sorted by (suite, name) instead of shuffled
    pub const ALPHA_ORDER: RunFlags = RunFlags(1 << 1);
    /// Only report failing tests
    pub const QUIET_SUCCESS: RunFlags = RunFlags(1 << 2);

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: RunFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: RunFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: RunFlags) {
        self.0 &= !other.0;
    }

    /// Return a copy with `other` set or cleared.
    pub fn with(mut self, other: RunFlags, enabled: bool) -> Self {
        if enabled {
            self.insert(other);
        } else {
            self.remove(other);
        }
        self
    }
}

impl BitOr for RunFlags {
    type Output = RunFlags;

    fn bitor(self, rhs: RunFlags) -> RunFlags {
        RunFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for RunFlags {
    fn bitor_assign(&mut self, rhs: RunFlags) {
        self.insert(rhs);
    }
}

impl fmt::Debug for RunFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (RunFlags::COLOR, "COLOR"),
            (RunFlags::ALPHA_ORDER, "ALPHA_ORDER"),
            (RunFlags::QUIET_SUCCESS, "QUIET_SUCCESS"),
        ]
        .into_iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, name)| name)
        .collect();

        if names.is_empty() {
            write!(f, "RunFlags(NONE)")
        } else {
            write!(f, "RunFlags({})", names.join(" | "))
        }
    }
}

/// Configuration for one invocation of a run entry point.
#[derive(Clone, Copy)]
pub struct RunParams<'a> {
    /// Reporting strategy receiving lifecycle events
    pub outputter: &'a dyn Outputter,
    pub flags: RunFlags,
    /// Number of generated cases a property-based test should check
    pub property_checks: usize,
    /// Shuffle seed; every value, including 0, gives a reproducible order
    pub seed: u64,
}

impl<'a> RunParams<'a> {
    pub const DEFAULT_PROPERTY_CHECKS: usize = 100;

    /// Create params reporting to `outputter` with default settings
    pub fn new(outputter: &'a dyn Outputter) -> Self {
        Self {
            outputter,
            flags: RunFlags::COLOR | RunFlags::QUIET_SUCCESS,
            property_checks: Self::DEFAULT_PROPERTY_CHECKS,
            seed: 0,
        }
    }

    pub fn with_flags(mut self, flags: RunFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_property_checks(mut self, count: usize) -> Self {
        self.property_checks = count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn alphabetical(&self) -> bool {
        self.flags.contains(RunFlags::ALPHA_ORDER)
    }
}

impl fmt::Debug for RunParams<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunParams")
            .field("flags", &self.flags)
            .field("property_checks", &self.property_checks)
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}
