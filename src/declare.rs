//! Load-time test declarations
//!
//! [`declare_test!`](crate::declare_test) places a [`TestDeclaration`] in a link-time collection. Nothing has
//! to list the declarations centrally: the process-wide registry gathers every one of them the first time
//! [`global()`](crate::global) is called, in whatever order the linker produced. Ordering never depends on
//! that order, so declarations in different modules or crates are independent of each other.

use crate::test::{FnTest, Outcome, TestState};

/// A statically declared test: its identity and its `execute` body.
#[derive(Debug, Clone, Copy)]
pub struct TestDeclaration {
    pub suite: &'static str,
    pub name: &'static str,
    pub body: fn(&mut TestState) -> Outcome,
}

impl TestDeclaration {
    pub const fn new(suite: &'static str, name: &'static str, body: fn(&mut TestState) -> Outcome) -> Self {
        Self { suite, name, body }
    }

    /// Build a runnable test from the declaration.
    pub fn instantiate(&self) -> FnTest {
        FnTest::new(self.body)
    }
}

inventory::collect!(TestDeclaration);

/// Every declaration linked into the process.
pub fn declarations() -> impl Iterator<Item = &'static TestDeclaration> {
    inventory::iter::<TestDeclaration>.into_iter()
}

/// Declare a test that joins the process-wide registry at load time.
///
/// The body is a closure (or function) taking `&mut TestState` and returning an [`Outcome`]. Omitting the
/// suite places the test in the default (empty) suite.
///
/// ```ignore
/// roster::declare_test!(math, adds, |state| {
///     state.check(1 + 1 == 2, "addition is broken");
///     roster::Outcome::Pass
/// });
/// ```
#[macro_export]
macro_rules! declare_test {
    ($suite:ident, $name:ident, $body:expr $(,)?) => {
        $crate::inventory::submit! {
            $crate::TestDeclaration::new(stringify!($suite), stringify!($name), $body)
        }
    };
    ($name:ident, $body:expr $(,)?) => {
        $crate::inventory::submit! {
            $crate::TestDeclaration::new("", stringify!($name), $body)
        }
    };
}
