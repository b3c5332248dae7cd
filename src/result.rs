//! Outcome records for a run

/// The outcome of one executed test.
///
/// Skipped tests never produce a `TestResult`; they only appear in the run total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestResult {
    pub suite: String,
    pub name: String,
    pub success: bool,
    /// Message accumulated by the test (empty when it had nothing to say)
    pub message: String,
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        self.success
    }

    pub fn is_fail(&self) -> bool {
        !self.success
    }
}

/// All results of a run, in execution order.
pub type Results = Vec<TestResult>;

/// Count `(executed, passed)` for a result sequence.
pub fn summary(results: &[TestResult]) -> (usize, usize) {
    let passed = results.iter().filter(|r| r.is_pass()).count();
    (results.len(), passed)
}
