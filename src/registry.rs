//! Test catalog and run loop
//!
//! A [`TestRegistry`] maps suite names to the tests registered under them, in registration order. It is a
//! cheap, cloneable handle to shared state: the process-wide instance returned by [`global()`] and any
//! number of private instances (handy for testing the framework itself) behave identically.
//!
//! ## Run loop
//!
//! For each candidate, in run order:
//! 1. `start_test`
//! 2. `configure`; on `false` report `skip_test` and move on (no cleanup, no result)
//! 3. `execute`, then `cleanup` whichever way it ended
//! 4. on abort: report `abort` once and return [`RosterError::Aborted`]
//! 5. otherwise `end_test`, failure message lines as `diagnostic`, and a [`TestResult`]
//!
//! ## Ordering
//!
//! Candidates are sorted by (suite, name) first, so the order depends only on which tests are candidates.
//! With [`RunFlags::ALPHA_ORDER`](crate::RunFlags::ALPHA_ORDER) that sorted order is used as is; otherwise
//! it is shuffled with an RNG seeded from [`RunParams::seed`].

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::declare;
use crate::error::{RosterError, RosterResult};
use crate::params::RunParams;
use crate::result::{Results, TestResult};
use crate::test::{self, FnTest, Outcome, Test, TestState};

type SharedTest = Arc<Mutex<Box<dyn Test>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct TestId(u64);

struct Entry {
    id: TestId,
    name: String,
    test: SharedTest,
}

#[derive(Default)]
struct Catalog {
    suites: BTreeMap<String, Vec<Entry>>,
    next_id: u64,
}

impl Catalog {
    fn contains(&self, suite: &str, name: &str) -> bool {
        self.suites
            .get(suite)
            .is_some_and(|entries| entries.iter().any(|e| e.name == name))
    }

    fn insert(&mut self, suite: &str, name: &str, test: Box<dyn Test>) -> RosterResult<TestId> {
        if self.contains(suite, name) {
            tracing::warn!(suite, name, "rejected duplicate test registration");
            return Err(RosterError::DuplicateTest {
                suite: suite.to_string(),
                name: name.to_string(),
            });
        }

        let id = TestId(self.next_id);
        self.next_id += 1;
        self.suites.entry(suite.to_string()).or_default().push(Entry {
            id,
            name: name.to_string(),
            test: Arc::new(Mutex::new(test)),
        });
        tracing::debug!(suite, name, "registered test");
        Ok(id)
    }

    /// Detach an entry. The caller drops it once the lock is released, since a test may own handles itself.
    fn remove(&mut self, id: TestId) -> Option<Entry> {
        let (suite, index) = self
            .suites
            .iter()
            .find_map(|(suite, entries)| entries.iter().position(|e| e.id == id).map(|i| (suite.clone(), i)))?;

        let entries = self.suites.get_mut(&suite)?;
        let entry = entries.remove(index);
        tracing::debug!(suite = %suite, name = %entry.name, "unregistered test");
        if entries.is_empty() {
            self.suites.remove(&suite);
        }
        Some(entry)
    }

    fn candidate(suite: &str, entry: &Entry) -> Candidate {
        Candidate {
            suite: suite.to_string(),
            name: entry.name.clone(),
            test: Arc::clone(&entry.test),
        }
    }
}

/// A test selected for a run, detached from the catalog lock.
struct Candidate {
    suite: String,
    name: String,
    test: SharedTest,
}

enum Step {
    Skipped,
    Finished(TestResult),
    Aborted(String),
}

/// Process-wide or private catalog of tests grouped by suite.
#[derive(Clone, Default)]
pub struct TestRegistry {
    catalog: Arc<Mutex<Catalog>>,
}

static GLOBAL: OnceLock<TestRegistry> = OnceLock::new();

/// The process-wide registry.
///
/// Created on first use, at which point every [`declare_test!`](crate::declare_test) declaration linked into
/// the process is registered. Declared tests stay registered for the life of the process.
pub fn global() -> &'static TestRegistry {
    GLOBAL.get_or_init(|| {
        let registry = TestRegistry::new();
        for decl in declare::declarations() {
            // A duplicate declaration is logged by the catalog and skipped.
            let _ = registry.insert(decl.suite, decl.name, Box::new(decl.instantiate()));
        }
        registry
    })
}

impl TestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn catalog(&self) -> MutexGuard<'_, Catalog> {
        self.catalog.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn insert(&self, suite: &str, name: &str, test: Box<dyn Test>) -> RosterResult<TestId> {
        self.catalog().insert(suite, name, test)
    }

    /// Register `test` as `name` in `suite` (empty for the default suite).
    ///
    /// The test stays registered until the returned handle is dropped.
    ///
    /// ## Errors
    ///
    /// Returns [`RosterError::DuplicateTest`] if the suite already holds a test with that name.
    pub fn register<T: Test + 'static>(
        &self,
        name: impl Into<String>,
        suite: impl Into<String>,
        test: T,
    ) -> RosterResult<TestHandle> {
        let name = name.into();
        let suite = suite.into();
        let id = self.insert(&suite, &name, Box::new(test))?;
        Ok(TestHandle {
            catalog: Arc::downgrade(&self.catalog),
            id,
            suite,
            name,
        })
    }

    /// Register a closure as the `execute` body of a test.
    pub fn register_fn<F>(&self, name: impl Into<String>, suite: impl Into<String>, body: F) -> RosterResult<TestHandle>
    where
        F: FnMut(&mut TestState) -> Outcome + Send + 'static,
    {
        self.register(name, suite, FnTest::new(body))
    }

    /// Remove the test behind `handle`. Same as dropping the handle.
    pub fn unregister(&self, handle: TestHandle) {
        drop(handle);
    }

    /// Number of registered tests across all suites.
    pub fn len(&self) -> usize {
        self.catalog().suites.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog().suites.is_empty()
    }

    pub fn contains(&self, suite: &str, name: &str) -> bool {
        self.catalog().contains(suite, name)
    }

    pub fn has_suite(&self, suite: &str) -> bool {
        self.catalog().suites.contains_key(suite)
    }

    pub fn has_test(&self, name: &str) -> bool {
        self.catalog()
            .suites
            .values()
            .any(|entries| entries.iter().any(|e| e.name == name))
    }

    /// Suite names in ascending order.
    pub fn suites(&self) -> Vec<String> {
        self.catalog().suites.keys().cloned().collect()
    }

    /// Test names of `suite` in registration order.
    pub fn tests(&self, suite: &str) -> Vec<String> {
        self.catalog()
            .suites
            .get(suite)
            .map(|entries| entries.iter().map(|e| e.name.clone()).collect())
            .unwrap_or_default()
    }

    /// Run every registered test.
    #[tracing::instrument(skip_all, fields(seed = params.seed))]
    pub fn run_all(&self, params: &RunParams<'_>) -> RosterResult<Results> {
        let candidates = {
            let catalog = self.catalog();
            catalog
                .suites
                .iter()
                .flat_map(|(suite, entries)| entries.iter().map(move |e| Catalog::candidate(suite, e)))
                .collect()
        };
        run_candidates(candidates, params)
    }

    /// Run every test of `suite`. An unknown suite yields no results and no events.
    #[tracing::instrument(skip(self, params), fields(seed = params.seed))]
    pub fn run_suite(&self, suite: &str, params: &RunParams<'_>) -> RosterResult<Results> {
        let candidates: Vec<Candidate> = {
            let catalog = self.catalog();
            match catalog.suites.get(suite) {
                Some(entries) => entries.iter().map(|e| Catalog::candidate(suite, e)).collect(),
                None => Vec::new(),
            }
        };
        if candidates.is_empty() {
            tracing::info!(suite, "no such suite");
            return Ok(Vec::new());
        }
        run_candidates(candidates, params)
    }

    /// Run the test called `name`. If several suites hold that name, the first suite in ascending order wins.
    /// An unknown name yields no results and no events.
    #[tracing::instrument(skip(self, params))]
    pub fn run_one(&self, name: &str, params: &RunParams<'_>) -> RosterResult<Results> {
        let candidate = {
            let catalog = self.catalog();
            catalog.suites.iter().find_map(|(suite, entries)| {
                entries
                    .iter()
                    .find(|e| e.name == name)
                    .map(|e| Catalog::candidate(suite, e))
            })
        };
        match candidate {
            Some(candidate) => run_candidates(vec![candidate], params),
            None => {
                tracing::info!(name, "no such test");
                Ok(Vec::new())
            }
        }
    }
}

/// Keeps a dynamically registered test in its registry.
///
/// Dropping the handle unregisters the test; [`TestHandle::leak`] keeps it for the life of the process.
#[must_use = "dropping the handle unregisters the test"]
pub struct TestHandle {
    catalog: Weak<Mutex<Catalog>>,
    id: TestId,
    suite: String,
    name: String,
}

impl TestHandle {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn suite(&self) -> &str {
        &self.suite
    }

    /// Keep the test registered for the remaining life of the process.
    pub fn leak(self) {
        std::mem::forget(self);
    }
}

impl std::fmt::Debug for TestHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestHandle")
            .field("suite", &self.suite)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl Drop for TestHandle {
    fn drop(&mut self) {
        if let Some(catalog) = self.catalog.upgrade() {
            let removed = catalog.lock().unwrap_or_else(PoisonError::into_inner).remove(self.id);
            drop(removed);
        }
    }
}

fn order(candidates: &mut [Candidate], params: &RunParams<'_>) {
    candidates.sort_by(|a, b| (a.suite.as_str(), a.name.as_str()).cmp(&(b.suite.as_str(), b.name.as_str())));
    if !params.alphabetical() {
        let mut rng = StdRng::seed_from_u64(params.seed);
        candidates.shuffle(&mut rng);
    }
}

fn run_candidates(mut candidates: Vec<Candidate>, params: &RunParams<'_>) -> RosterResult<Results> {
    order(&mut candidates, params);

    let out = params.outputter;
    let total = candidates.len();
    tracing::info!(total, "starting run");
    out.start_run(total);

    let mut results = Results::with_capacity(total);
    for candidate in &candidates {
        match run_candidate(candidate, params) {
            Step::Skipped => {}
            Step::Finished(result) => results.push(result),
            Step::Aborted(message) => {
                tracing::warn!(suite = %candidate.suite, name = %candidate.name, %message, "run aborted");
                out.abort(&message);
                return Err(RosterError::Aborted {
                    test: candidate.name.clone(),
                    message,
                    partial: results,
                });
            }
        }
    }

    let passed = results.iter().filter(|r| r.success).count();
    tracing::info!(total, passed, "finished run");
    out.end_run(total, passed);
    Ok(results)
}

fn run_candidate(candidate: &Candidate, params: &RunParams<'_>) -> Step {
    let out = params.outputter;
    let name = candidate.name.as_str();
    out.start_test(name);

    let mut test = candidate.test.lock().unwrap_or_else(PoisonError::into_inner);
    let mut state = TestState::default();

    let configured = match test::configure_guarded(&mut **test, params, &mut state) {
        Ok(configured) => configured,
        Err(message) => return Step::Aborted(message),
    };
    if !configured {
        tracing::debug!(suite = %candidate.suite, name, reason = state.message(), "skipped test");
        out.skip_test(name, state.message());
        return Step::Skipped;
    }

    let outcome = test::execute_guarded(&mut **test, &mut state);
    let success = match outcome {
        Outcome::Abort(message) => return Step::Aborted(message),
        Outcome::Pass => state.success(),
        Outcome::Fail => false,
    };
    tracing::debug!(suite = %candidate.suite, name, success, "finished test");

    out.end_test(name, success);
    if !success {
        for line in state.message().lines() {
            out.diagnostic(line);
        }
    }

    Step::Finished(TestResult {
        suite: candidate.suite.clone(),
        name: candidate.name.clone(),
        success,
        message: state.message().to_string(),
    })
}
