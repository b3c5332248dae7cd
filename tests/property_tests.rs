//! Property-based tests for run ordering
//!
//! These use proptest to check ordering invariants over randomly generated test sets.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use roster::{Outcome, RunFlags, RunParams, TapOutputter, TestHandle, TestRegistry};

type Ids = Vec<(String, String)>;

/// Register every (suite, name) pair in the given order; each test records itself when executed.
fn register_recording(registry: &TestRegistry, ids: &[(String, String)], log: &Arc<Mutex<Ids>>) -> Vec<TestHandle> {
    ids.iter()
        .map(|(suite, name)| {
            let log = Arc::clone(log);
            let id = (suite.clone(), name.clone());
            registry
                .register_fn(name.clone(), suite.clone(), move |_| {
                    log.lock().unwrap().push(id.clone());
                    Outcome::Pass
                })
                .unwrap()
        })
        .collect()
}

fn run_order(ids: &[(String, String)], flags: RunFlags, seed: u64) -> Ids {
    let registry = TestRegistry::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let _handles = register_recording(&registry, ids, &log);
    let tap = TapOutputter::new(Vec::new());
    registry
        .run_all(&RunParams::new(&tap).with_flags(flags).with_seed(seed))
        .unwrap();
    let order = log.lock().unwrap().clone();
    order
}

fn test_ids() -> impl Strategy<Value = Ids> {
    proptest::collection::btree_set(("[a-c]{0,2}", "[a-z]{1,6}"), 1..12).prop_map(|set| set.into_iter().collect())
}

proptest! {
    /// Property: alphabetical order is the (suite, name) sort of the set, whatever the registration order
    #[test]
    fn test_alphabetical_order_is_sorted(ids in test_ids(), rotate in 0usize..12) {
        let mut registration = ids.clone();
        let len = registration.len();
        registration.rotate_left(rotate % len);

        let order = run_order(&registration, RunFlags::ALPHA_ORDER, 0);
        let expected: Ids = ids.iter().cloned().collect::<BTreeSet<_>>().into_iter().collect();
        prop_assert_eq!(order, expected);
    }

    /// Property: a fixed seed reproduces the same order, independent of registration order
    #[test]
    fn test_seeded_order_is_reproducible(ids in test_ids(), seed in any::<u64>()) {
        let forward = run_order(&ids, RunFlags::NONE, seed);
        let again = run_order(&ids, RunFlags::NONE, seed);
        let mut reversed = ids.clone();
        reversed.reverse();
        let from_reversed = run_order(&reversed, RunFlags::NONE, seed);

        prop_assert_eq!(&forward, &again);
        prop_assert_eq!(&forward, &from_reversed);
    }

    /// Property: a shuffled run executes every registered test exactly once
    #[test]
    fn test_shuffled_order_is_a_permutation(ids in test_ids(), seed in any::<u64>()) {
        let order = run_order(&ids, RunFlags::NONE, seed);
        let executed: BTreeSet<_> = order.iter().cloned().collect();
        let registered: BTreeSet<_> = ids.iter().cloned().collect();
        prop_assert_eq!(order.len(), ids.len());
        prop_assert_eq!(executed, registered);
    }
}

#[test]
fn test_seed_zero_is_deterministic() {
    let ids: Ids = (0..10).map(|i| (String::new(), format!("t{i}"))).collect();
    assert_eq!(run_order(&ids, RunFlags::NONE, 0), run_order(&ids, RunFlags::NONE, 0));
}
