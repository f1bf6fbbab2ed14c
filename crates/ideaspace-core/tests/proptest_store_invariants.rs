#![forbid(unsafe_code)]

//! Property tests for [`NavigationStore`] sequencing invariants.
//!
//! Validates, over random interleavings of issued requests and delivered
//! responses (in any order, with failures and blank input mixed in):
//! - Only the latest issued request changes focus or neighbors.
//! - History records every accepted request in order, duplicates kept.
//! - Neighbor positions always equal the layout for `(index, count)`.
//! - Rejected input never changes the snapshot version.

use ideaspace_core::{
    ApplyOutcome, ExpansionError, ExpansionRequest, IdeaNode, NavigationStore, Phase,
    SphereLayout,
};
use proptest::prelude::*;

// ============================================================================
// Strategy helpers
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    /// Focus one of a small pool of sentences (index into `SENTENCES`).
    Focus(usize),
    /// Focus a blank sentence.
    Blank,
    /// Deliver the outstanding request at this position (mod outstanding count).
    Deliver { pick: usize, ok: bool, count: usize },
}

const SENTENCES: [&str; 4] = ["alpha", "beta", "gamma", "alpha"];

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..SENTENCES.len()).prop_map(Op::Focus),
        1 => Just(Op::Blank),
        4 => (any::<usize>(), prop::bool::weighted(0.8), 0_usize..8)
            .prop_map(|(pick, ok, count)| Op::Deliver { pick, ok, count }),
    ]
}

fn neighbors_for(sentence: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| format!("{sentence}-{i}")).collect()
}

// ============================================================================
// Invariant: last request wins under arbitrary interleavings
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn only_latest_request_mutates_state(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let layout = SphereLayout::default();
        let mut store = NavigationStore::new(layout);
        let mut outstanding: Vec<ExpansionRequest> = Vec::new();
        let mut expected_history: Vec<String> = Vec::new();
        let mut latest: Option<ExpansionRequest> = None;
        let mut latest_delivered = false;

        for op in ops {
            match op {
                Op::Focus(i) => {
                    let request = store.set_focus(SENTENCES[i]).unwrap();
                    expected_history.push(request.sentence.clone());
                    outstanding.push(request.clone());
                    latest = Some(request);
                    latest_delivered = false;
                    prop_assert_eq!(store.phase(), Phase::Loading);
                }
                Op::Blank => {
                    let version = store.version();
                    prop_assert!(store.set_focus(" \t").is_err());
                    prop_assert_eq!(store.version(), version);
                }
                Op::Deliver { pick, ok, count } => {
                    if outstanding.is_empty() {
                        continue;
                    }
                    let request = outstanding.remove(pick % outstanding.len());
                    let is_latest = latest.as_ref().map(|l| l.seq) == Some(request.seq);
                    let before = store.snapshot();
                    let version = store.version();
                    let sentence = request.sentence.clone();
                    let result = if ok {
                        Ok(neighbors_for(&sentence, count))
                    } else {
                        Err(ExpansionError::unavailable("down"))
                    };

                    let outcome = store.apply(request.resolve(result));

                    if !is_latest || latest_delivered {
                        prop_assert!(outcome.is_superseded());
                        prop_assert_eq!(store.version(), version);
                        prop_assert_eq!(store.snapshot(), before);
                        continue;
                    }

                    latest_delivered = true;
                    if ok {
                        prop_assert_eq!(outcome, ApplyOutcome::Applied { neighbors: count });
                        prop_assert_eq!(store.state().focus(), Some(sentence.as_str()));
                        let labels: Vec<&str> =
                            store.state().neighbors().iter().map(IdeaNode::label).collect();
                        let expected = neighbors_for(&sentence, count);
                        prop_assert_eq!(labels, expected.iter().map(String::as_str).collect::<Vec<_>>());
                        prop_assert_eq!(store.phase(), Phase::Ready);
                    } else {
                        prop_assert!(matches!(outcome, ApplyOutcome::Failed(_)));
                        let after = store.snapshot();
                        prop_assert_eq!(after.focus_label, before.focus_label.clone());
                        prop_assert_eq!(after.neighbors, before.neighbors.clone());
                        prop_assert!(after.error.is_some());
                        let expected_phase = if before.focus_label.is_some() {
                            Phase::Ready
                        } else {
                            Phase::Idle
                        };
                        prop_assert_eq!(store.phase(), expected_phase);
                    }
                }
            }

            prop_assert_eq!(store.history(), expected_history.as_slice());
            let neighbors = store.state().neighbors();
            for (k, node) in neighbors.iter().enumerate() {
                prop_assert_eq!(node.position(), layout.position(k, neighbors.len()));
            }
        }
    }
}

// ============================================================================
// Invariant: selecting the focus never issues a request
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn selecting_focus_is_idempotent(count in 0_usize..10, repeats in 1_usize..5) {
        let mut store = NavigationStore::default();
        let request = store.submit_seed("seed").unwrap();
        store.apply(request.resolve(Ok(neighbors_for("seed", count))));
        let version = store.version();

        for _ in 0..repeats {
            prop_assert_eq!(store.select_node("seed"), Ok(None));
        }
        prop_assert_eq!(store.version(), version);
        prop_assert_eq!(store.history().len(), 1);
    }
}
