//! Property-based tests for batch conflict resolution

use proptest::prelude::*;
use sheetsync::backend::session::ConflictResolver;
use sheetsync::shared::{Edit, MessageKind};
use std::collections::HashMap;

fn edit_strategy() -> impl Strategy<Value = Edit> {
    (prop::option::of(0u8..4), 0i64..5, 2u64..6).prop_map(|(cell, timestamp, originator)| {
        let edit = Edit::new(MessageKind::CellEdit, format!("{}@{}", originator, timestamp), originator)
            .with_timestamp(timestamp);
        match cell {
            Some(c) => edit.with_target(format!("A{}", c)),
            None => edit,
        }
    })
}

proptest! {
    #[test]
    fn test_one_winner_per_target(batch in prop::collection::vec(edit_strategy(), 0..24)) {
        let reduced = ConflictResolver::reduce(batch.clone());

        let mut seen = HashMap::new();
        for edit in reduced.iter().filter_map(|e| e.target.as_ref().map(|t| (t, e))) {
            prop_assert!(seen.insert(edit.0.clone(), edit.1.timestamp).is_none());
        }

        // Each winner carries the newest timestamp submitted for its cell
        for (target, timestamp) in &seen {
            let newest = batch
                .iter()
                .filter(|e| e.target.as_ref() == Some(target))
                .map(|e| e.timestamp)
                .max();
            prop_assert_eq!(Some(*timestamp), newest);
        }
    }

    #[test]
    fn test_untargeted_edits_and_order_survive(batch in prop::collection::vec(edit_strategy(), 0..24)) {
        let reduced = ConflictResolver::reduce(batch.clone());

        let untargeted_in = batch.iter().filter(|e| e.target.is_none()).count();
        let untargeted_out = reduced.iter().filter(|e| e.target.is_none()).count();
        prop_assert_eq!(untargeted_in, untargeted_out);

        // The output is a subsequence of the input
        let mut input = batch.iter();
        for edit in &reduced {
            prop_assert!(input.any(|candidate| candidate == edit));
        }
    }
}
