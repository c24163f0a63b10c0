//! Property-based tests for the bounded message log

use proptest::prelude::*;
use sheetsync::backend::session::MessageLog;
use sheetsync::shared::{Edit, MessageKind, SyncError};

fn filled(appends: usize, max_retained: usize) -> MessageLog {
    let mut log = MessageLog::new("p", max_retained);
    for i in 0..appends {
        log.append(Edit::new(MessageKind::CellEdit, i.to_string(), 2));
    }
    log
}

proptest! {
    #[test]
    fn test_window_is_last_k(appends in 0usize..300, max_retained in 1usize..64) {
        let log = filled(appends, max_retained);
        let retained = appends.min(max_retained);

        prop_assert_eq!(log.len(), retained);
        prop_assert_eq!(log.tail_id(), appends as u64);

        let all = log.slice_since(0).unwrap();
        let ids: Vec<u64> = all.iter().map(|m| m.id).collect();
        let expected: Vec<u64> = ((appends - retained) as u64 + 1..=appends as u64).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn test_slice_since_matches_cursor(appends in 1usize..200, max_retained in 1usize..64, pick in any::<prop::sample::Index>()) {
        let log = filled(appends, max_retained);
        let oldest = log.oldest_id().unwrap();
        let tail = log.tail_id();

        // Any cursor from oldest-1 to tail is served exactly
        let cursor = oldest - 1 + pick.index((tail - oldest + 2) as usize) as u64;
        let slice = log.slice_since(cursor).unwrap();
        prop_assert_eq!(slice.len() as u64, tail - cursor);
        prop_assert!(slice.iter().all(|m| m.id > cursor));
        prop_assert!(slice.windows(2).all(|w| w[1].id == w[0].id + 1));
    }

    #[test]
    fn test_out_of_window_cursors(appends in 1usize..200, max_retained in 1usize..64, beyond in 1u64..50) {
        let log = filled(appends, max_retained);
        let oldest = log.oldest_id().unwrap();
        let tail = log.tail_id();

        let past_tail = log.slice_since(tail + beyond);
        let is_invalid = matches!(past_tail, Err(SyncError::InvalidCursor { .. }));
        prop_assert!(is_invalid);

        if oldest > 2 {
            let stale = log.slice_since(oldest - 2);
            let is_gap = matches!(stale, Err(SyncError::Gap { .. }));
            prop_assert!(is_gap);
        }
    }
}
