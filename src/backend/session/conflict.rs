//! # Conflict Resolution
//!
//! Last-write-wins reduction of a publish batch. Edits aimed at the same
//! target collapse to the one with the highest timestamp; on a tie the edit
//! that appears later in the batch wins. Untargeted edits always survive.
//! Survivors keep their relative order from the input.
//!
//! Resolution only ever looks at one batch. Edits already in the log are
//! never revisited.

use crate::shared::Edit;
use std::collections::HashMap;

/// Batch-local last-write-wins resolver
#[derive(Debug, Default, Clone, Copy)]
pub struct ConflictResolver;

impl ConflictResolver {
    /// Reduce `batch` so that each target appears at most once
    pub fn reduce(batch: Vec<Edit>) -> Vec<Edit> {
        // target -> (index of current winner, its timestamp)
        let mut winners: HashMap<&str, (usize, i64)> = HashMap::new();
        for (index, edit) in batch.iter().enumerate() {
            let Some(target) = edit.target.as_deref() else {
                continue;
            };
            winners
                .entry(target)
                .and_modify(|winner| {
                    if edit.timestamp >= winner.1 {
                        *winner = (index, edit.timestamp);
                    }
                })
                .or_insert((index, edit.timestamp));
        }

        let keep: Vec<bool> = batch
            .iter()
            .enumerate()
            .map(|(index, edit)| match edit.target.as_deref() {
                Some(target) => winners.get(target).is_some_and(|w| w.0 == index),
                None => true,
            })
            .collect();

        let before = batch.len();
        let survivors: Vec<Edit> = batch
            .into_iter()
            .zip(keep)
            .filter_map(|(edit, keep)| keep.then_some(edit))
            .collect();

        if survivors.len() < before {
            tracing::debug!(
                "[Conflict] Dropped {} superseded edit(s) from batch of {}",
                before - survivors.len(),
                before
            );
        }
        survivors
    }
}
