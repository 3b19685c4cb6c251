// Acknowledgment ledger - which items the user has already dismissed.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::model::ItemId;

/// Set of acknowledged item ids, each remembering when it was dismissed.
/// Membership only grows until an explicit `reset`.
#[derive(Debug, Default)]
pub struct AcknowledgmentLedger {
    entries: HashMap<ItemId, DateTime<Utc>>,
}

impl AcknowledgmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a single item as seen. Returns true if the id was newly added;
    /// acknowledging an already-present id is a no-op.
    pub fn acknowledge(&mut self, id: impl Into<ItemId>) -> bool {
        let id = id.into();
        if self.entries.contains_key(&id) {
            return false;
        }
        self.entries.insert(id, Utc::now());
        true
    }

    /// Bulk acknowledgment. Returns how many ids were newly added.
    pub fn acknowledge_all<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<ItemId>,
    {
        let mut added = 0;
        for id in ids {
            if self.acknowledge(id) {
                added += 1;
            }
        }
        added
    }

    /// Clear the whole set, making every item eligible again.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn acknowledged_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.entries.get(id).copied()
    }

    /// Sorted id snapshot for observable state.
    pub fn ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.entries.keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
