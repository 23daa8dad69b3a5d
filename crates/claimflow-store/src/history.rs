//! # Claims History Store
//!
//! Newest-first list of generated claims, capped at [`HISTORY_LIMIT`]
//! entries and persisted to the `claims-history` partition.

use std::sync::Arc;

use claimflow_core::{ClaimId, ClaimRecord};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::partition::{LocalStorage, Partition};

/// Maximum number of retained records. Older entries are evicted.
pub const HISTORY_LIMIT: usize = 200;

/// Persisted shape of the history partition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct HistoryState {
    #[serde(default)]
    items: Vec<ClaimRecord>,
}

/// Shared handle to the claims history.
#[derive(Debug, Clone)]
pub struct HistoryStore {
    items: Arc<RwLock<Vec<ClaimRecord>>>,
    partition: Partition,
}

impl HistoryStore {
    pub const PARTITION: &'static str = "claims-history";

    /// Open the history partition in `storage`.
    pub fn open(storage: &LocalStorage) -> Self {
        let partition = storage.partition(Self::PARTITION);
        let mut state: HistoryState = partition.load();
        state.items.truncate(HISTORY_LIMIT);
        tracing::debug!(records = state.items.len(), "rehydrated claims history");
        Self {
            items: Arc::new(RwLock::new(state.items)),
            partition,
        }
    }

    /// A history with no backing file.
    pub fn in_memory() -> Self {
        Self {
            items: Arc::new(RwLock::new(Vec::new())),
            partition: Partition::ephemeral(Self::PARTITION),
        }
    }

    /// Prepend `record`, evicting the oldest entries beyond the limit.
    pub fn add(&self, record: ClaimRecord) {
        tracing::info!(claim_id = %record.id, codes = record.codes_count, "claim recorded");
        self.mutate(|items| {
            items.insert(0, record);
            items.truncate(HISTORY_LIMIT);
        });
    }

    /// Remove every record.
    pub fn clear(&self) {
        self.mutate(Vec::clear);
    }

    /// All records, newest first.
    pub fn list(&self) -> Vec<ClaimRecord> {
        self.items.read().clone()
    }

    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }

    /// The most recent record with `id`.
    pub fn get(&self, id: &ClaimId) -> Option<ClaimRecord> {
        self.items.read().iter().find(|r| &r.id == id).cloned()
    }

    fn mutate(&self, f: impl FnOnce(&mut Vec<ClaimRecord>)) {
        let mut items = self.items.write();
        f(&mut *items);
        // The persisted shape wraps the list; clone once per write.
        let state = HistoryState {
            items: items.clone(),
        };
        if let Err(e) = self.partition.save(&state) {
            tracing::warn!(partition = Self::PARTITION, "failed to persist claims history: {e}");
        }
    }
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claimflow_core::Timestamp;

    fn record(n: usize) -> ClaimRecord {
        ClaimRecord {
            id: ClaimId::new(format!("CLM-{n:03}")),
            date: Timestamp::now(),
            codes_count: 1,
            amount: None,
            tx_hash: None,
        }
    }

    #[test]
    fn add_prepends() {
        let history = HistoryStore::in_memory();
        history.add(record(1));
        history.add(record(2));
        let ids: Vec<_> = history.list().into_iter().map(|r| r.id.0).collect();
        assert_eq!(ids, vec!["CLM-002", "CLM-001"]);
    }

    #[test]
    fn bounded_at_limit_newest_first() {
        let history = HistoryStore::in_memory();
        for n in 0..=HISTORY_LIMIT {
            history.add(record(n));
        }
        let items = history.list();
        assert_eq!(items.len(), HISTORY_LIMIT);
        assert_eq!(items[0].id, ClaimId::new(format!("CLM-{HISTORY_LIMIT:03}")));
        // The very first insert was evicted.
        assert!(history.get(&ClaimId::new("CLM-000")).is_none());
        assert!(history.get(&ClaimId::new("CLM-001")).is_some());
    }

    #[test]
    fn clear_empties() {
        let history = HistoryStore::in_memory();
        history.add(record(1));
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let history = HistoryStore::open(&storage);
        history.add(ClaimRecord {
            amount: Some(250.0),
            tx_hash: Some("0xabc".into()),
            ..record(7)
        });
        drop(history);

        let reopened = HistoryStore::open(&storage);
        assert_eq!(reopened.len(), 1);
        let r = reopened.get(&ClaimId::new("CLM-007")).unwrap();
        assert_eq!(r.amount, Some(250.0));
        assert_eq!(r.tx_hash.as_deref(), Some("0xabc"));
    }

    #[test]
    fn persisted_shape_wraps_items() {
        let dir = tempfile::tempdir().unwrap();
        let history = HistoryStore::open(&LocalStorage::new(dir.path()));
        history.add(record(1));
        let raw = std::fs::read_to_string(dir.path().join("claims-history.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["state"]["items"][0]["id"], "CLM-001");
    }

    #[test]
    fn oversized_persisted_list_is_truncated_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path());
        let state = HistoryState {
            items: (0..HISTORY_LIMIT + 5).map(record).collect(),
        };
        storage.partition(HistoryStore::PARTITION).save(&state).unwrap();
        assert_eq!(HistoryStore::open(&storage).len(), HISTORY_LIMIT);
    }

    #[test]
    fn clones_share_state() {
        let history = HistoryStore::in_memory();
        let other = history.clone();
        history.add(record(1));
        assert_eq!(other.len(), 1);
    }
}
