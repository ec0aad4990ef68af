//! Per-RAN in-memory state
//!
//! [`RanKeyedStore`] holds one entry per RAN name behind a read/write lock.
//! It backs the procedure-state tracker read by error-indication recovery
//! and the function snapshots taken before a service update. Entries are
//! overwritten in place; stale ones are only dropped by
//! [`RanKeyedStore::evict_older_than`].

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

use nextgric_rnib::RanFunction;
use tokio::sync::RwLock;
use tokio::time::Instant;

/// Outcome of the last procedure seen for a RAN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcedureState {
    #[default]
    NotInitiated,
    Ongoing,
    SetupCompleted,
    SetupFailure,
    ServiceUpdateCompleted,
    ServiceUpdateFailure,
}

impl fmt::Display for ProcedureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcedureState::NotInitiated => "NotInitiated",
            ProcedureState::Ongoing => "Ongoing",
            ProcedureState::SetupCompleted => "E2SetupProcedureCompleted",
            ProcedureState::SetupFailure => "E2SetupProcedureFailure",
            ProcedureState::ServiceUpdateCompleted => "RicServiceUpdateCompleted",
            ProcedureState::ServiceUpdateFailure => "RicServiceUpdateFailure",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    updated_at: Instant,
}

/// Map from RAN name to `V`, guarded by one read/write lock.
#[derive(Debug)]
pub struct RanKeyedStore<V> {
    entries: RwLock<HashMap<String, Entry<V>>>,
}

impl<V> Default for RanKeyedStore<V> {
    fn default() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }
}

impl<V: Clone> RanKeyedStore<V> {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value` for `ran_name`, replacing any previous entry.
    pub async fn set(&self, ran_name: &str, value: V) {
        self.entries.write().await.insert(
            ran_name.to_string(),
            Entry {
                value,
                updated_at: Instant::now(),
            },
        );
    }

    /// Current value for `ran_name`.
    pub async fn get(&self, ran_name: &str) -> Option<V> {
        self.entries
            .read()
            .await
            .get(ran_name)
            .map(|entry| entry.value.clone())
    }

    /// Removes and returns the entry for `ran_name`.
    pub async fn remove(&self, ran_name: &str) -> Option<V> {
        self.entries
            .write()
            .await
            .remove(ran_name)
            .map(|entry| entry.value)
    }

    /// Number of entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns true when no entry is stored.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drops entries not written for at least `ttl`; returns how many were dropped.
    pub async fn evict_older_than(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| now.duration_since(entry.updated_at) < ttl);
        before - entries.len()
    }
}

/// Last procedure outcome per RAN.
pub type ProcedureStateTracker = RanKeyedStore<ProcedureState>;

/// RAN functions captured before a service update was applied.
pub type RanFunctionSnapshots = RanKeyedStore<Vec<RanFunction>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_overwrite() {
        let tracker = ProcedureStateTracker::new();
        assert_eq!(tracker.get("gnb_1").await, None);

        tracker.set("gnb_1", ProcedureState::Ongoing).await;
        tracker.set("gnb_1", ProcedureState::SetupCompleted).await;
        assert_eq!(tracker.get("gnb_1").await, Some(ProcedureState::SetupCompleted));
        assert_eq!(tracker.len().await, 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let snapshots = RanFunctionSnapshots::new();
        snapshots.set("gnb_1", vec![RanFunction::default()]).await;
        assert_eq!(snapshots.remove("gnb_1").await.map(|f| f.len()), Some(1));
        assert!(snapshots.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_older_than() {
        let tracker = ProcedureStateTracker::new();
        tracker.set("old", ProcedureState::SetupCompleted).await;
        tokio::time::advance(Duration::from_secs(60)).await;
        tracker.set("fresh", ProcedureState::Ongoing).await;

        let evicted = tracker.evict_older_than(Duration::from_secs(30)).await;
        assert_eq!(evicted, 1);
        assert_eq!(tracker.get("old").await, None);
        assert_eq!(tracker.get("fresh").await, Some(ProcedureState::Ongoing));
    }

    #[test]
    fn test_procedure_state_display() {
        assert_eq!(
            ProcedureState::ServiceUpdateCompleted.to_string(),
            "RicServiceUpdateCompleted"
        );
    }
}
