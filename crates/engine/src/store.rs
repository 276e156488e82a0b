use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use crate::types::EmbeddingSnapshot;

/// Holder for the currently-served embedding snapshot
///
/// The snapshot itself is immutable; the only synchronized operation is
/// swapping which `Arc` is current. Readers clone the `Arc` under a
/// momentary read lock and keep serving their copy even if a swap lands
/// mid-query, so old and new data never mix within one call.
pub struct EmbeddingStore {
    current: RwLock<Arc<EmbeddingSnapshot>>,
}

impl EmbeddingStore {
    /// Create a store serving the given snapshot
    pub fn new(initial: EmbeddingSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(initial)),
        }
    }

    /// Create a store serving an empty snapshot, to be populated by the
    /// first reload cycle
    pub fn empty() -> Self {
        Self::new(EmbeddingSnapshot::empty())
    }

    /// Get a reference to the currently-served snapshot
    pub async fn current(&self) -> Arc<EmbeddingSnapshot> {
        self.current.read().await.clone()
    }

    /// Atomically replace the served snapshot
    ///
    /// In-flight queries complete against the snapshot they already hold;
    /// the old snapshot is dropped once its last reader finishes.
    pub async fn swap(&self, snapshot: EmbeddingSnapshot) {
        let snapshot = Arc::new(snapshot);
        info!(
            "Installing embedding snapshot: {} students, {} professors, dim={}",
            snapshot.students().len(),
            snapshot.professors().len(),
            snapshot.dim()
        );
        *self.current.write().await = snapshot;
    }
}

impl Default for EmbeddingStore {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Collection;

    fn snapshot(student_ids: &[&str]) -> EmbeddingSnapshot {
        let ids: Vec<String> = student_ids.iter().map(|s| s.to_string()).collect();
        let rows = ids.iter().map(|_| vec![1.0, 0.0]).collect();
        let students = Collection::from_rows(ids, rows).unwrap();
        EmbeddingSnapshot::new(students, Collection::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_swap_replaces_served_snapshot() {
        let store = EmbeddingStore::empty();
        assert_eq!(store.current().await.students().len(), 0);

        store.swap(snapshot(&["S1", "S2"])).await;
        assert_eq!(store.current().await.students().len(), 2);
    }

    #[tokio::test]
    async fn test_readers_keep_old_snapshot_across_swap() {
        let store = EmbeddingStore::new(snapshot(&["S1"]));

        let held = store.current().await;
        store.swap(snapshot(&["S1", "S2", "S3"])).await;

        // The in-flight reference still sees the pre-swap data
        assert_eq!(held.students().len(), 1);
        assert_eq!(store.current().await.students().len(), 3);
    }

    #[tokio::test]
    async fn test_current_returns_same_arc_without_swap() {
        let store = EmbeddingStore::new(snapshot(&["S1"]));

        let a = store.current().await;
        let b = store.current().await;
        assert!(Arc::ptr_eq(&a, &b));
    }
}
