use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::types::Watch;
use crate::common::types::WatchId;

/// Live watches of one engine, keyed by id.
///
/// Contract:
/// - at most one watch per id; [`add`](Self::add) replaces, and thereby
///   cancels, whatever was registered under the same id. The replaced watch
///   is dropped and never evaluated again; an action it already started
///   runs to completion.
/// - [`entries`](Self::entries) returns a copy taken under the lock, so
///   later adds and removes never show up in (or disturb) a pass that is
///   already iterating it.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct WatchRegistry {
    watches: Arc<RwLock<BTreeMap<WatchId, Arc<Watch>>>>,
}

impl WatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a watch under its id, returning the one it replaced
    pub async fn add(&self, watch: Watch) -> Option<Arc<Watch>> {
        self.insert(Arc::new(watch)).await
    }

    /// Same as [`add`](Self::add) for a watch the caller keeps a handle to
    pub async fn insert(&self, watch: Arc<Watch>) -> Option<Arc<Watch>> {
        self.watches.write().await.insert(watch.id(), watch)
    }

    /// Remove and return the watch registered under `id`
    pub async fn remove(&self, id: WatchId) -> Option<Arc<Watch>> {
        self.watches.write().await.remove(&id)
    }

    /// Point-in-time copy of the registry contents, ordered by id
    pub async fn entries(&self) -> Vec<(WatchId, Arc<Watch>)> {
        self.watches
            .read()
            .await
            .iter()
            .map(|(id, watch)| (*id, Arc::clone(watch)))
            .collect()
    }

    pub async fn get(&self, id: WatchId) -> Option<Arc<Watch>> {
        self.watches.read().await.get(&id).cloned()
    }

    pub async fn contains(&self, id: WatchId) -> bool {
        self.watches.read().await.contains_key(&id)
    }

    /// Whether `watch` is still the one registered under `id`.
    ///
    /// False once it has been removed or replaced.
    pub async fn is_current(&self, id: WatchId, watch: &Arc<Watch>) -> bool {
        self.watches
            .read()
            .await
            .get(&id)
            .map(|current| Arc::ptr_eq(current, watch))
            .unwrap_or(false)
    }

    /// Remove a batch of fired watches under a single write lock.
    ///
    /// An id is only removed if it still maps to the exact watch that fired;
    /// a replacement registered while the pass was running survives.
    /// Returns how many entries were removed.
    pub async fn retire(&self, fired: &[(WatchId, Arc<Watch>)]) -> usize {
        let mut watches = self.watches.write().await;
        let mut removed = 0;
        for (id, watch) in fired {
            let same = watches
                .get(id)
                .map(|current| Arc::ptr_eq(current, watch))
                .unwrap_or(false);
            if same {
                watches.remove(id);
                removed += 1;
            }
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.watches.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.watches.read().await.is_empty()
    }
}
