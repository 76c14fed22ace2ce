use std::sync::Arc;
use tracing::debug;

use super::registry::WatchRegistry;
use super::traits::{Action, Condition};
use super::types::Watch;
use crate::common::errors::{ClientError, Result};
use crate::common::types::WatchId;

/// Builds watches and mediates registry add/remove
#[derive(Debug, Clone, Default)]
pub struct WatchFactory {
    registry: WatchRegistry,
}

impl WatchFactory {
    pub fn new(registry: WatchRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    /// Register a watch under `id`, replacing any earlier one.
    ///
    /// Creating the same id twice leaves exactly one live watch: the second.
    pub async fn create(
        &self,
        id: WatchId,
        action: impl Action + 'static,
        condition: impl Condition + 'static,
    ) -> Arc<Watch> {
        let watch = Arc::new(Watch::new(id, condition, action));
        if self.registry.insert(Arc::clone(&watch)).await.is_some() {
            debug!(%id, "Replaced existing watch");
        }
        watch
    }

    /// Remove the watch registered under `id`
    ///
    /// # Errors
    /// [`ClientError::WatchNotFound`] if nothing is registered under `id`,
    /// either because it never was or because it already fired.
    pub async fn delete(&self, id: WatchId) -> Result<Arc<Watch>> {
        self.registry
            .remove(id)
            .await
            .ok_or(ClientError::WatchNotFound(id))
    }
}
