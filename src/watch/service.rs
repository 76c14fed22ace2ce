use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use super::actions::NotifyAction;
use super::conditions::ThresholdCondition;
use super::factory::WatchFactory;
use crate::common::errors::Result;
use crate::common::traits::NotificatorProvider;
use crate::common::types::WatchId;

/// Registration entry point used by the command layer.
///
/// Wires a [`ThresholdCondition`] on the configured pair to a
/// [`NotifyAction`] addressed to the watch id.
#[derive(Clone)]
pub struct WatchService {
    factory: WatchFactory,
    pair: String,
    notifiers: Arc<dyn NotificatorProvider>,
}

impl WatchService {
    pub fn new(
        factory: WatchFactory,
        pair: impl Into<String>,
        notifiers: Arc<dyn NotificatorProvider>,
    ) -> Self {
        Self {
            factory,
            pair: pair.into(),
            notifiers,
        }
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn factory(&self) -> &WatchFactory {
        &self.factory
    }

    /// Watch the pair's top bid for `id`; replaces an earlier watch of `id`
    pub async fn create_watch(&self, id: WatchId, threshold: Decimal) {
        let condition = ThresholdCondition::new(self.pair.clone(), threshold);
        let action = NotifyAction::new(self.pair.clone(), self.notifiers.notificator_for(id));
        self.factory.create(id, action, condition).await;
        info!(%id, %threshold, pair = %self.pair, "watch registered");
    }

    /// Drop the watch of `id`
    ///
    /// # Errors
    /// [`ClientError::WatchNotFound`](crate::common::errors::ClientError::WatchNotFound)
    /// if `id` has no live watch.
    pub async fn delete_watch(&self, id: WatchId) -> Result<()> {
        self.factory.delete(id).await?;
        info!(%id, "watch deleted");
        Ok(())
    }

    pub async fn has_watch(&self, id: WatchId) -> bool {
        self.factory.registry().contains(id).await
    }
}
