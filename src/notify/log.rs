//! Notificator that only writes to the log, used when no bot is configured

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::common::errors::Result;
use crate::common::traits::{Notificator, NotificatorProvider};
use crate::common::types::WatchId;

#[derive(Debug, Clone, Copy)]
pub struct LogNotificator {
    recipient: WatchId,
}

impl LogNotificator {
    pub fn new(recipient: WatchId) -> Self {
        Self { recipient }
    }
}

#[async_trait]
impl Notificator for LogNotificator {
    async fn notify(&self, message: &str) -> Result<()> {
        info!(recipient = %self.recipient, "{}", message);
        Ok(())
    }
}

/// Provider handing out [`LogNotificator`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl NotificatorProvider for LogNotifier {
    fn notificator_for(&self, recipient: WatchId) -> Arc<dyn Notificator> {
        Arc::new(LogNotificator::new(recipient))
    }
}
