//! Trait definitions for the external collaborators the watch engine consumes

use async_trait::async_trait;
use std::sync::Arc;

use super::errors::Result;
use super::types::{FeedKind, Snapshot, WatchId};

/// Source of market snapshots (order book, trade tape, ...)
///
/// Implementations own transport concerns, including request timeouts.
/// A failed fetch is reported as an error and the caller skips the cycle.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Fetch one snapshot for the given instrument pairs
    ///
    /// # Arguments
    /// * `pairs` - Instrument pairs, e.g. `["BTC_USD"]`
    async fn fetch(&self, pairs: &[String]) -> Result<Snapshot>;

    /// Which feed this source reads
    fn feed(&self) -> FeedKind;
}

/// Delivers a text message to one addressable recipient
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notificator: Send + Sync {
    /// Send a message. Failures are reported, never retried.
    async fn notify(&self, message: &str) -> Result<()>;
}

/// Hands out a notificator for a recipient id
pub trait NotificatorProvider: Send + Sync {
    fn notificator_for(&self, recipient: WatchId) -> Arc<dyn Notificator>;
}
