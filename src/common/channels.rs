//! Channel type definitions for engine events

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;

use super::types::{FeedKind, WatchId};

/// Default channel buffer size
pub const DEFAULT_CHANNEL_SIZE: usize = 1000;

/// Something an engine wants the outside world to know about
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    /// A watch's condition held and its action ran successfully
    WatchFired {
        feed: FeedKind,
        id: WatchId,
        at: DateTime<Utc>,
    },
    /// A watch's action failed; the watch is retired regardless
    ActionFailed {
        feed: FeedKind,
        id: WatchId,
        error: String,
        at: DateTime<Utc>,
    },
    /// The data source could not be read; the cycle was skipped
    FetchFailed {
        feed: FeedKind,
        error: String,
        /// Whether the next cycle can be expected to succeed
        transient: bool,
        at: DateTime<Utc>,
    },
}

/// Create a new engine event channel with the default buffer size
pub fn create_event_channel() -> (mpsc::Sender<EngineEvent>, mpsc::Receiver<EngineEvent>) {
    mpsc::channel(DEFAULT_CHANNEL_SIZE)
}
