//! exmo_watch Library
//!
//! Polls EXMO market data and evaluates user-registered watches against
//! every snapshot. A watch whose condition holds runs its action once and is
//! retired.

pub mod app;
pub mod commands;
pub mod common;
pub mod config;
pub mod exmo;
pub mod notify;
pub mod watch;

// Re-export commonly used types
pub use app::{Application, RunningApplication};
pub use commands::{Command, CommandHandler};
pub use common::channels::{create_event_channel, EngineEvent};
pub use common::errors::{ClientError, Result};
pub use common::traits::{DataSource, Notificator, NotificatorProvider};
pub use common::types::{FeedKind, InstrumentRecord, Snapshot, WatchId};
pub use config::types::AppConfig;
pub use exmo::{ExmoRestClient, OrderBookFeed, TradesFeed};
pub use notify::{LogNotifier, TelegramBot};

// Watch types
pub use watch::{
    Action, Comparison, Condition, CycleReport, MonitorOutcome, NotifyAction, PollingEngine,
    SingleSlotMonitor, ThresholdCondition, Watch, WatchFactory, WatchRegistry, WatchService,
};
