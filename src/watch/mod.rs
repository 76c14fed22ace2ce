//! Watch module - Condition/action rules evaluated against market snapshots
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command layer                                              │
//! │    WatchService.create_watch(id, threshold)                 │
//! │       └─► WatchFactory.create ─► WatchRegistry.add          │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │  PollingEngine (one task per feed)                          │
//! │    FETCH     DataSource.fetch() ── error ──► SLEEP          │
//! │    EVALUATE  registry.entries() copy, Condition.check()     │
//! │    ACT       Action.perform() for each hit, in order        │
//! │    SWEEP     registry.retire(fired) in one batch            │
//! │    SLEEP     fixed interval                                 │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`Condition`] / [`Action`]: the capabilities a watch binds together
//! - [`ThresholdCondition`], [`NotifyAction`]: the concrete rule used by chats
//! - [`WatchRegistry`]: id → watch, add replaces
//! - [`WatchFactory`]: builds watches, turns a missing delete into an error
//! - [`PollingEngine`]: the fetch/evaluate/act/sweep/sleep loop
//! - [`SingleSlotMonitor`]: one-shot monitor where starting a new one
//!   cancels the old one

mod actions;
mod conditions;
mod engine;
mod factory;
mod monitor;
mod registry;
mod service;
mod traits;
mod types;

pub use actions::{format_alert, NotifyAction};
pub use conditions::{Comparison, ThresholdCondition};
pub use engine::{CycleReport, PollingEngine, DEFAULT_POLL_INTERVAL};
pub use factory::WatchFactory;
pub use monitor::{MonitorOutcome, SingleSlotMonitor};
pub use registry::WatchRegistry;
pub use service::WatchService;
pub use traits::{Action, BoxedAction, BoxedCondition, Condition};
pub use types::Watch;
