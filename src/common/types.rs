//! Shared types: watch identifiers and market snapshots

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;

/// Name of the top bid field in an order book record
pub const BID_TOP: &str = "bid_top";
/// Name of the top ask field in an order book record
pub const ASK_TOP: &str = "ask_top";

/// Identifier a watch is registered under.
///
/// The meaning is up to the caller; the chat layer uses the chat id so that
/// every chat owns at most one watch per engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchId(pub i64);

impl From<i64> for WatchId {
    fn from(id: i64) -> Self {
        WatchId(id)
    }
}

impl std::fmt::Display for WatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which upstream feed a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedKind {
    OrderBook,
    Trades,
}

impl std::fmt::Display for FeedKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedKind::OrderBook => write!(f, "order_book"),
            FeedKind::Trades => write!(f, "trades"),
        }
    }
}

/// Fields reported for one instrument pair.
///
/// Values are kept as the text the exchange sent and only parsed when a
/// condition or action asks for them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentRecord {
    fields: BTreeMap<String, String>,
}

impl InstrumentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    /// Raw text of a field
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Field parsed as a decimal; `None` when absent or not a number
    pub fn decimal(&self, name: &str) -> Option<Decimal> {
        self.raw(name).and_then(|v| Decimal::from_str(v.trim()).ok())
    }

    pub fn bid_top(&self) -> Option<Decimal> {
        self.decimal(BID_TOP)
    }

    pub fn ask_top(&self) -> Option<Decimal> {
        self.decimal(ASK_TOP)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One poll result: instrument pair -> record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Feed this snapshot was read from
    pub feed: FeedKind,
    /// Per-pair records
    pub instruments: HashMap<String, InstrumentRecord>,
    /// When the response was received
    pub received_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn new(feed: FeedKind, instruments: HashMap<String, InstrumentRecord>) -> Self {
        Self {
            feed,
            instruments,
            received_at: Utc::now(),
        }
    }

    /// Record for a pair, `None` if the feed did not report it
    pub fn instrument(&self, pair: &str) -> Option<&InstrumentRecord> {
        self.instruments.get(pair)
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }
}
