//! Common test utilities and fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use exmo_watch::common::errors::{ClientError, Result};
use exmo_watch::{
    DataSource, FeedKind, InstrumentRecord, Notificator, NotificatorProvider, Snapshot, WatchId,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Order book snapshot with one pair
pub fn order_book_snapshot(pair: &str, bid_top: &str, ask_top: &str) -> Snapshot {
    let record = InstrumentRecord::new()
        .with_field("bid_top", bid_top)
        .with_field("ask_top", ask_top);
    Snapshot::new(
        FeedKind::OrderBook,
        HashMap::from([(pair.to_string(), record)]),
    )
}

/// Snapshot used by the acceptance scenarios: BTC_USD 9000 / 9010
pub fn scenario_snapshot() -> Snapshot {
    order_book_snapshot("BTC_USD", "9000", "9010")
}

/// Data source replaying a script of results, then repeating the last one
pub struct ScriptedSource {
    feed: FeedKind,
    script: Mutex<VecDeque<Result<Snapshot>>>,
    fallback: Snapshot,
    fetches: AtomicUsize,
}

impl ScriptedSource {
    pub fn always(snapshot: Snapshot) -> Self {
        Self::new(snapshot.feed, Vec::new(), snapshot)
    }

    pub fn new(feed: FeedKind, script: Vec<Result<Snapshot>>, fallback: Snapshot) -> Self {
        Self {
            feed,
            script: Mutex::new(script.into()),
            fallback,
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for ScriptedSource {
    async fn fetch(&self, _pairs: &[String]) -> Result<Snapshot> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(result) => result,
            None => Ok(self.fallback.clone()),
        }
    }

    fn feed(&self) -> FeedKind {
        self.feed
    }
}

/// Transport failure as the feeds report it
pub fn transport_error() -> ClientError {
    ClientError::InvalidResponse("order_book returned status 502 Bad Gateway: ".to_string())
}

/// Notificator that records every message per recipient
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(WatchId, String)>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every notify call fails after recording the attempt
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<(WatchId, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, id: WatchId) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter(|(to, _)| *to == id)
            .map(|(_, message)| message)
            .collect()
    }
}

struct RecordingNotificator {
    recipient: WatchId,
    owner: RecordingNotifier,
}

#[async_trait]
impl Notificator for RecordingNotificator {
    async fn notify(&self, message: &str) -> Result<()> {
        self.owner
            .sent
            .lock()
            .unwrap()
            .push((self.recipient, message.to_string()));
        if self.owner.fail {
            return Err(ClientError::Notification("Forbidden: bot was blocked".to_string()));
        }
        Ok(())
    }
}

impl NotificatorProvider for RecordingNotifier {
    fn notificator_for(&self, recipient: WatchId) -> Arc<dyn Notificator> {
        Arc::new(RecordingNotificator {
            recipient,
            owner: self.clone(),
        })
    }
}

/// Sample API responses for testing
pub mod api_responses {
    /// Order book for BTC_USD
    pub const ORDER_BOOK: &str = r#"{
        "BTC_USD": {
            "ask_quantity": "3",
            "ask_amount": "27030",
            "ask_top": "9010",
            "bid_quantity": "1.5",
            "bid_amount": "13500",
            "bid_top": "9000",
            "ask": [["9010", "3", "27030"]],
            "bid": [["9000", "1.5", "13500"]]
        }
    }"#;

    /// Trade tape for BTC_USD, newest deal second
    pub const TRADES: &str = r#"{
        "BTC_USD": [
            {"trade_id": 10, "type": "sell", "price": "8990", "quantity": "0.1", "amount": "899", "date": 1700000000},
            {"trade_id": 11, "type": "buy", "price": "9005", "quantity": "0.2", "amount": "1801", "date": 1700000060}
        ],
        "ETH_USD": []
    }"#;

    /// Error body EXMO sends with a 200 status
    pub const ERROR: &str = r#"{"result": false, "error": "Error 40005: Authorization error"}"#;

    /// Telegram sendMessage success
    pub const TELEGRAM_OK: &str = r#"{"ok": true, "result": {"message_id": 1}}"#;

    /// Telegram sendMessage failure
    pub const TELEGRAM_FORBIDDEN: &str =
        r#"{"ok": false, "error_code": 403, "description": "Forbidden: bot was blocked by the user"}"#;
}
