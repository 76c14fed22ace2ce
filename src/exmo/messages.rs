//! EXMO public API message types

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Error body EXMO returns with a 200 status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub result: bool,
    #[serde(default)]
    pub error: String,
}

/// Order book for one pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderBookEntry {
    pub ask_quantity: String,
    pub ask_amount: String,
    pub ask_top: String,
    pub bid_quantity: String,
    pub bid_amount: String,
    pub bid_top: String,
    /// Ask levels as `[price, quantity, amount]`
    #[serde(default)]
    pub ask: Vec<Vec<String>>,
    /// Bid levels as `[price, quantity, amount]`
    #[serde(default)]
    pub bid: Vec<Vec<String>>,
}

/// `order_book` response keyed by pair
pub type OrderBookResponse = HashMap<String, OrderBookEntry>;

/// One deal from the trade tape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeEntry {
    pub trade_id: u64,
    /// "buy" or "sell"
    #[serde(rename = "type")]
    pub side: String,
    pub price: String,
    pub quantity: String,
    pub amount: String,
    /// Unix timestamp in seconds
    pub date: i64,
}

/// `trades` response keyed by pair
pub type TradesResponse = HashMap<String, Vec<TradeEntry>>;

/// Ticker statistics for one pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerEntry {
    pub buy_price: String,
    pub sell_price: String,
    pub last_trade: String,
    pub high: String,
    pub low: String,
    pub avg: String,
    pub vol: String,
    pub vol_curr: String,
    pub updated: i64,
}

/// `ticker` response keyed by pair
pub type TickerResponse = HashMap<String, TickerEntry>;
