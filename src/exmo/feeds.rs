//! Data sources backed by the EXMO REST client

use async_trait::async_trait;
use std::collections::HashMap;

use super::messages::{OrderBookEntry, TradeEntry};
use super::rest::ExmoRestClient;
use crate::common::errors::Result;
use crate::common::traits::DataSource;
use crate::common::types::{FeedKind, InstrumentRecord, Snapshot, ASK_TOP, BID_TOP};

/// Top-of-book snapshots from the `order_book` endpoint
#[derive(Debug, Clone)]
pub struct OrderBookFeed {
    client: ExmoRestClient,
    limit: Option<u32>,
}

impl OrderBookFeed {
    pub fn new(client: ExmoRestClient, limit: Option<u32>) -> Self {
        Self { client, limit }
    }
}

#[async_trait]
impl DataSource for OrderBookFeed {
    async fn fetch(&self, pairs: &[String]) -> Result<Snapshot> {
        let book = self.client.order_book(pairs, self.limit).await?;
        let instruments = book
            .into_iter()
            .map(|(pair, entry)| (pair, order_book_record(entry)))
            .collect();
        Ok(Snapshot::new(FeedKind::OrderBook, instruments))
    }

    fn feed(&self) -> FeedKind {
        FeedKind::OrderBook
    }
}

/// Depth arrays are dropped; only the scalar summary survives.
fn order_book_record(entry: OrderBookEntry) -> InstrumentRecord {
    InstrumentRecord::new()
        .with_field(BID_TOP, entry.bid_top)
        .with_field(ASK_TOP, entry.ask_top)
        .with_field("bid_quantity", entry.bid_quantity)
        .with_field("ask_quantity", entry.ask_quantity)
        .with_field("bid_amount", entry.bid_amount)
        .with_field("ask_amount", entry.ask_amount)
}

/// Last-deal snapshots from the `trades` endpoint
#[derive(Debug, Clone)]
pub struct TradesFeed {
    client: ExmoRestClient,
}

impl TradesFeed {
    pub fn new(client: ExmoRestClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl DataSource for TradesFeed {
    async fn fetch(&self, pairs: &[String]) -> Result<Snapshot> {
        let tape = self.client.trades(pairs).await?;
        let instruments: HashMap<String, InstrumentRecord> = tape
            .into_iter()
            .filter_map(|(pair, trades)| {
                let latest = trades.into_iter().max_by_key(|t| (t.date, t.trade_id))?;
                Some((pair, trade_record(latest)))
            })
            .collect();
        Ok(Snapshot::new(FeedKind::Trades, instruments))
    }

    fn feed(&self) -> FeedKind {
        FeedKind::Trades
    }
}

fn trade_record(trade: TradeEntry) -> InstrumentRecord {
    InstrumentRecord::new()
        .with_field("trade_id", trade.trade_id.to_string())
        .with_field("type", trade.side)
        .with_field("price", trade.price)
        .with_field("quantity", trade.quantity)
        .with_field("amount", trade.amount)
        .with_field("date", trade.date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_order_book_record_keeps_tops() {
        let entry = OrderBookEntry {
            ask_quantity: "3".into(),
            ask_amount: "27030".into(),
            ask_top: "9010".into(),
            bid_quantity: "1".into(),
            bid_amount: "9000".into(),
            bid_top: "9000".into(),
            ask: vec![vec!["9010".into(), "3".into(), "27030".into()]],
            bid: vec![],
        };
        let record = order_book_record(entry);
        assert_eq!(record.bid_top(), Some(dec!(9000)));
        assert_eq!(record.ask_top(), Some(dec!(9010)));
        assert_eq!(record.len(), 6);
    }

    #[test]
    fn test_trade_record_fields() {
        let record = trade_record(TradeEntry {
            trade_id: 7,
            side: "buy".into(),
            price: "9005.5".into(),
            quantity: "0.1".into(),
            amount: "900.55".into(),
            date: 1_700_000_000,
        });
        assert_eq!(record.decimal("price"), Some(dec!(9005.5)));
        assert_eq!(record.raw("type"), Some("buy"));
        assert!(record.bid_top().is_none());
    }
}
