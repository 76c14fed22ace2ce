//! EXMO module - Public REST client and the feeds built on it

pub mod feeds;
pub mod messages;
pub mod rest;

pub use feeds::{OrderBookFeed, TradesFeed};
pub use rest::ExmoRestClient;
