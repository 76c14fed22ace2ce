//! Application wiring: two polling engines, the watch service and the
//! one-shot monitor

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::commands::CommandHandler;
use crate::common::channels::EngineEvent;
use crate::common::errors::{ClientError, Result};
use crate::common::traits::{DataSource, NotificatorProvider};
use crate::config::types::AppConfig;
use crate::exmo::{ExmoRestClient, OrderBookFeed, TradesFeed};
use crate::watch::{PollingEngine, SingleSlotMonitor, WatchFactory, WatchService};

/// Both engines plus the registration surface, not yet running
pub struct Application {
    order_book: PollingEngine,
    trades: PollingEngine,
    commands: CommandHandler,
}

impl Application {
    /// Build the application against the EXMO public API
    pub fn new(config: &AppConfig, notifiers: Arc<dyn NotificatorProvider>) -> Result<Self> {
        config.validate()?;
        let client =
            ExmoRestClient::with_timeout(&config.exmo.rest_url, config.settings.request_timeout())?;

        let order_book = Arc::new(OrderBookFeed::new(
            client.clone(),
            Some(config.exmo.order_book_limit),
        ));
        let trades = Arc::new(TradesFeed::new(client));

        Self::with_sources(config, order_book, trades, notifiers)
    }

    /// Build the application with explicit data sources
    pub fn with_sources(
        config: &AppConfig,
        order_book: Arc<dyn DataSource>,
        trades: Arc<dyn DataSource>,
        notifiers: Arc<dyn NotificatorProvider>,
    ) -> Result<Self> {
        let pairs = config.exmo.pairs.clone();
        let watched_pair = pairs
            .first()
            .cloned()
            .ok_or_else(|| ClientError::Configuration("no pair to watch".to_string()))?;
        let interval = config.settings.poll_interval();

        let monitor = Arc::new(SingleSlotMonitor::new(
            Arc::clone(&order_book),
            pairs.clone(),
            config.settings.monitor_interval(),
        ));
        let order_book = PollingEngine::new(order_book, pairs.clone()).with_interval(interval);
        let trades = PollingEngine::new(trades, pairs).with_interval(interval);

        let service = WatchService::new(order_book.factory(), watched_pair, Arc::clone(&notifiers));
        let commands = CommandHandler::new(service, monitor, notifiers);

        Ok(Self {
            order_book,
            trades,
            commands,
        })
    }

    /// Publish engine events from both engines on `sender`
    pub fn with_event_sender(mut self, sender: mpsc::Sender<EngineEvent>) -> Self {
        self.order_book = self.order_book.with_event_sender(sender.clone());
        self.trades = self.trades.with_event_sender(sender);
        self
    }

    pub fn commands(&self) -> &CommandHandler {
        &self.commands
    }

    /// Factory for watches on the trade tape engine
    pub fn trades_watches(&self) -> WatchFactory {
        self.trades.factory()
    }

    /// Spawn both engines
    pub fn spawn(self) -> RunningApplication {
        let order_book = tokio::spawn(self.order_book.run());
        let trades = tokio::spawn(self.trades.run());
        info!("order book and trades engines spawned");

        RunningApplication {
            commands: self.commands,
            handles: vec![order_book, trades],
        }
    }
}

/// Handle to the spawned engines
pub struct RunningApplication {
    commands: CommandHandler,
    handles: Vec<JoinHandle<()>>,
}

impl RunningApplication {
    pub fn commands(&self) -> &CommandHandler {
        &self.commands
    }

    /// Whether every engine task is still alive
    pub fn is_running(&self) -> bool {
        self.handles.iter().all(|h| !h.is_finished())
    }

    /// Abort the engines and wait for them to unwind
    pub async fn shutdown(self) {
        for handle in &self.handles {
            handle.abort();
        }
        for handle in self.handles {
            match handle.await {
                Err(e) if e.is_panic() => error!("engine task panicked: {:?}", e),
                _ => {}
            }
        }
        info!("engines stopped");
    }
}
