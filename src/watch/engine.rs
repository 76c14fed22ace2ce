//! Polling engine: fetch → evaluate → act → sweep → sleep

use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use super::factory::WatchFactory;
use super::registry::WatchRegistry;
use super::types::Watch;
use crate::common::channels::EngineEvent;
use crate::common::traits::DataSource;
use crate::common::types::{FeedKind, Snapshot, WatchId};

/// Default sleep between cycles
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// What one cycle did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Whether the data source returned a snapshot
    pub fetched: bool,
    /// Watches whose condition was checked
    pub evaluated: usize,
    /// Ids whose condition held (action attempted), in evaluation order
    pub fired: Vec<WatchId>,
    /// Ids whose action returned an error
    pub failed_actions: Vec<WatchId>,
    /// Fired watches actually removed by the sweep
    pub retired: usize,
}

/// Drives one data source against one registry.
///
/// Cycles never overlap: `run` awaits each cycle and the sleep before
/// starting the next fetch. Nothing inside the loop can end it; fetch and
/// action failures are logged, published as [`EngineEvent`]s and the loop
/// moves on.
pub struct PollingEngine {
    source: Arc<dyn DataSource>,
    registry: WatchRegistry,
    pairs: Vec<String>,
    interval: Duration,
    events: Option<mpsc::Sender<EngineEvent>>,
}

impl PollingEngine {
    /// Create an engine with its own empty registry
    pub fn new(source: Arc<dyn DataSource>, pairs: Vec<String>) -> Self {
        Self::with_registry(source, pairs, WatchRegistry::new())
    }

    pub fn with_registry(
        source: Arc<dyn DataSource>,
        pairs: Vec<String>,
        registry: WatchRegistry,
    ) -> Self {
        Self {
            source,
            registry,
            pairs,
            interval: DEFAULT_POLL_INTERVAL,
            events: None,
        }
    }

    /// Set the sleep between cycles
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Publish fired/failed notifications on a channel
    pub fn with_event_sender(mut self, sender: mpsc::Sender<EngineEvent>) -> Self {
        self.events = Some(sender);
        self
    }

    pub fn feed(&self) -> FeedKind {
        self.source.feed()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn registry(&self) -> &WatchRegistry {
        &self.registry
    }

    /// Factory registering into this engine's registry
    pub fn factory(&self) -> WatchFactory {
        WatchFactory::new(self.registry.clone())
    }

    /// Run cycles forever
    pub async fn run(self) {
        info!(
            feed = %self.feed(),
            pairs = ?self.pairs,
            every_ms = self.interval.as_millis() as u64,
            "polling engine started"
        );

        loop {
            let report = self.run_cycle().await;
            debug!(
                feed = %self.feed(),
                fetched = report.fetched,
                evaluated = report.evaluated,
                fired = report.fired.len(),
                retired = report.retired,
                "cycle complete"
            );
            tokio::time::sleep(self.interval).await;
        }
    }

    /// One fetch/evaluate/act/sweep pass, without the trailing sleep
    #[instrument(skip(self), fields(feed = %self.feed()))]
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        let snapshot = match self.source.fetch(&self.pairs).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                let transient = e.is_transient();
                if transient {
                    warn!(error = %e, "fetch failed, skipping cycle");
                } else {
                    error!(error = %e, "fetch failed with a non-transient error, skipping cycle");
                }
                self.publish(EngineEvent::FetchFailed {
                    feed: self.feed(),
                    error: e.to_string(),
                    transient,
                    at: Utc::now(),
                });
                return report;
            }
        };
        report.fetched = true;

        let fired = self.evaluate_and_act(&snapshot, &mut report).await;

        // Sweep only after the whole pass; nothing above touches the map.
        report.retired = self.registry.retire(&fired).await;
        report
    }

    async fn evaluate_and_act(
        &self,
        snapshot: &Snapshot,
        report: &mut CycleReport,
    ) -> Vec<(WatchId, Arc<Watch>)> {
        let mut fired = Vec::new();

        for (id, watch) in self.registry.entries().await {
            // Deleted or replaced since the copy was taken
            if !self.registry.is_current(id, &watch).await {
                continue;
            }

            report.evaluated += 1;
            if !watch.check(snapshot) {
                continue;
            }

            report.fired.push(id);
            match watch.perform(snapshot).await {
                Ok(()) => {
                    info!(%id, "watch fired");
                    self.publish(EngineEvent::WatchFired {
                        feed: self.feed(),
                        id,
                        at: Utc::now(),
                    });
                }
                Err(e) => {
                    warn!(%id, error = %e, "watch action failed, retiring anyway");
                    report.failed_actions.push(id);
                    self.publish(EngineEvent::ActionFailed {
                        feed: self.feed(),
                        id,
                        error: e.to_string(),
                        at: Utc::now(),
                    });
                }
            }
            fired.push((id, watch));
        }

        fired
    }

    /// Never blocks the loop: a full or closed channel drops the event
    fn publish(&self, event: EngineEvent) {
        if let Some(sender) = &self.events {
            if let Err(e) = sender.try_send(event) {
                debug!(error = %e, "engine event dropped");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::channels::create_event_channel;
    use crate::common::errors::{ClientError, Result};
    use crate::common::traits::MockDataSource;
    use crate::common::types::InstrumentRecord;
    use crate::watch::traits::Action;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Clone, Default)]
    struct Counter(Arc<AtomicUsize>);

    impl Counter {
        fn get(&self) -> usize {
            self.0.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Action for Counter {
        async fn perform(&self, _snapshot: &Snapshot) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Failing;

    #[async_trait]
    impl Action for Failing {
        async fn perform(&self, _snapshot: &Snapshot) -> Result<()> {
            Err(ClientError::Notification("bot was blocked".to_string()))
        }
    }

    fn snapshot() -> Snapshot {
        let record = InstrumentRecord::new()
            .with_field("bid_top", "9000")
            .with_field("ask_top", "9010");
        Snapshot::new(
            FeedKind::OrderBook,
            HashMap::from([("BTC_USD".to_string(), record)]),
        )
    }

    fn source_ok() -> MockDataSource {
        let mut source = MockDataSource::new();
        source.expect_fetch().returning(|_| Ok(snapshot()));
        source.expect_feed().return_const(FeedKind::OrderBook);
        source
    }

    fn engine(source: MockDataSource) -> PollingEngine {
        PollingEngine::new(Arc::new(source), vec!["BTC_USD".to_string()])
    }

    #[tokio::test]
    async fn test_true_condition_fires_once_and_retires() {
        let engine = engine(source_ok());
        let counter = Counter::default();
        engine
            .factory()
            .create(WatchId(1), counter.clone(), |_: &Snapshot| true)
            .await;

        let report = engine.run_cycle().await;
        assert_eq!(report.fired, vec![WatchId(1)]);
        assert_eq!(report.retired, 1);
        assert_eq!(counter.get(), 1);
        assert!(engine.registry().is_empty().await);

        let report = engine.run_cycle().await;
        assert_eq!(report.evaluated, 0);
        assert_eq!(counter.get(), 1);
    }

    #[tokio::test]
    async fn test_false_condition_stays_registered() {
        let engine = engine(source_ok());
        let counter = Counter::default();
        engine
            .factory()
            .create(WatchId(1), counter.clone(), |_: &Snapshot| false)
            .await;

        for _ in 0..5 {
            let report = engine.run_cycle().await;
            assert_eq!(report.evaluated, 1);
            assert!(report.fired.is_empty());
        }
        assert_eq!(counter.get(), 0);
        assert!(engine.registry().contains(WatchId(1)).await);
    }

    #[tokio::test]
    async fn test_fetch_failure_skips_evaluation() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Err(ClientError::Timeout("order_book".to_string())));
        source.expect_feed().return_const(FeedKind::OrderBook);

        let (tx, mut rx) = create_event_channel();
        let engine = engine(source).with_event_sender(tx);
        let counter = Counter::default();
        engine
            .factory()
            .create(WatchId(1), counter.clone(), |_: &Snapshot| true)
            .await;

        let report = engine.run_cycle().await;
        assert!(!report.fetched);
        assert_eq!(report.evaluated, 0);
        assert_eq!(counter.get(), 0);
        assert!(engine.registry().contains(WatchId(1)).await);
        assert!(matches!(
            rx.try_recv(),
            Ok(EngineEvent::FetchFailed {
                transient: true,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_non_transient_fetch_error_is_flagged_and_skipped() {
        let mut source = MockDataSource::new();
        source
            .expect_fetch()
            .times(2)
            .returning(|_| Err(ClientError::Internal("feed misconfigured".to_string())));
        source.expect_feed().return_const(FeedKind::OrderBook);

        let (tx, mut rx) = create_event_channel();
        let engine = engine(source).with_event_sender(tx);
        let counter = Counter::default();
        engine
            .factory()
            .create(WatchId(1), counter.clone(), |_: &Snapshot| true)
            .await;

        for _ in 0..2 {
            let report = engine.run_cycle().await;
            assert!(!report.fetched);
        }
        assert_eq!(counter.get(), 0);
        assert!(engine.registry().contains(WatchId(1)).await);
        match rx.try_recv() {
            Ok(EngineEvent::FetchFailed {
                transient, error, ..
            }) => {
                assert!(!transient);
                assert!(error.contains("feed misconfigured"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_action_is_retired_and_does_not_block_others() {
        let (tx, mut rx) = create_event_channel();
        let engine = engine(source_ok()).with_event_sender(tx);
        let counter = Counter::default();
        let factory = engine.factory();
        factory.create(WatchId(1), Failing, |_: &Snapshot| true).await;
        factory.create(WatchId(2), counter.clone(), |_: &Snapshot| true).await;

        let report = engine.run_cycle().await;
        assert_eq!(report.failed_actions, vec![WatchId(1)]);
        assert_eq!(report.fired.len(), 2);
        assert_eq!(counter.get(), 1);
        assert!(engine.registry().is_empty().await);

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .any(|e| matches!(e, EngineEvent::ActionFailed { id: WatchId(1), .. })));
    }

    #[tokio::test]
    async fn test_replacement_is_the_only_one_evaluated() {
        let engine = engine(source_ok());
        let first = Counter::default();
        let second = Counter::default();
        let factory = engine.factory();
        factory.create(WatchId(5), first.clone(), |_: &Snapshot| true).await;
        factory.create(WatchId(5), second.clone(), |_: &Snapshot| true).await;
        assert_eq!(engine.registry().len().await, 1);

        engine.run_cycle().await;
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[tokio::test]
    async fn test_closed_event_channel_does_not_stop_cycle() {
        let (tx, rx) = create_event_channel();
        drop(rx);
        let engine = engine(source_ok()).with_event_sender(tx);
        engine
            .factory()
            .create(WatchId(1), Counter::default(), |_: &Snapshot| true)
            .await;

        let report = engine.run_cycle().await;
        assert_eq!(report.retired, 1);
    }
}
