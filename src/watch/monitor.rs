//! One-shot monitor with a single process-wide slot
//!
//! Starting a monitor cancels whichever monitor currently holds the slot.
//! Cancellation is cooperative: the old task notices it at its next fetch
//! or sleep and exits without polling again.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::traits::{Action, Condition};
use crate::common::traits::DataSource;

/// How a monitor task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorOutcome {
    /// The condition held and the action ran (successfully or not)
    Fired,
    /// Superseded or stopped before the condition held
    Cancelled,
}

struct MonitorHandle {
    generation: u64,
    shutdown_tx: mpsc::Sender<()>,
    task: JoinHandle<MonitorOutcome>,
}

impl MonitorHandle {
    /// Signal the task and wait for it to end.
    ///
    /// A task that already fired ignores the signal and reports `Fired`.
    async fn finish(self) -> MonitorOutcome {
        let generation = self.generation;
        let _ = self.shutdown_tx.try_send(());
        match self.task.await {
            Ok(outcome) => {
                debug!(generation, ?outcome, "monitor ended");
                outcome
            }
            Err(e) => {
                error!(generation, error = %e, "monitor task failed");
                MonitorOutcome::Cancelled
            }
        }
    }
}

#[derive(Default)]
struct Slot {
    current: Option<MonitorHandle>,
    generation: u64,
}

/// Owner of the single monitor slot
pub struct SingleSlotMonitor {
    source: Arc<dyn DataSource>,
    pairs: Vec<String>,
    interval: Duration,
    slot: Mutex<Slot>,
}

impl SingleSlotMonitor {
    pub fn new(source: Arc<dyn DataSource>, pairs: Vec<String>, interval: Duration) -> Self {
        Self {
            source,
            pairs,
            interval,
            slot: Mutex::new(Slot::default()),
        }
    }

    /// Cancel the running monitor, if any, and start a new one.
    ///
    /// Returns the new monitor's generation number.
    pub async fn start(
        &self,
        condition: impl Condition + 'static,
        action: impl Action + 'static,
    ) -> u64 {
        let mut slot = self.slot.lock().await;
        if let Some(previous) = slot.current.take() {
            let outcome = previous.finish().await;
            info!(?outcome, "previous monitor replaced");
        }

        slot.generation += 1;
        let generation = slot.generation;
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let task = tokio::spawn(run_monitor(
            Arc::clone(&self.source),
            self.pairs.clone(),
            self.interval,
            Box::new(condition),
            Box::new(action),
            shutdown_rx,
        ));

        info!(generation, "monitor started");
        slot.current = Some(MonitorHandle {
            generation,
            shutdown_tx,
            task,
        });
        generation
    }

    /// Cancel the monitor holding the slot and report how it ended.
    ///
    /// `Some(Cancelled)` means it was still polling and has now stopped,
    /// `Some(Fired)` that it had already fired, `None` that the slot was empty.
    pub async fn stop(&self) -> Option<MonitorOutcome> {
        let mut slot = self.slot.lock().await;
        match slot.current.take() {
            Some(handle) => Some(handle.finish().await),
            None => None,
        }
    }

    /// Whether a monitor is scheduled and has not finished yet
    pub async fn is_active(&self) -> bool {
        let slot = self.slot.lock().await;
        slot.current
            .as_ref()
            .map(|handle| !handle.task.is_finished())
            .unwrap_or(false)
    }

    /// Generation of the monitor holding the slot, finished or not
    pub async fn current_generation(&self) -> Option<u64> {
        self.slot.lock().await.current.as_ref().map(|h| h.generation)
    }
}

async fn run_monitor(
    source: Arc<dyn DataSource>,
    pairs: Vec<String>,
    interval: Duration,
    condition: Box<dyn Condition>,
    action: Box<dyn Action>,
    mut shutdown_rx: mpsc::Receiver<()>,
) -> MonitorOutcome {
    loop {
        let fetched = tokio::select! {
            biased;
            _ = shutdown_rx.recv() => return MonitorOutcome::Cancelled,
            result = source.fetch(&pairs) => result,
        };

        match fetched {
            Ok(snapshot) if condition.check(&snapshot) => {
                if let Err(e) = action.perform(&snapshot).await {
                    warn!(error = %e, "monitor action failed");
                }
                info!("monitor fired");
                return MonitorOutcome::Fired;
            }
            Ok(_) => {}
            Err(e) => warn!(error = %e, "monitor fetch failed"),
        }

        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => return MonitorOutcome::Cancelled,
            _ = tokio::time::sleep(interval) => {}
        }
    }
}
