//! Chat command parsing and handling
//!
//! Every command produces a reply text; failures are reported in the reply
//! instead of being returned, since the chat is the only place a user can
//! see them.

use rust_decimal::Decimal;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::common::errors::{ClientError, Result};
use crate::common::traits::NotificatorProvider;
use crate::common::types::WatchId;
use crate::watch::{
    MonitorOutcome, NotifyAction, SingleSlotMonitor, ThresholdCondition, WatchService,
};

/// A parsed chat command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/threshold <value>`: register (or replace) this chat's watch
    Threshold(Decimal),
    /// `/cancel`: delete this chat's watch
    Cancel,
    /// `/monitor <value>`: start the one-shot monitor, replacing the running one
    Monitor(Decimal),
    /// `/stop`: stop the one-shot monitor
    Stop,
}

impl Command {
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split_whitespace();
        let head = parts
            .next()
            .ok_or_else(|| ClientError::InvalidCommand("empty message".to_string()))?;
        // `/threshold@my_bot` is how group chats address a specific bot
        let name = head.split('@').next().unwrap_or(head);

        let command = match name {
            "/threshold" => Command::Threshold(parse_threshold(parts.next())?),
            "/monitor" => Command::Monitor(parse_threshold(parts.next())?),
            "/cancel" => Command::Cancel,
            "/stop" => Command::Stop,
            other => {
                return Err(ClientError::InvalidCommand(format!(
                    "unknown command `{}`",
                    other
                )))
            }
        };

        if let Some(extra) = parts.next() {
            return Err(ClientError::InvalidCommand(format!(
                "unexpected argument `{}`",
                extra
            )));
        }
        Ok(command)
    }
}

fn parse_threshold(arg: Option<&str>) -> Result<Decimal> {
    let raw = arg.ok_or_else(|| ClientError::InvalidCommand("threshold is missing".to_string()))?;
    Decimal::from_str(raw)
        .map_err(|e| ClientError::InvalidCommand(format!("threshold `{}`: {}", raw, e)))
}

/// Applies commands to the watch service and the one-shot monitor
#[derive(Clone)]
pub struct CommandHandler {
    service: WatchService,
    monitor: Arc<SingleSlotMonitor>,
    notifiers: Arc<dyn NotificatorProvider>,
}

impl CommandHandler {
    pub fn new(
        service: WatchService,
        monitor: Arc<SingleSlotMonitor>,
        notifiers: Arc<dyn NotificatorProvider>,
    ) -> Self {
        Self {
            service,
            monitor,
            notifiers,
        }
    }

    pub fn service(&self) -> &WatchService {
        &self.service
    }

    /// Handle one message from `chat_id` and return the reply
    pub async fn handle(&self, chat_id: i64, text: &str) -> String {
        debug!(chat_id, text, "handling command");
        match self.apply(WatchId(chat_id), text).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(chat_id, error = %e, "command failed");
                format!("Exception was occurred \n{}", e)
            }
        }
    }

    async fn apply(&self, id: WatchId, text: &str) -> Result<String> {
        match Command::parse(text)? {
            Command::Threshold(threshold) => {
                self.service.create_watch(id, threshold).await;
                Ok(format!("Threshold = {} was set.", threshold))
            }
            Command::Cancel => {
                self.service.delete_watch(id).await?;
                Ok("Threshold watch was cancelled.".to_string())
            }
            Command::Monitor(threshold) => {
                let pair = self.service.pair().to_string();
                let condition = ThresholdCondition::new(pair.clone(), threshold).below();
                let action = NotifyAction::new(pair, self.notifiers.notificator_for(id));
                self.monitor.start(condition, action).await;
                Ok(format!("Monitor with threshold = {} was started.", threshold))
            }
            Command::Stop => {
                match self.monitor.stop().await {
                    Some(MonitorOutcome::Cancelled) => Ok("Monitor was stopped.".to_string()),
                    Some(MonitorOutcome::Fired) | None => Ok("No monitor is running.".to_string()),
                }
            }
        }
    }
}
