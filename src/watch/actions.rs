use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use super::traits::Action;
use crate::common::errors::Result;
use crate::common::traits::Notificator;
use crate::common::types::{InstrumentRecord, Snapshot, ASK_TOP, BID_TOP};

/// Alert text for one instrument record
pub fn format_alert(record: &InstrumentRecord) -> String {
    format!(
        "ALARM!\nbid_top:\t {}\nask_top:\t {}",
        display_field(record, BID_TOP),
        display_field(record, ASK_TOP)
    )
}

fn display_field(record: &InstrumentRecord, name: &str) -> String {
    match (record.decimal(name), record.raw(name)) {
        (Some(value), _) => value.to_string(),
        (None, Some(raw)) => raw.to_string(),
        (None, None) => "n/a".to_string(),
    }
}

/// Sends the pair's top of book through a notificator
#[derive(Clone)]
pub struct NotifyAction {
    pair: String,
    notificator: Arc<dyn Notificator>,
}

impl NotifyAction {
    pub fn new(pair: impl Into<String>, notificator: Arc<dyn Notificator>) -> Self {
        Self {
            pair: pair.into(),
            notificator,
        }
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }
}

impl std::fmt::Debug for NotifyAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyAction")
            .field("pair", &self.pair)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Action for NotifyAction {
    async fn perform(&self, snapshot: &Snapshot) -> Result<()> {
        let Some(record) = snapshot.instrument(&self.pair) else {
            debug!(pair = %self.pair, "No data for pair, nothing to send");
            return Ok(());
        };

        self.notificator.notify(&format_alert(record)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::ClientError;
    use crate::common::traits::MockNotificator;
    use crate::common::types::FeedKind;
    use std::collections::HashMap;

    fn snapshot() -> Snapshot {
        let record = InstrumentRecord::new()
            .with_field("bid_top", "9000")
            .with_field("ask_top", "9010");
        Snapshot::new(
            FeedKind::OrderBook,
            HashMap::from([("BTC_USD".to_string(), record)]),
        )
    }

    #[test]
    fn test_format_alert() {
        let record = InstrumentRecord::new()
            .with_field("bid_top", "9000")
            .with_field("ask_top", "9010");
        assert_eq!(format_alert(&record), "ALARM!\nbid_top:\t 9000\nask_top:\t 9010");
    }

    #[test]
    fn test_format_alert_without_ask() {
        let record = InstrumentRecord::new().with_field("bid_top", "1.5");
        assert_eq!(format_alert(&record), "ALARM!\nbid_top:\t 1.5\nask_top:\t n/a");
    }

    #[test]
    fn test_format_alert_keeps_unparseable_text() {
        let record = InstrumentRecord::new()
            .with_field("bid_top", "9000")
            .with_field("ask_top", "9 010,5");
        assert_eq!(
            format_alert(&record),
            "ALARM!\nbid_top:\t 9000\nask_top:\t 9 010,5"
        );
    }

    #[tokio::test]
    async fn test_perform_sends_alert() {
        let mut notificator = MockNotificator::new();
        notificator
            .expect_notify()
            .withf(|message| message.contains("9000") && message.contains("9010"))
            .times(1)
            .returning(|_| Ok(()));

        let action = NotifyAction::new("BTC_USD", Arc::new(notificator));
        assert!(action.perform(&snapshot()).await.is_ok());
    }

    #[tokio::test]
    async fn test_missing_pair_sends_nothing() {
        let mut notificator = MockNotificator::new();
        notificator.expect_notify().times(0);

        let action = NotifyAction::new("ETH_USD", Arc::new(notificator));
        assert!(action.perform(&snapshot()).await.is_ok());
    }

    #[tokio::test]
    async fn test_notify_failure_is_returned() {
        let mut notificator = MockNotificator::new();
        notificator
            .expect_notify()
            .returning(|_| Err(ClientError::Notification("chat not found".to_string())));

        let action = NotifyAction::new("BTC_USD", Arc::new(notificator));
        let result = action.perform(&snapshot()).await;
        assert!(matches!(result, Err(ClientError::Notification(_))));
    }
}
