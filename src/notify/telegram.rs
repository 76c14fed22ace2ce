//! Telegram Bot API notificator

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::common::errors::{ClientError, Result};
use crate::common::traits::{Notificator, NotificatorProvider};
use crate::common::types::WatchId;
use crate::config::types::TelegramConfig;

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Minimal Bot API client: only `sendMessage` is needed for alerts
#[derive(Debug, Clone)]
pub struct TelegramBot {
    client: Client,
    api_url: String,
    token: String,
}

impl TelegramBot {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        Self::with_timeout(config, Duration::from_secs(30))
    }

    pub fn with_timeout(config: &TelegramConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Send a plain text message to a chat
    #[instrument(skip(self, text))]
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_url, self.token);
        debug!(chat_id, "Sending Telegram message");

        let response = self
            .client
            .post(&url)
            .json(&SendMessageRequest { chat_id, text })
            .send()
            .await
            .map_err(|e| ClientError::Notification(e.to_string()))?;

        let status = response.status();
        let body: BotApiResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Notification(format!("status {}: {}", status, e)))?;

        if !status.is_success() || !body.ok {
            return Err(ClientError::Notification(format!(
                "sendMessage to {} failed with status {}: {}",
                chat_id,
                status,
                body.description.unwrap_or_default()
            )));
        }

        Ok(())
    }
}

impl NotificatorProvider for TelegramBot {
    fn notificator_for(&self, recipient: WatchId) -> Arc<dyn Notificator> {
        Arc::new(TelegramNotificator::new(self.clone(), recipient.0))
    }
}

/// Sends alerts to one chat
#[derive(Debug, Clone)]
pub struct TelegramNotificator {
    bot: TelegramBot,
    chat_id: i64,
}

impl TelegramNotificator {
    pub fn new(bot: TelegramBot, chat_id: i64) -> Self {
        Self { bot, chat_id }
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }
}

#[async_trait]
impl Notificator for TelegramNotificator {
    async fn notify(&self, message: &str) -> Result<()> {
        self.bot.send_message(self.chat_id, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url_normalization() {
        let bot = TelegramBot::new(&TelegramConfig {
            token: "123:abc".to_string(),
            api_url: "https://api.telegram.org/".to_string(),
            default_chat_id: None,
        })
        .unwrap();
        assert_eq!(bot.api_url, "https://api.telegram.org");
    }
}
