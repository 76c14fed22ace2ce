//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::common::errors::{ClientError, Result};

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// EXMO public API configuration
    #[serde(default)]
    pub exmo: ExmoConfig,
    /// Telegram bot configuration (alerts are only logged without it)
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

impl AppConfig {
    /// Reject settings the engines cannot run with
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.exmo.rest_url)
            .map_err(|e| ClientError::Configuration(format!("exmo.rest_url: {}", e)))?;

        if self.exmo.pairs.is_empty() {
            return Err(ClientError::Configuration(
                "exmo.pairs must name at least one pair".to_string(),
            ));
        }

        if let Some(telegram) = &self.telegram {
            Url::parse(&telegram.api_url)
                .map_err(|e| ClientError::Configuration(format!("telegram.api_url: {}", e)))?;
            if telegram.token.trim().is_empty() {
                return Err(ClientError::Configuration(
                    "telegram.token can't be blank".to_string(),
                ));
            }
        }

        if self.settings.poll_interval_seconds == 0 {
            return Err(ClientError::Configuration(
                "settings.poll_interval_seconds must be positive".to_string(),
            ));
        }
        if self.settings.monitor_interval_seconds == 0 {
            return Err(ClientError::Configuration(
                "settings.monitor_interval_seconds must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

/// EXMO public API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExmoConfig {
    /// Base URL for the public REST API
    #[serde(default = "default_exmo_rest_url")]
    pub rest_url: String,
    /// Pairs requested on every poll
    #[serde(default = "default_pairs")]
    pub pairs: Vec<String>,
    /// Depth requested from the order book endpoint
    #[serde(default = "default_order_book_limit")]
    pub order_book_limit: u32,
}

impl Default for ExmoConfig {
    fn default() -> Self {
        Self {
            rest_url: default_exmo_rest_url(),
            pairs: default_pairs(),
            order_book_limit: default_order_book_limit(),
        }
    }
}

fn default_exmo_rest_url() -> String {
    "https://api.exmo.com/v1.1".to_string()
}

fn default_pairs() -> Vec<String> {
    vec!["BTC_USD".to_string()]
}

fn default_order_book_limit() -> u32 {
    100
}

/// Telegram bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot token
    pub token: String,
    /// Bot API base URL
    #[serde(default = "default_telegram_api_url")]
    pub api_url: String,
    /// Chat used by the console command loop
    #[serde(default)]
    pub default_chat_id: Option<i64>,
}

fn default_telegram_api_url() -> String {
    "https://api.telegram.org".to_string()
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Sleep between polling engine cycles in seconds
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Sleep between single-slot monitor polls in seconds
    #[serde(default = "default_monitor_interval")]
    pub monitor_interval_seconds: u64,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl AppSettings {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_seconds)
    }

    pub fn monitor_interval(&self) -> Duration {
        Duration::from_secs(self.monitor_interval_seconds)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            poll_interval_seconds: default_poll_interval(),
            monitor_interval_seconds: default_monitor_interval(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_poll_interval() -> u64 {
    10
}

fn default_monitor_interval() -> u64 {
    60
}

fn default_request_timeout() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.settings.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.exmo.pairs, vec!["BTC_USD".to_string()]);
        assert!(config.telegram.is_none());
    }

    #[test]
    fn test_zero_poll_interval_is_rejected() {
        let mut config = AppConfig::default();
        config.settings.poll_interval_seconds = 0;
        assert!(matches!(
            config.validate(),
            Err(ClientError::Configuration(_))
        ));
    }

    #[test]
    fn test_blank_token_is_rejected() {
        let config = AppConfig {
            telegram: Some(TelegramConfig {
                token: "  ".to_string(),
                api_url: default_telegram_api_url(),
                default_chat_id: None,
            }),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_rest_url_is_rejected() {
        let mut config = AppConfig::default();
        config.exmo.rest_url = "not a url".to_string();
        assert!(config.validate().is_err());
    }
}
