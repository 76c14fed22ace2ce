//! Configuration loader

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use super::types::{AppConfig, AppSettings, ExmoConfig, TelegramConfig};
use crate::common::errors::{ClientError, Result};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables prefixed with EXMO_ (`exmo` section only)
/// 2. Environment variables prefixed with APP_
/// 3. Configuration file (TOML format)
/// 4. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    // Nested keys use a double underscore: APP_EXMO__PAIRS=BTC_USD,ETH_USD
    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("exmo.pairs"),
    );

    // EXMO_REST_URL, EXMO_PAIRS and EXMO_ORDER_BOOK_LIMIT land in `exmo`
    let exmo = exmo_env_overrides()?;
    builder = builder
        .set_override_option("exmo.rest_url", exmo.rest_url)
        .and_then(|b| b.set_override_option("exmo.pairs", exmo.pairs))
        .and_then(|b| {
            b.set_override_option("exmo.order_book_limit", exmo.order_book_limit.map(i64::from))
        })
        .map_err(|e| ClientError::Configuration(e.to_string()))?;

    let config = builder
        .build()
        .map_err(|e| ClientError::Configuration(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ClientError::Configuration(e.to_string()))?;

    app_config.validate()?;
    Ok(app_config)
}

/// Load `config_path` if the file exists, otherwise fall back to
/// [`load_from_env`]
pub fn load_config_or_env(config_path: &str) -> Result<AppConfig> {
    if Path::new(config_path).exists() {
        load_config(Some(config_path))
    } else {
        load_from_env()
    }
}

#[derive(Debug, Default, Deserialize)]
struct ExmoEnv {
    rest_url: Option<String>,
    pairs: Option<Vec<String>>,
    order_book_limit: Option<u32>,
}

fn exmo_env_overrides() -> Result<ExmoEnv> {
    Config::builder()
        .add_source(
            Environment::with_prefix("EXMO")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("pairs"),
        )
        .build()
        .and_then(|c| c.try_deserialize())
        .map_err(|e| ClientError::Configuration(e.to_string()))
}

/// Load configuration from environment variables only
pub fn load_from_env() -> Result<AppConfig> {
    // Try to load from .env file
    dotenvy::dotenv().ok();

    let defaults = ExmoConfig::default();
    let exmo = ExmoConfig {
        rest_url: std::env::var("EXMO_REST_URL").unwrap_or(defaults.rest_url),
        pairs: std::env::var("EXMO_PAIRS")
            .map(|s| {
                s.split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.pairs),
        order_book_limit: parse_env("EXMO_ORDER_BOOK_LIMIT")?.unwrap_or(defaults.order_book_limit),
    };

    let telegram = match std::env::var("TELEGRAM_TOKEN") {
        Ok(token) => Some(TelegramConfig {
            token,
            api_url: std::env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| "https://api.telegram.org".to_string()),
            default_chat_id: parse_env("TELEGRAM_CHAT_ID")?,
        }),
        Err(_) => None,
    };

    let mut settings = AppSettings::default();
    if let Some(seconds) = parse_env("POLL_INTERVAL_SECONDS")? {
        settings.poll_interval_seconds = seconds;
    }
    if let Some(seconds) = parse_env("MONITOR_INTERVAL_SECONDS")? {
        settings.monitor_interval_seconds = seconds;
    }
    if let Some(seconds) = parse_env("REQUEST_TIMEOUT_SECONDS")? {
        settings.request_timeout_seconds = seconds;
    }
    if let Ok(level) = std::env::var("LOG_LEVEL") {
        settings.log_level = level;
    }

    let config = AppConfig {
        exmo,
        telegram,
        settings,
    };
    config.validate()?;
    Ok(config)
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ClientError::Configuration(format!("{} is not valid: {}", name, raw))),
        Err(_) => Ok(None),
    }
}
