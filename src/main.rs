//! exmo_watch - Main Entry Point
//!
//! Runs the order book and trades polling engines and reads chat-style
//! commands (`/threshold 8000`, `/cancel`, ...) from stdin.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use exmo_watch::common::channels::{create_event_channel, EngineEvent};
use exmo_watch::config::load_config_or_env;
use exmo_watch::{Application, LogNotifier, NotificatorProvider, TelegramBot};

/// CLI arguments for the application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Chat id that stdin commands are issued from
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    chat_id: Option<i64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    // Without a config file, fall back to plain environment variables
    let config = load_config_or_env(&args.config)?;

    // Initialize logging
    let level = tracing_level(
        args.log_level
            .as_deref()
            .unwrap_or(&config.settings.log_level),
    );

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting exmo_watch");
    info!("Configuration file: {}", args.config);

    let notifiers: Arc<dyn NotificatorProvider> = match &config.telegram {
        Some(telegram) => {
            info!("Alerts go to Telegram");
            Arc::new(TelegramBot::with_timeout(
                telegram,
                config.settings.request_timeout(),
            )?)
        }
        None => {
            warn!("No Telegram configuration, alerts are only logged");
            Arc::new(LogNotifier)
        }
    };

    let chat_id = args
        .chat_id
        .or_else(|| config.telegram.as_ref().and_then(|t| t.default_chat_id))
        .unwrap_or(0);

    let (event_tx, mut event_rx) = create_event_channel();
    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            match event {
                EngineEvent::ActionFailed { feed, id, error, .. } => {
                    warn!(%feed, %id, %error, "alert could not be delivered")
                }
                EngineEvent::FetchFailed {
                    feed,
                    error,
                    transient: false,
                    ..
                } => error!(%feed, %error, "feed is failing persistently"),
                other => info!(?other, "engine event"),
            }
        }
    });

    let app = Application::new(&config, notifiers)?
        .with_event_sender(event_tx)
        .spawn();

    info!(chat_id, "Application initialized, reading commands from stdin");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) if line.trim().is_empty() => continue,
                    Some(line) => {
                        let reply = app.commands().handle(chat_id, &line).await;
                        println!("{}", reply);
                    }
                    None => {
                        info!("stdin closed, running until interrupted");
                        tokio::signal::ctrl_c().await?;
                        break;
                    }
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal?;
                break;
            }
        }
    }

    info!("Received shutdown signal, cleaning up...");
    app.shutdown().await;

    Ok(())
}

fn tracing_level(name: &str) -> Level {
    match name.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_log_level_applies_without_flag() {
        let args = Args::parse_from(["exmo_watch"]);
        assert!(args.log_level.is_none());
        assert_eq!(tracing_level("DEBUG"), Level::DEBUG);
        assert_eq!(tracing_level("verbose"), Level::INFO);
    }
}
