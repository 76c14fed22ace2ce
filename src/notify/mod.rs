//! Notificators - Delivery of alert messages

pub mod log;
pub mod telegram;

pub use self::log::{LogNotificator, LogNotifier};
pub use telegram::{TelegramBot, TelegramNotificator};
