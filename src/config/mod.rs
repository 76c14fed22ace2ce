//! Configuration module - Settings types and layered loading

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_or_env, load_from_env};
pub use types::AppConfig;
