//! Relay configuration

mod file;

pub use file::{ConfigFile, LogConfig, RelayConfig, ServerConfig, ValidatorsConfig};
