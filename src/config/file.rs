//! Configuration file handling

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Logging settings
    #[serde(default)]
    pub log: LogConfig,

    /// Inbound HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Relay deadline settings
    #[serde(default)]
    pub relay: RelayConfig,

    /// Upstream validator settings
    #[serde(default)]
    pub validators: ValidatorsConfig,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level filter (trace/debug/info/warn/error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Inbound HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address for the JSON-RPC endpoint
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Maximum concurrent inbound requests
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

/// Relay deadline settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Per-call timeout in seconds; 0 disables the additional bound
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Upstream validator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidatorsConfig {
    /// Validator JSON-RPC URLs; the set is fixed for the process lifetime
    #[serde(default)]
    pub urls: Vec<String>,

    /// Minimum client version a validator must report to take traffic.
    /// Compared with ordinal string ordering, not semver.
    #[serde(default)]
    pub expected_version: String,

    /// Seconds between health-probe rounds
    #[serde(default = "default_probe_interval")]
    pub probe_interval_secs: u64,

    /// Idle connections kept per validator host
    #[serde(default = "default_max_idle_conns")]
    pub max_idle_conns_per_host: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_listen_addr() -> String {
    "0.0.0.0:8575".to_string()
}

fn default_concurrency() -> usize {
    1024
}

fn default_timeout() -> u64 {
    3
}

fn default_probe_interval() -> u64 {
    300
}

fn default_max_idle_conns() -> usize {
    64
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            concurrency: default_concurrency(),
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
        }
    }
}

impl Default for ValidatorsConfig {
    fn default() -> Self {
        Self {
            urls: Vec::new(),
            expected_version: String::new(),
            probe_interval_secs: default_probe_interval(),
            max_idle_conns_per_host: default_max_idle_conns(),
        }
    }
}

impl ConfigFile {
    /// Load from a specific path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::InvalidFile(format!("{}: {}", path.display(), e)))?;

        let config: Self = toml::from_str(&content).map_err(ConfigError::from)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml = r#"
[log]
level = "debug"

[server]
listen_addr = "127.0.0.1:9575"
concurrency = 256

[relay]
timeout_secs = 5

[validators]
urls = ["https://validator-0:8575", "https://validator-1:8575"]
expected_version = "Geth/v1.3.9"
probe_interval_secs = 60
"#;

        let config: ConfigFile = toml::from_str(toml).unwrap();
        assert_eq!(config.log.level, "debug");
        assert_eq!(config.server.listen_addr, "127.0.0.1:9575");
        assert_eq!(config.server.concurrency, 256);
        assert_eq!(config.relay.timeout_secs, 5);
        assert_eq!(config.validators.urls.len(), 2);
        assert_eq!(config.validators.expected_version, "Geth/v1.3.9");
        assert_eq!(config.validators.probe_interval_secs, 60);
        // Defaulted field
        assert_eq!(config.validators.max_idle_conns_per_host, 64);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(config.log.level, "info");
        assert_eq!(config.server.listen_addr, "0.0.0.0:8575");
        assert_eq!(config.relay.timeout_secs, 3);
        assert!(config.validators.urls.is_empty());
        assert_eq!(config.validators.probe_interval_secs, 300);
    }
}
