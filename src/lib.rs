//! puissant-relay - validator-side puissant bundle relay
//!
//! A Rust library and daemon that accepts `eth_sendPuissant` bundle
//! submissions over JSON-RPC and broadcasts each bundle concurrently to a
//! fixed set of upstream validator nodes, with periodic health probing,
//! all-success/any-failure aggregation and a per-call deadline.
//!
//! # Example
//!
//! ```rust,no_run
//! use puissant_relay::{ConfigFile, HttpClient, Relay, ValidatorSet};
//! use std::path::Path;
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConfigFile::load(Path::new("configs/config.toml"))?;
//!
//!     let client = Arc::new(HttpClient::new(config.validators.max_idle_conns_per_host)?);
//!     let validators = Arc::new(ValidatorSet::new(&config.validators, client));
//!
//!     let cancel = CancellationToken::new();
//!     validators.spawn_probe_loop(
//!         Duration::from_secs(config.validators.probe_interval_secs),
//!         cancel.clone(),
//!     );
//!
//!     let relay = Arc::new(Relay::new(
//!         Duration::from_secs(config.relay.timeout_secs),
//!         validators,
//!     ));
//!
//!     puissant_relay::server::serve(
//!         &config.server.listen_addr,
//!         config.server.concurrency,
//!         relay,
//!         cancel,
//!     )
//!     .await?;
//!     Ok(())
//! }
//! ```

pub mod batch;
pub mod bundle;
pub mod config;
pub mod error;
pub mod relay;
pub mod report;
pub mod rpc;
pub mod server;

// Re-exports for convenience
pub use batch::BatchRunner;
pub use bundle::SendPuissantArgs;
pub use config::{ConfigFile, LogConfig, RelayConfig, ServerConfig, ValidatorsConfig};
pub use error::{ConfigError, Error, Result, RpcError};
pub use relay::Relay;
pub use report::{PackingReport, PuissantReport, ReportSink, TxReport};
pub use rpc::{HttpClient, JsonRpcClient, RpcValidator, Validator, ValidatorSet};
