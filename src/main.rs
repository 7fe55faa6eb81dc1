//! puissant-relay daemon - broadcasts puissant bundles to validator nodes

use clap::Parser;
use puissant_relay::config::ConfigFile;
use puissant_relay::relay::Relay;
use puissant_relay::rpc::{HttpClient, ValidatorSet};
use puissant_relay::server;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "puissant-relay")]
#[command(
    version,
    about = "JSON-RPC relay that broadcasts puissant bundles to BSC validator nodes"
)]
struct Cli {
    /// Config file path
    #[arg(long, default_value = "./configs/config.toml")]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = ConfigFile::load(&cli.config)?;

    // CLI verbosity overrides the configured level
    let filter = match cli.verbose {
        0 => config.log.level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    tracing::info!(
        config = %cli.config.display(),
        validators = config.validators.urls.len(),
        "puissant relay start"
    );

    let cancel = shutdown_token();

    let client = Arc::new(HttpClient::new(config.validators.max_idle_conns_per_host)?);
    let validators = Arc::new(ValidatorSet::new(&config.validators, client));
    validators.spawn_probe_loop(
        Duration::from_secs(config.validators.probe_interval_secs),
        cancel.clone(),
    );

    let relay = Arc::new(Relay::new(
        Duration::from_secs(config.relay.timeout_secs),
        validators,
    ));

    server::serve(
        &config.server.listen_addr,
        config.server.concurrency,
        relay,
        cancel,
    )
    .await?;

    Ok(())
}

/// Token cancelled once on SIGINT/SIGTERM. The probe loop observes it to
/// exit and the server drains gracefully.
fn shutdown_token() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    tokio::spawn(async move {
        let ctrl_c = tokio::signal::ctrl_c();

        #[cfg(unix)]
        {
            let mut term =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                    .expect("install SIGTERM handler");
            tokio::select! {
                _ = ctrl_c => {}
                _ = term.recv() => {}
            }
        }

        #[cfg(not(unix))]
        {
            let _ = ctrl_c.await;
        }

        tracing::info!("received shutdown signal, gracefully shutdown");
        token.cancel();
    });

    cancel
}
