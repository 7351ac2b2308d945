//! New-wallet trade detection scanner.
//!
//! Periodically discovers wallets active on Polymarket, classifies the ones
//! whose first trade falls inside a trailing lookback window, and surfaces
//! their large trades as copy-trade signals.

mod classifier;
mod discovery;
mod emitter;
mod scanner;
mod significance;
mod state;

use anyhow::Result;
use emitter::LogEmitter;
use scanner::NewWalletScanner;
use scanner_core::api::PolymarketSource;
use scanner_core::config::ScannerConfig;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet_scanner=info,scanner_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ScannerConfig::from_env();
    let source = Arc::new(PolymarketSource::new(
        config.gamma_url.clone(),
        config.data_api_url.clone(),
    ));
    let scanner = Arc::new(NewWalletScanner::new(config, source, Arc::new(LogEmitter)));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = {
        let scanner = scanner.clone();
        tokio::spawn(async move { scanner.run(shutdown_rx).await })
    };

    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received, finishing current cycle"),
        Err(e) => error!(error = %e, "Failed to listen for shutdown signal"),
    }
    shutdown_tx.send(true)?;
    handle.await?;

    Ok(())
}
