//! Scan-loop orchestration.
//!
//! Each cycle discovers candidate wallets, classifies the ones not yet seen,
//! tracks those whose first trade falls inside the lookback window, and
//! surfaces their significant recent trades to the configured emitter.

use crate::discovery::WalletDiscovery;
use crate::emitter::SignalEmitter;
use crate::state::ScanState;
use chrono::Utc;
use scanner_core::api::MarketDataSource;
use scanner_core::config::ScannerConfig;
use scanner_core::types::ScanStats;
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, warn};

pub struct NewWalletScanner {
    config: ScannerConfig,
    source: Arc<dyn MarketDataSource>,
    discovery: WalletDiscovery,
    state: Arc<ScanState>,
    emitter: Arc<dyn SignalEmitter>,
}

impl NewWalletScanner {
    pub fn new(
        config: ScannerConfig,
        source: Arc<dyn MarketDataSource>,
        emitter: Arc<dyn SignalEmitter>,
    ) -> Self {
        let discovery = WalletDiscovery::new(source.clone(), &config);
        Self {
            config,
            source,
            discovery,
            state: Arc::new(ScanState::new()),
            emitter,
        }
    }

    /// Shared scan state, exposed for inspection.
    pub fn state(&self) -> Arc<ScanState> {
        self.state.clone()
    }

    /// Run scan cycles until the shutdown flag flips, then log a final
    /// summary of every wallet tracked during the session.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        info!(
            strategy = ?self.config.discovery,
            lookback_hours = self.config.lookback_hours,
            min_trade_usd = %self.config.min_trade_amount_usd,
            interval_secs = self.config.scan_interval_secs,
            "Starting new-wallet scanner"
        );

        let mut cycle = 0u64;
        loop {
            if *shutdown.borrow() {
                break;
            }

            cycle += 1;
            let started = Instant::now();
            let stats = self.run_cycle(cycle, &shutdown).await;
            info!(
                cycle = stats.cycle,
                candidates = stats.candidates,
                new_wallets = stats.new_wallets,
                significant_trades = stats.significant_trades,
                total_tracked = stats.total_tracked,
                total_seen = stats.total_seen,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Scan cycle complete"
            );

            tokio::select! {
                _ = tokio::time::sleep(StdDuration::from_secs(self.config.scan_interval_secs)) => {}
                _ = shutdown.changed() => {}
            }
        }

        self.log_summary();
    }

    /// Execute one scan cycle. Per-wallet failures are logged and skipped so
    /// one bad address cannot sink the cycle.
    pub async fn run_cycle(&self, cycle: u64, shutdown: &watch::Receiver<bool>) -> ScanStats {
        let candidates = self.discovery.discover().await;
        let mut stats = ScanStats {
            cycle,
            candidates: candidates.len(),
            ..Default::default()
        };

        for address in candidates {
            if *shutdown.borrow() {
                break;
            }
            if self.state.is_seen(&address) {
                continue;
            }

            tokio::time::sleep(StdDuration::from_millis(self.config.rate_limit_ms)).await;
            self.classify_candidate(&address, &mut stats).await;
        }

        stats.total_tracked = self.state.tracked_count();
        stats.total_seen = self.state.seen_count();
        stats
    }

    /// Classify one unseen candidate and surface its significant trades when
    /// it qualifies as new.
    async fn classify_candidate(&self, address: &str, stats: &mut ScanStats) {
        let records = match self
            .source
            .wallet_activity(address, self.config.wallet_activity_limit)
            .await
        {
            Ok(records) => records,
            Err(e) => {
                // Left unseen so the next cycle retries this address.
                warn!(wallet = %address, error = %e, "Activity fetch failed, will retry next cycle");
                return;
            }
        };

        let now = Utc::now();
        let record = crate::classifier::classify(address, &records, now);
        self.state.mark_seen(address);

        let Some(record) = record else {
            debug!(wallet = %address, "No trade activity, skipping");
            return;
        };

        if !record.is_new(now, self.config.lookback()) {
            debug!(
                wallet = %address,
                first_trade = ?record.first_trade_time,
                "Wallet predates lookback window"
            );
            return;
        }

        info!(
            wallet = %record.address,
            first_trade = ?record.first_trade_time,
            total_trades = record.total_trades,
            total_volume = %record.total_volume,
            markets = record.markets_traded,
            "Tracking new wallet"
        );
        stats.new_wallets += 1;

        let signals = crate::significance::filter_significant(
            address,
            &records,
            now,
            self.config.lookback(),
            self.config.min_trade_amount_usd,
            &self.state,
        );
        stats.significant_trades += signals.len();

        for signal in &signals {
            self.emitter.on_significant_trade(&record, signal).await;
        }

        self.state.track(record);
    }

    /// Final session summary, newest wallets first.
    fn log_summary(&self) {
        let mut tracked = self.state.tracked();
        tracked.sort_by(|a, b| b.first_trade_time.cmp(&a.first_trade_time));

        info!(
            tracked_wallets = tracked.len(),
            wallets_classified = self.state.seen_count(),
            "Scanner stopped"
        );
        for wallet in &tracked {
            info!(
                wallet = %wallet.address,
                first_trade = ?wallet.first_trade_time,
                total_trades = wallet.total_trades,
                total_volume = %wallet.total_volume,
                markets = wallet.markets_traded,
                "Tracked wallet"
            );
        }
    }
}
