//! Candidate wallet discovery.
//!
//! One interface, three strategies: the global trade tape, market holder
//! enumeration, or per-market trade tapes. Selected by configuration.

use futures_util::future::join_all;
use scanner_core::api::MarketDataSource;
use scanner_core::config::ScannerConfig;
use scanner_core::types::{DiscoveryStrategy, MarketSort, MarketSummary};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration as StdDuration;
use tracing::{debug, warn};

/// Per-market fetches issued concurrently within one batch.
const MARKET_FETCH_BATCH: usize = 8;

/// Discovers candidate wallet addresses from market activity.
pub struct WalletDiscovery {
    source: Arc<dyn MarketDataSource>,
    strategy: DiscoveryStrategy,
    markets_to_scan: u32,
    holders_per_market: u32,
    global_trades_limit: u32,
    market_sort: MarketSort,
    batch_delay: StdDuration,
}

impl WalletDiscovery {
    pub fn new(source: Arc<dyn MarketDataSource>, config: &ScannerConfig) -> Self {
        Self {
            source,
            strategy: config.discovery,
            markets_to_scan: config.markets_to_scan,
            holders_per_market: config.holders_per_market,
            global_trades_limit: config.global_trades_limit,
            market_sort: config.market_sort,
            batch_delay: StdDuration::from_millis(config.rate_limit_ms),
        }
    }

    /// Discover candidate addresses for one scan cycle.
    ///
    /// Best-effort: a failed market fetch contributes nothing and is logged;
    /// the union of whatever succeeded is returned. Addresses are lowercased
    /// and deduplicated across markets.
    pub async fn discover(&self) -> HashSet<String> {
        match self.strategy {
            DiscoveryStrategy::GlobalTrades => self.from_global_tape().await,
            DiscoveryStrategy::MarketHolders => self.from_markets(true).await,
            DiscoveryStrategy::MarketTrades => self.from_markets(false).await,
        }
    }

    async fn from_global_tape(&self) -> HashSet<String> {
        match self.source.recent_trades(self.global_trades_limit).await {
            Ok(trades) => {
                let candidates: HashSet<String> = trades
                    .iter()
                    .filter(|t| !t.wallet_address.is_empty())
                    .map(|t| t.wallet_address.to_lowercase())
                    .collect();
                debug!(
                    trades = trades.len(),
                    candidates = candidates.len(),
                    "Discovered candidates from global tape"
                );
                candidates
            }
            Err(e) => {
                warn!(error = %e, "Failed to fetch global trade tape");
                HashSet::new()
            }
        }
    }

    /// Enumerate top markets and pull either their holder pages
    /// (`holders = true`) or their recent trade tapes.
    async fn from_markets(&self, holders: bool) -> HashSet<String> {
        let markets = match self
            .source
            .active_markets(self.markets_to_scan, self.market_sort)
            .await
        {
            Ok(markets) => markets,
            Err(e) => {
                warn!(error = %e, "Failed to list active markets");
                return HashSet::new();
            }
        };

        let mut candidates = HashSet::new();
        let mut failed_markets = 0usize;

        for batch in markets.chunks(MARKET_FETCH_BATCH) {
            let futures: Vec<_> = batch
                .iter()
                .map(|m| self.fetch_market_wallets(m, holders))
                .collect();

            for (market, result) in batch.iter().zip(join_all(futures).await) {
                match result {
                    Ok(addresses) => candidates.extend(addresses),
                    Err(e) => {
                        failed_markets += 1;
                        warn!(
                            market = %market.condition_id,
                            error = %e,
                            "Market fetch failed, continuing with remaining markets"
                        );
                    }
                }
            }

            tokio::time::sleep(self.batch_delay).await;
        }

        debug!(
            markets = markets.len(),
            failed = failed_markets,
            candidates = candidates.len(),
            "Discovered candidates from markets"
        );
        candidates
    }

    async fn fetch_market_wallets(
        &self,
        market: &MarketSummary,
        holders: bool,
    ) -> scanner_core::Result<Vec<String>> {
        if holders {
            self.source
                .market_holders(&market.condition_id, self.holders_per_market)
                .await
        } else {
            let trades = self
                .source
                .market_trades(&market.condition_id, self.holders_per_market)
                .await?;
            Ok(trades
                .into_iter()
                .filter(|t| !t.wallet_address.is_empty())
                .map(|t| t.wallet_address.to_lowercase())
                .collect())
        }
    }
}
