//! Configuration management for the new-wallet scanner.

use crate::types::{DiscoveryStrategy, MarketSort};
use rust_decimal::Decimal;
use std::env;

/// Scanner configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    /// Trailing window (hours) within which a wallet's first trade must fall
    /// to be classified "new".
    pub lookback_hours: i64,
    /// Minimum USD notional for a trade to be surfaced (inclusive).
    pub min_trade_amount_usd: Decimal,
    /// Sleep between scan cycles, in seconds.
    pub scan_interval_secs: u64,
    /// Number of top active markets enumerated per cycle.
    pub markets_to_scan: u32,
    /// Holder page size per market.
    pub holders_per_market: u32,
    /// Activity page size per wallet classification.
    pub wallet_activity_limit: u32,
    /// Page size for the global recent-trades tape.
    pub global_trades_limit: u32,
    /// Fixed delay between outbound data-source calls, in milliseconds.
    pub rate_limit_ms: u64,
    /// How candidate wallets are discovered.
    pub discovery: DiscoveryStrategy,
    /// Sort order for the market listing.
    pub market_sort: MarketSort,
    /// Gamma API base URL override.
    pub gamma_url: Option<String>,
    /// Data API base URL override.
    pub data_api_url: Option<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            lookback_hours: 24,
            min_trade_amount_usd: Decimal::new(1000, 0),
            scan_interval_secs: 120,
            markets_to_scan: 50,
            holders_per_market: 100,
            wallet_activity_limit: 500,
            global_trades_limit: 1000,
            rate_limit_ms: 250,
            discovery: DiscoveryStrategy::MarketHolders,
            market_sort: MarketSort::Volume24h,
            gamma_url: None,
            data_api_url: None,
        }
    }
}

impl ScannerConfig {
    /// Load configuration from environment variables, falling back to the
    /// defaults above for anything unset or unparseable.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        Self {
            lookback_hours: env_parse("SCANNER_LOOKBACK_HOURS", defaults.lookback_hours),
            min_trade_amount_usd: env_parse(
                "SCANNER_MIN_TRADE_USD",
                defaults.min_trade_amount_usd,
            ),
            scan_interval_secs: env_parse("SCANNER_INTERVAL_SECS", defaults.scan_interval_secs),
            markets_to_scan: env_parse("SCANNER_MARKETS_TO_SCAN", defaults.markets_to_scan),
            holders_per_market: env_parse(
                "SCANNER_HOLDERS_PER_MARKET",
                defaults.holders_per_market,
            ),
            wallet_activity_limit: env_parse(
                "SCANNER_WALLET_ACTIVITY_LIMIT",
                defaults.wallet_activity_limit,
            ),
            global_trades_limit: env_parse(
                "SCANNER_GLOBAL_TRADES_LIMIT",
                defaults.global_trades_limit,
            ),
            rate_limit_ms: env_parse("SCANNER_RATE_LIMIT_MS", defaults.rate_limit_ms),
            discovery: env_parse("SCANNER_DISCOVERY", defaults.discovery),
            market_sort: defaults.market_sort,
            gamma_url: env::var("GAMMA_API_URL").ok(),
            data_api_url: env::var("DATA_API_URL").ok(),
        }
    }

    /// Lookback window as a chrono duration.
    pub fn lookback(&self) -> chrono::Duration {
        chrono::Duration::hours(self.lookback_hours)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScannerConfig::default();
        assert_eq!(config.lookback_hours, 24);
        assert_eq!(config.min_trade_amount_usd, Decimal::new(1000, 0));
        assert_eq!(config.scan_interval_secs, 120);
        assert_eq!(config.markets_to_scan, 50);
        assert_eq!(config.wallet_activity_limit, 500);
        assert_eq!(config.discovery, DiscoveryStrategy::MarketHolders);
    }

    #[test]
    fn test_lookback_duration() {
        let config = ScannerConfig {
            lookback_hours: 48,
            ..Default::default()
        };
        assert_eq!(config.lookback(), chrono::Duration::hours(48));
    }
}
