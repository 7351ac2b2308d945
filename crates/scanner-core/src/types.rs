//! Core domain types for the new-wallet scanner.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How candidate wallets are discovered each scan cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryStrategy {
    /// Collect wallets from the global recent-trades tape.
    GlobalTrades,
    /// Enumerate holders of the top active markets.
    MarketHolders,
    /// Collect wallets from each top market's recent trades.
    MarketTrades,
}

impl std::str::FromStr for DiscoveryStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "global_trades" => Ok(Self::GlobalTrades),
            "market_holders" => Ok(Self::MarketHolders),
            "market_trades" => Ok(Self::MarketTrades),
            other => Err(format!("unknown discovery strategy: {other}")),
        }
    }
}

/// Sort order for the active-market listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketSort {
    Volume24h,
    Liquidity,
}

impl MarketSort {
    /// Query parameter value understood by the Gamma API.
    pub fn as_query_param(&self) -> &'static str {
        match self {
            Self::Volume24h => "volume24hr",
            Self::Liquidity => "liquidity",
        }
    }
}

/// A market row from the listing endpoint, reduced to what discovery consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSummary {
    pub condition_id: String,
    pub question: String,
    pub volume_24h: Decimal,
}

/// Aggregate profile of a classified wallet.
///
/// Computed once from the wallet's available activity page and cached for the
/// process lifetime; re-scans skip addresses that were already classified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletRecord {
    /// Lowercase-normalized wallet address (unique key).
    pub address: String,
    /// Earliest trade timestamp seen for this wallet. `None` when the
    /// activity page carried no usable timestamp.
    pub first_trade_time: Option<DateTime<Utc>>,
    /// Number of activity records observed.
    pub total_trades: u64,
    /// Sum of USD notional across observed activity.
    pub total_volume: Decimal,
    /// Number of distinct markets traded.
    pub markets_traded: usize,
    /// When this record was computed.
    pub classified_at: DateTime<Utc>,
}

impl WalletRecord {
    /// Whether the wallet's first observed trade falls within the lookback
    /// window ending at `now`. The boundary is inclusive: a first trade at
    /// exactly `now - lookback` is new. A wallet with no usable first-trade
    /// timestamp is never new.
    pub fn is_new(&self, now: DateTime<Utc>, lookback: Duration) -> bool {
        match self.first_trade_time {
            Some(first) => first >= now - lookback,
            None => false,
        }
    }
}

/// A qualifying trade from a new wallet, ready for the copy-trade hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeSignal {
    /// Lowercase wallet address the trade belongs to.
    pub wallet_address: String,
    /// Market condition ID.
    pub market_id: String,
    /// Outcome name ("Yes"/"No"/...), empty when the feed omits it.
    pub outcome: String,
    /// USD notional of the trade.
    pub amount_usd: Decimal,
    /// Price per share.
    pub price: Decimal,
    /// Share quantity.
    pub size: Decimal,
    /// Trade timestamp.
    pub timestamp: DateTime<Utc>,
    /// Transaction hash.
    pub tx_hash: String,
    /// Human-readable market title, when the feed provides one.
    pub title: Option<String>,
}

impl TradeSignal {
    /// Composite identity used for at-most-once surfacing. Two fills in the
    /// same transaction at different timestamps are distinct trades.
    pub fn identity(&self) -> String {
        format!(
            "{}:{}:{}",
            self.wallet_address,
            self.tx_hash,
            self.timestamp.timestamp()
        )
    }
}

/// Counters aggregated over one scan cycle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanStats {
    /// Cycle sequence number (1-based).
    pub cycle: u64,
    /// Candidate wallets discovered this cycle (before the seen filter).
    pub candidates: usize,
    /// Wallets newly classified as "new" this cycle.
    pub new_wallets: usize,
    /// Significant trades surfaced this cycle.
    pub significant_trades: usize,
    /// Tracked new wallets, process lifetime.
    pub total_tracked: usize,
    /// Wallets ever classified, process lifetime.
    pub total_seen: usize,
}
