//! Data API client for trades, holders, and per-wallet activity.
//!
//! All endpoints here are public (no auth). Field names differ between the
//! `/trades` and `/activity` endpoints, so raw rows carry serde aliases and
//! `/activity` goes through an intermediate [`ActivityEntry`].

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Duration as StdDuration;
use tracing::{debug, warn};

/// Polymarket Data API client.
pub struct DataApiClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl DataApiClient {
    /// Default Data API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://data-api.polymarket.com";

    pub fn new(base_url: Option<String>) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(10))
            .connect_timeout(StdDuration::from_secs(10))
            .build()
            .expect("Failed to build HTTP client");
        Self {
            base_url: base_url.unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string()),
            http_client,
        }
    }

    /// Fetch the global recent-trades tape.
    pub async fn recent_trades(&self, limit: u32) -> Result<Vec<DataTrade>> {
        let url = format!("{}/trades?limit={}", self.base_url, limit);
        self.fetch_trades(&url, "global tape").await
    }

    /// Fetch recent trades for one market.
    pub async fn market_trades(&self, condition_id: &str, limit: u32) -> Result<Vec<DataTrade>> {
        let url = format!(
            "{}/trades?market={}&limit={}",
            self.base_url, condition_id, limit
        );
        self.fetch_trades(&url, condition_id).await
    }

    /// Fetch holder addresses for one market, lowercased.
    pub async fn market_holders(&self, condition_id: &str, limit: u32) -> Result<Vec<String>> {
        let url = format!(
            "{}/holders?market={}&limit={}",
            self.base_url, condition_id, limit
        );

        let response = super::get_with_retry(&self.http_client, &url).await?;
        let text = response.text().await?;

        // The endpoint groups holders per outcome token.
        match serde_json::from_str::<Vec<TokenHolders>>(&text) {
            Ok(groups) => {
                let holders: Vec<String> = groups
                    .into_iter()
                    .flat_map(|g| g.holders)
                    .filter_map(|h| h.proxy_wallet)
                    .filter(|a| !a.is_empty())
                    .map(|a| a.to_lowercase())
                    .collect();
                debug!(
                    market = %condition_id,
                    count = holders.len(),
                    "Fetched market holders"
                );
                Ok(holders)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    market = %condition_id,
                    response_preview = %preview(&text),
                    "Could not parse holders response"
                );
                Err(Error::Api {
                    message: format!("Holders response parse error: {}", e),
                    status: None,
                })
            }
        }
    }

    /// Fetch recent trade-type activity for a wallet, most recent first.
    pub async fn wallet_activity(&self, address: &str, limit: u32) -> Result<Vec<DataTrade>> {
        let url = format!(
            "{}/activity?user={}&limit={}&type=TRADE",
            self.base_url, address, limit
        );

        let response = super::get_with_retry(&self.http_client, &url).await?;
        let text = response.text().await?;

        match serde_json::from_str::<Vec<ActivityEntry>>(&text) {
            Ok(entries) => {
                let trades: Vec<DataTrade> = entries
                    .into_iter()
                    .filter_map(ActivityEntry::into_trade)
                    .collect();
                debug!(
                    wallet = %address,
                    trade_count = trades.len(),
                    "Fetched wallet activity"
                );
                Ok(trades)
            }
            Err(e) => {
                warn!(
                    error = %e,
                    wallet = %address,
                    response_preview = %preview(&text),
                    "Could not parse wallet activity response"
                );
                Err(Error::Api {
                    message: format!("Wallet activity parse error: {}", e),
                    status: None,
                })
            }
        }
    }

    async fn fetch_trades(&self, url: &str, context: &str) -> Result<Vec<DataTrade>> {
        let response = super::get_with_retry(&self.http_client, url).await?;
        let text = response.text().await?;

        match serde_json::from_str::<Vec<DataTrade>>(&text) {
            Ok(trades) => Ok(trades),
            Err(e) => {
                warn!(
                    error = %e,
                    context = %context,
                    response_preview = %preview(&text),
                    "Could not parse trades response"
                );
                Err(Error::Api {
                    message: format!("Trades response parse error: {}", e),
                    status: None,
                })
            }
        }
    }
}

fn preview(text: &str) -> &str {
    let mut end = text.len().min(500);
    // Back off to a char boundary so slicing can't panic mid-codepoint.
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// A trade row from the Data API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataTrade {
    /// Transaction hash.
    #[serde(alias = "transactionHash", alias = "id", default)]
    pub transaction_hash: String,
    /// Wallet address (proxy wallet).
    #[serde(alias = "proxyWallet", alias = "maker_address", default)]
    pub wallet_address: String,
    /// Trade side (BUY/SELL).
    #[serde(default)]
    pub side: String,
    /// Market condition ID.
    #[serde(alias = "conditionId", alias = "market", default)]
    pub condition_id: Option<String>,
    /// Share quantity.
    #[serde(default)]
    pub size: f64,
    /// Price per share.
    #[serde(default)]
    pub price: f64,
    /// USD notional reported directly by the feed, when present.
    #[serde(alias = "usdcSize", default)]
    pub usd_value: Option<f64>,
    /// Unix timestamp (seconds). Zero when absent or unparseable.
    #[serde(default)]
    pub timestamp: i64,
    /// Market title.
    #[serde(default)]
    pub title: Option<String>,
    /// Outcome name.
    #[serde(default)]
    pub outcome: Option<String>,
}

impl DataTrade {
    /// USD notional: the feed's direct value when present, else price×size.
    pub fn notional_usd(&self) -> Decimal {
        match self.usd_value {
            Some(usd) => Decimal::from_f64(usd).unwrap_or_default(),
            None => {
                let price = Decimal::from_f64(self.price).unwrap_or_default();
                let size = Decimal::from_f64(self.size).unwrap_or_default();
                price * size
            }
        }
    }

    /// Timestamp as UTC; `None` for missing/non-positive timestamps.
    pub fn timestamp_utc(&self) -> Option<DateTime<Utc>> {
        if self.timestamp > 0 {
            DateTime::from_timestamp(self.timestamp, 0)
        } else {
            None
        }
    }
}

/// A single row from the `/activity` endpoint.
#[derive(Debug, Deserialize)]
struct ActivityEntry {
    /// Transaction hash.
    #[serde(alias = "transactionHash", default)]
    transaction_hash: Option<String>,
    /// Unique identifier (fallback when transaction_hash is absent).
    #[serde(default)]
    id: Option<String>,
    /// Proxy wallet address.
    #[serde(alias = "proxyWallet", default)]
    proxy_wallet: Option<String>,
    /// Trade side (BUY / SELL).
    #[serde(default)]
    side: Option<String>,
    /// Condition (market) ID.
    #[serde(alias = "conditionId", default)]
    condition_id: Option<String>,
    /// USDC notional of the trade.
    #[serde(alias = "usdcSize", default)]
    usdc_size: Option<f64>,
    /// Quantity / shares.
    #[serde(default)]
    size: Option<f64>,
    /// Trade price.
    #[serde(default)]
    price: Option<f64>,
    /// Unix timestamp (seconds).
    #[serde(default)]
    timestamp: Option<i64>,
    /// ISO-8601 timestamp (fallback).
    #[serde(alias = "createdAt", default)]
    created_at: Option<String>,
    /// Activity type — only "TRADE" rows are kept.
    #[serde(alias = "type", default)]
    activity_type: Option<String>,
    /// Market title.
    #[serde(default)]
    title: Option<String>,
    /// Outcome name.
    #[serde(default)]
    outcome: Option<String>,
}

impl ActivityEntry {
    /// Convert to a `DataTrade`, returning `None` for non-TRADE rows or rows
    /// missing both a transaction hash and an id.
    fn into_trade(self) -> Option<DataTrade> {
        let activity_type = self.activity_type.unwrap_or_default();
        if !activity_type.eq_ignore_ascii_case("TRADE") {
            return None;
        }

        let transaction_hash = self
            .transaction_hash
            .or(self.id)
            .filter(|s| !s.is_empty())?;
        let wallet_address = self.proxy_wallet.filter(|s| !s.is_empty())?;

        // Prefer unix seconds, fall back to ISO-8601, else zero.
        let timestamp = self.timestamp.unwrap_or_else(|| {
            self.created_at
                .as_deref()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|dt| dt.timestamp())
                .unwrap_or(0)
        });

        Some(DataTrade {
            transaction_hash,
            wallet_address,
            side: self.side.unwrap_or_default(),
            condition_id: self.condition_id,
            size: self.size.unwrap_or(0.0),
            price: self.price.unwrap_or(0.0),
            usd_value: self.usdc_size,
            timestamp,
            title: self.title,
            outcome: self.outcome,
        })
    }
}

/// One outcome token's holder list from `/holders`.
#[derive(Debug, Deserialize)]
struct TokenHolders {
    #[serde(default)]
    holders: Vec<HolderRow>,
}

#[derive(Debug, Deserialize)]
struct HolderRow {
    #[serde(alias = "proxyWallet", default)]
    proxy_wallet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_entry_into_trade() {
        let entry: ActivityEntry = serde_json::from_str(
            r#"{
                "transactionHash": "0xtx1",
                "proxyWallet": "0xABCDEF",
                "side": "BUY",
                "conditionId": "0xcond",
                "usdcSize": 1500.0,
                "price": 0.5,
                "size": 3000.0,
                "timestamp": 1700000000,
                "type": "TRADE",
                "title": "Will it rain?",
                "outcome": "Yes"
            }"#,
        )
        .unwrap();

        let trade = entry.into_trade().unwrap();
        assert_eq!(trade.transaction_hash, "0xtx1");
        assert_eq!(trade.wallet_address, "0xABCDEF");
        assert_eq!(trade.condition_id.as_deref(), Some("0xcond"));
        assert_eq!(trade.timestamp, 1_700_000_000);
        // Direct notional preferred over price×size
        assert_eq!(trade.notional_usd(), Decimal::new(1500, 0));
    }

    #[test]
    fn test_activity_entry_non_trade_dropped() {
        let entry: ActivityEntry = serde_json::from_str(
            r#"{"transactionHash": "0xtx2", "proxyWallet": "0xw", "type": "REDEEM"}"#,
        )
        .unwrap();
        assert!(entry.into_trade().is_none());
    }

    #[test]
    fn test_activity_entry_iso_timestamp_fallback() {
        let entry: ActivityEntry = serde_json::from_str(
            r#"{
                "id": "row-1",
                "proxyWallet": "0xw",
                "type": "trade",
                "createdAt": "2023-11-14T22:13:20Z"
            }"#,
        )
        .unwrap();

        let trade = entry.into_trade().unwrap();
        assert_eq!(trade.transaction_hash, "row-1");
        assert_eq!(trade.timestamp, 1_700_000_000);
    }

    #[test]
    fn test_notional_from_price_and_size() {
        let trade: DataTrade = serde_json::from_str(
            r#"{
                "transactionHash": "0xtx3",
                "proxyWallet": "0xw",
                "side": "SELL",
                "price": 0.25,
                "size": 4000.0,
                "timestamp": 1700000000
            }"#,
        )
        .unwrap();

        assert_eq!(trade.usd_value, None);
        assert_eq!(trade.notional_usd(), Decimal::new(1000, 0));
    }

    #[test]
    fn test_timestamp_utc_zero_is_none() {
        let trade: DataTrade =
            serde_json::from_str(r#"{"transactionHash": "0xtx4", "proxyWallet": "0xw"}"#).unwrap();
        assert_eq!(trade.timestamp, 0);
        assert!(trade.timestamp_utc().is_none());
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        // Multibyte char straddling the 500-byte cut.
        let text = format!("{}é and more", "a".repeat(499));
        let truncated = preview(&text);
        assert_eq!(truncated.len(), 499);
        assert!(truncated.chars().all(|c| c == 'a'));

        let short = "café";
        assert_eq!(preview(short), short);
    }

    #[test]
    fn test_holders_parse() {
        let groups: Vec<TokenHolders> = serde_json::from_str(
            r#"[
                {"token": "t1", "holders": [{"proxyWallet": "0xAAA"}, {"proxyWallet": "0xBBB"}]},
                {"token": "t2", "holders": [{"proxyWallet": "0xAAA"}]}
            ]"#,
        )
        .unwrap();

        let addrs: Vec<String> = groups
            .into_iter()
            .flat_map(|g| g.holders)
            .filter_map(|h| h.proxy_wallet)
            .map(|a| a.to_lowercase())
            .collect();
        assert_eq!(addrs, vec!["0xaaa", "0xbbb", "0xaaa"]);
    }
}
