//! API clients for the Polymarket data sources.

pub mod data;
pub mod gamma;

use crate::types::{MarketSort, MarketSummary};
use crate::{Error, Result};
use async_trait::async_trait;
use std::time::Duration as StdDuration;
use tracing::warn;

pub use data::{DataApiClient, DataTrade};
pub use gamma::GammaClient;

/// Maximum retry attempts for API calls.
const MAX_RETRIES: u32 = 3;

/// Execute an HTTP GET with retry and exponential backoff.
///
/// Retries on 5xx server errors and 429 rate-limit responses (with a longer
/// backoff for 429). All other 4xx errors fail immediately.
pub(crate) async fn get_with_retry(
    http_client: &reqwest::Client,
    url: &str,
) -> Result<reqwest::Response> {
    let mut last_error = None;

    for attempt in 0..MAX_RETRIES {
        match http_client.get(url).send().await {
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response)
                if response.status().as_u16() == 429 || response.status().is_server_error() =>
            {
                let status = response.status();
                let is_rate_limited = status.as_u16() == 429;
                warn!(
                    attempt = attempt + 1,
                    status = %status,
                    url = url,
                    rate_limited = is_rate_limited,
                    "Retryable API error, backing off"
                );
                last_error = Some(Error::Api {
                    message: format!(
                        "{}: {}",
                        if is_rate_limited {
                            "Rate limited"
                        } else {
                            "Server error"
                        },
                        status
                    ),
                    status: Some(status.as_u16()),
                });

                if attempt + 1 < MAX_RETRIES {
                    let backoff = if is_rate_limited {
                        StdDuration::from_millis(2000 * 2u64.pow(attempt))
                    } else {
                        StdDuration::from_millis(500 * 2u64.pow(attempt))
                    };
                    tokio::time::sleep(backoff).await;
                }
                continue;
            }
            Ok(response) => {
                // Client error (4xx except 429) — don't retry
                return Err(Error::Api {
                    message: format!("API error: {}", response.status()),
                    status: Some(response.status().as_u16()),
                });
            }
            Err(e) => {
                warn!(
                    attempt = attempt + 1,
                    error = %e,
                    url = url,
                    "HTTP request failed, backing off"
                );
                last_error = Some(Error::Http(e));
            }
        }

        if attempt + 1 < MAX_RETRIES {
            let backoff = StdDuration::from_millis(500 * 2u64.pow(attempt));
            tokio::time::sleep(backoff).await;
        }
    }

    Err(last_error.unwrap_or(Error::Api {
        message: "Max retries exceeded".to_string(),
        status: None,
    }))
}

/// Read-only surface of the market data providers consumed by the scanner.
///
/// Implemented by [`PolymarketSource`] in production; scan-loop tests supply
/// an in-memory fake.
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// List active markets, best first according to `sort`.
    async fn active_markets(&self, limit: u32, sort: MarketSort) -> Result<Vec<MarketSummary>>;

    /// Lowercased holder addresses for one market.
    async fn market_holders(&self, condition_id: &str, limit: u32) -> Result<Vec<String>>;

    /// Recent trades for one market.
    async fn market_trades(&self, condition_id: &str, limit: u32) -> Result<Vec<DataTrade>>;

    /// The global recent-trades tape.
    async fn recent_trades(&self, limit: u32) -> Result<Vec<DataTrade>>;

    /// Trade-type activity for one wallet, most recent first.
    async fn wallet_activity(&self, address: &str, limit: u32) -> Result<Vec<DataTrade>>;
}

/// Production data source combining the Gamma API (market listings) and the
/// Data API (trades, holders, wallet activity).
pub struct PolymarketSource {
    gamma: GammaClient,
    data: DataApiClient,
}

impl PolymarketSource {
    pub fn new(gamma_url: Option<String>, data_api_url: Option<String>) -> Self {
        Self {
            gamma: GammaClient::new(gamma_url),
            data: DataApiClient::new(data_api_url),
        }
    }
}

#[async_trait]
impl MarketDataSource for PolymarketSource {
    async fn active_markets(&self, limit: u32, sort: MarketSort) -> Result<Vec<MarketSummary>> {
        self.gamma.active_markets(limit, sort).await
    }

    async fn market_holders(&self, condition_id: &str, limit: u32) -> Result<Vec<String>> {
        self.data.market_holders(condition_id, limit).await
    }

    async fn market_trades(&self, condition_id: &str, limit: u32) -> Result<Vec<DataTrade>> {
        self.data.market_trades(condition_id, limit).await
    }

    async fn recent_trades(&self, limit: u32) -> Result<Vec<DataTrade>> {
        self.data.recent_trades(limit).await
    }

    async fn wallet_activity(&self, address: &str, limit: u32) -> Result<Vec<DataTrade>> {
        self.data.wallet_activity(address, limit).await
    }
}
