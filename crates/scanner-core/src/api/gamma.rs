//! Gamma API client for market listings.

use crate::types::{MarketSort, MarketSummary};
use crate::Result;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::time::Duration as StdDuration;
use tracing::debug;

/// Polymarket Gamma API client.
pub struct GammaClient {
    base_url: String,
    http_client: reqwest::Client,
}

impl GammaClient {
    /// Default Gamma API base URL.
    pub const DEFAULT_BASE_URL: &'static str = "https://gamma-api.polymarket.com";

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

    /// Fetch the top active markets, best first according to `sort`.
    pub async fn active_markets(
        &self,
        limit: u32,
        sort: MarketSort,
    ) -> Result<Vec<MarketSummary>> {
        let url = format!(
            "{}/markets?active=true&closed=false&limit={}&order={}&ascending=false",
            self.base_url,
            limit,
            sort.as_query_param()
        );

        let response = super::get_with_retry(&self.http_client, &url).await?;
        let rows: Vec<GammaMarket> = response.json().await?;

        let markets: Vec<MarketSummary> = rows
            .into_iter()
            .filter_map(GammaMarket::into_summary)
            .collect();

        debug!(count = markets.len(), "Fetched active markets");
        Ok(markets)
    }
}

/// A market row from the Gamma API, reduced to the fields we consume.
#[derive(Debug, Deserialize)]
struct GammaMarket {
    /// Condition (market) ID.
    #[serde(alias = "conditionId", default)]
    condition_id: Option<String>,
    /// Market question text.
    #[serde(default)]
    question: Option<String>,
    /// Trailing 24h volume in USD.
    #[serde(alias = "volume24hr", default)]
    volume_24h: Option<f64>,
}

impl GammaMarket {
    /// Convert to a summary, dropping rows without a condition ID.
    fn into_summary(self) -> Option<MarketSummary> {
        let condition_id = self.condition_id.filter(|s| !s.is_empty())?;
        Some(MarketSummary {
            condition_id,
            question: self.question.unwrap_or_default(),
            volume_24h: self
                .volume_24h
                .and_then(Decimal::from_f64)
                .unwrap_or_default(),
        })
    }
}
