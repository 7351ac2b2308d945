//! Wallet classification from an activity page.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use scanner_core::api::DataTrade;
use scanner_core::types::WalletRecord;
use std::collections::HashSet;

/// Build a [`WalletRecord`] from a wallet's activity page.
///
/// Returns `None` when the page is empty — such a wallet is neither
/// classified nor counted. Records beyond the fetched page are invisible to
/// classification; `first_trade_time` is the earliest *observed* trade.
pub fn classify(address: &str, records: &[DataTrade], now: DateTime<Utc>) -> Option<WalletRecord> {
    if records.is_empty() {
        return None;
    }

    let mut first_trade_time: Option<DateTime<Utc>> = None;
    let mut total_volume = Decimal::ZERO;
    let mut markets: HashSet<&str> = HashSet::new();

    for record in records {
        total_volume += record.notional_usd();

        if let Some(market) = record.condition_id.as_deref() {
            if !market.is_empty() {
                markets.insert(market);
            }
        }

        // Non-positive timestamps are unusable and never become the first
        // trade, so a wallet with only such records is never "new".
        if let Some(ts) = record.timestamp_utc() {
            if first_trade_time.map_or(true, |first| ts < first) {
                first_trade_time = Some(ts);
            }
        }
    }

    Some(WalletRecord {
        address: address.to_lowercase(),
        first_trade_time,
        total_trades: records.len() as u64,
        total_volume,
        markets_traded: markets.len(),
        classified_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn trade(tx: &str, market: &str, ts: i64, price: f64, size: f64) -> DataTrade {
        DataTrade {
            transaction_hash: tx.to_string(),
            wallet_address: "0xABC".to_string(),
            side: "BUY".to_string(),
            condition_id: Some(market.to_string()),
            size,
            price,
            usd_value: None,
            timestamp: ts,
            title: None,
            outcome: Some("Yes".to_string()),
        }
    }

    #[test]
    fn test_empty_activity_is_absent() {
        assert!(classify("0xabc", &[], Utc::now()).is_none());
    }

    #[test]
    fn test_aggregates() {
        let now = Utc::now();
        let base = now.timestamp();
        let records = vec![
            trade("0xt1", "0xm1", base - 3600, 0.5, 1000.0), // $500
            trade("0xt2", "0xm2", base - 1800, 0.5, 3000.0), // $1500
            trade("0xt3", "0xm1", base - 600, 0.5, 4000.0),  // $2000
        ];

        let record = classify("0xABC", &records, now).unwrap();
        assert_eq!(record.address, "0xabc");
        assert_eq!(record.total_trades, 3);
        assert_eq!(record.total_volume, Decimal::new(4000, 0));
        assert_eq!(record.markets_traded, 2);
        assert_eq!(
            record.first_trade_time.unwrap().timestamp(),
            base - 3600
        );
        assert!(record.is_new(now, Duration::hours(24)));
    }

    #[test]
    fn test_zero_timestamps_never_new() {
        let now = Utc::now();
        let records = vec![trade("0xt1", "0xm1", 0, 0.5, 1000.0)];

        let record = classify("0xabc", &records, now).unwrap();
        assert_eq!(record.first_trade_time, None);
        assert_eq!(record.total_trades, 1);
        assert!(!record.is_new(now, Duration::hours(24)));
    }

    #[test]
    fn test_classification_is_deterministic() {
        let now = Utc::now();
        let base = now.timestamp();
        let records = vec![
            trade("0xt1", "0xm1", base - 7200, 0.4, 100.0),
            trade("0xt2", "0xm2", base - 60, 0.6, 200.0),
        ];

        let first = classify("0xabc", &records, now).unwrap();
        let second = classify("0xabc", &records, now).unwrap();
        assert_eq!(first.first_trade_time, second.first_trade_time);
        assert_eq!(first.total_volume, second.total_volume);
        assert_eq!(
            first.is_new(now, Duration::hours(24)),
            second.is_new(now, Duration::hours(24))
        );
    }
}
