//! Trade significance filtering.

use crate::state::ScanState;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use scanner_core::api::DataTrade;
use scanner_core::types::TradeSignal;
use tracing::debug;

/// Select the significant, not-yet-surfaced trades from a wallet's activity.
///
/// A record qualifies when its timestamp falls within the lookback window
/// ending at `now` and its USD notional meets `min_amount_usd` (both
/// boundaries inclusive). Qualifying trades are marked in `state` before
/// being returned so the same trade can never be surfaced twice, even if the
/// raw record reappears in a later fetch. Output preserves feed order.
pub fn filter_significant(
    address: &str,
    records: &[DataTrade],
    now: DateTime<Utc>,
    lookback: Duration,
    min_amount_usd: Decimal,
    state: &ScanState,
) -> Vec<TradeSignal> {
    let address = address.to_lowercase();
    let cutoff = now - lookback;
    let mut signals = Vec::new();

    for record in records {
        let timestamp = match record.timestamp_utc() {
            Some(ts) if ts >= cutoff => ts,
            _ => continue,
        };

        let amount_usd = record.notional_usd();
        if amount_usd < min_amount_usd {
            continue;
        }

        let signal = TradeSignal {
            wallet_address: address.clone(),
            market_id: record.condition_id.clone().unwrap_or_default(),
            outcome: record.outcome.clone().unwrap_or_default(),
            amount_usd,
            price: Decimal::from_f64(record.price).unwrap_or_default(),
            size: Decimal::from_f64(record.size).unwrap_or_default(),
            timestamp,
            tx_hash: record.transaction_hash.clone(),
            title: record.title.clone(),
        };

        // Check-and-set: silently skip trades surfaced in an earlier pass.
        if !state.mark_processed(&signal.identity()) {
            debug!(trade = %signal.identity(), "Trade already surfaced, skipping");
            continue;
        }

        signals.push(signal);
    }

    signals
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(tx: &str, ts: i64, price: f64, size: f64) -> DataTrade {
        DataTrade {
            transaction_hash: tx.to_string(),
            wallet_address: "0xabc".to_string(),
            side: "BUY".to_string(),
            condition_id: Some("0xm1".to_string()),
            size,
            price,
            usd_value: None,
            timestamp: ts,
            title: Some("Will it rain?".to_string()),
            outcome: Some("Yes".to_string()),
        }
    }

    #[test]
    fn test_threshold_boundary_inclusive() {
        let now = Utc::now();
        let base = now.timestamp();
        let min = Decimal::new(1000, 0);
        let state = ScanState::new();

        // Exactly $1000.00 and one cent below.
        let records = vec![
            trade("0xt1", base - 60, 0.5, 2000.0),   // $1000.00
            trade("0xt2", base - 60, 0.9999, 1000.0), // $999.90
        ];

        let signals =
            filter_significant("0xabc", &records, now, Duration::hours(24), min, &state);
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].tx_hash, "0xt1");
        assert_eq!(signals[0].amount_usd, Decimal::new(1000, 0));
    }

    #[test]
    fn test_one_cent_below_excluded() {
        let now = Utc::now();
        let base = now.timestamp();
        let state = ScanState::new();

        let mut below = trade("0xt1", base - 60, 0.0, 0.0);
        below.usd_value = Some(999.99);
        let mut exact = trade("0xt2", base - 60, 0.0, 0.0);
        exact.usd_value = Some(1000.00);

        let signals = filter_significant(
            "0xabc",
            &[below, exact],
            now,
            Duration::hours(24),
            Decimal::new(1000, 0),
            &state,
        );
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].tx_hash, "0xt2");
    }

    #[test]
    fn test_lookback_window_excludes_old_trades() {
        // Whole-second `now` so the cutoff comparison is exact.
        let now = DateTime::from_timestamp(Utc::now().timestamp(), 0).unwrap();
        let lookback = Duration::hours(24);
        let base = now.timestamp();
        let state = ScanState::new();

        let records = vec![
            trade("0xt1", base - 24 * 3600, 0.5, 4000.0),     // exactly at cutoff
            trade("0xt2", base - 24 * 3600 - 1, 0.5, 4000.0), // one second older
        ];

        let signals = filter_significant(
            "0xabc",
            &records,
            now,
            lookback,
            Decimal::new(1000, 0),
            &state,
        );
        assert_eq!(signals.len(), 1);
        assert_eq!(signals[0].tx_hash, "0xt1");
    }

    #[test]
    fn test_repeat_records_surface_once() {
        let now = Utc::now();
        let base = now.timestamp();
        let state = ScanState::new();
        let records = vec![trade("0xt1", base - 60, 0.5, 4000.0)];

        let first = filter_significant(
            "0xabc",
            &records,
            now,
            Duration::hours(24),
            Decimal::new(1000, 0),
            &state,
        );
        assert_eq!(first.len(), 1);

        // Same raw records reappear on a later fetch.
        let second = filter_significant(
            "0xabc",
            &records,
            now,
            Duration::hours(24),
            Decimal::new(1000, 0),
            &state,
        );
        assert!(second.is_empty());
    }

    #[test]
    fn test_feed_order_preserved() {
        let now = Utc::now();
        let base = now.timestamp();
        let state = ScanState::new();

        // Feed is newest-first; output must not be re-sorted.
        let records = vec![
            trade("0xt-new", base - 60, 0.5, 4000.0),
            trade("0xt-old", base - 3600, 0.5, 4000.0),
        ];

        let signals = filter_significant(
            "0xabc",
            &records,
            now,
            Duration::hours(24),
            Decimal::new(1000, 0),
            &state,
        );
        let hashes: Vec<&str> = signals.iter().map(|s| s.tx_hash.as_str()).collect();
        assert_eq!(hashes, vec!["0xt-new", "0xt-old"]);
    }
}
