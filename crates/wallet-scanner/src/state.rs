//! In-memory dedup state for the scan loop.

use dashmap::{DashMap, DashSet};
use scanner_core::types::WalletRecord;

/// Process-lifetime scan state: wallets already classified, wallets tracked
/// as "new", and trade identities already surfaced.
///
/// All three collections are append-only; there is no eviction. The scan
/// loop is the single writer.
#[derive(Default)]
pub struct ScanState {
    seen_wallets: DashSet<String>,
    tracked_wallets: DashMap<String, WalletRecord>,
    processed_trades: DashSet<String>,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that an address has been classified (new or not).
    pub fn mark_seen(&self, address: &str) {
        self.seen_wallets.insert(address.to_lowercase());
    }

    pub fn is_seen(&self, address: &str) -> bool {
        self.seen_wallets.contains(&address.to_lowercase())
    }

    /// Track a wallet classified as "new".
    pub fn track(&self, record: WalletRecord) {
        self.tracked_wallets.insert(record.address.clone(), record);
    }

    /// Record a trade identity. Returns `true` if it was newly inserted,
    /// `false` if this trade was already surfaced.
    pub fn mark_processed(&self, trade_identity: &str) -> bool {
        self.processed_trades.insert(trade_identity.to_string())
    }

    /// Snapshot of all tracked wallets.
    pub fn tracked(&self) -> Vec<WalletRecord> {
        self.tracked_wallets
            .iter()
            .map(|e| e.value().clone())
            .collect()
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked_wallets.len()
    }

    pub fn seen_count(&self) -> usize {
        self.seen_wallets.len()
    }
}
