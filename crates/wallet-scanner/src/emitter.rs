//! Signal emission boundary.
//!
//! The scanner hands qualifying (wallet, trade) pairs to a [`SignalEmitter`].
//! Actual order placement lives behind this seam and is out of scope; the
//! default emitter logs the signal, and [`BroadcastEmitter`] fans signals out
//! to programmatic consumers.

use async_trait::async_trait;
use scanner_core::types::{TradeSignal, WalletRecord};
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Receives each qualifying trade exactly once, in scan order.
#[async_trait]
pub trait SignalEmitter: Send + Sync {
    async fn on_significant_trade(&self, wallet: &WalletRecord, trade: &TradeSignal);
}

/// Default emitter: logs a copy-trade signal block.
pub struct LogEmitter;

#[async_trait]
impl SignalEmitter for LogEmitter {
    async fn on_significant_trade(&self, wallet: &WalletRecord, trade: &TradeSignal) {
        let market = trade
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(trade.market_id.as_str());

        info!(
            wallet = %trade.wallet_address,
            market = %market,
            outcome = %trade.outcome,
            amount_usd = %trade.amount_usd,
            tx_hash = %trade.tx_hash,
            time = %trade.timestamp,
            first_trade = ?wallet.first_trade_time,
            "COPY TRADE SIGNAL"
        );
    }
}

/// Emitter that republishes signals on a tokio broadcast channel.
pub struct BroadcastEmitter {
    tx: broadcast::Sender<TradeSignal>,
}

impl BroadcastEmitter {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TradeSignal> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl SignalEmitter for BroadcastEmitter {
    async fn on_significant_trade(&self, _wallet: &WalletRecord, trade: &TradeSignal) {
        if self.tx.send(trade.clone()).is_err() {
            warn!("No subscribers for trade signals");
        }
    }
}
