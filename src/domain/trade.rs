//! Executed trade records. Trades are append-only: once written they are
//! never updated or deleted.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Trade {
    pub trade_id: i64,
    pub account_id: String,
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    /// Free-form side label; callers conventionally use "buy"/"sell".
    pub side: String,
    pub quantity: f64,
    pub price: f64,
    pub fee: f64,
    pub realized_pnl: f64,
    pub strategy: Option<String>,
}

impl Trade {
    pub fn notional(&self) -> f64 {
        self.quantity * self.price
    }

    /// Realized profit net of the execution fee.
    pub fn net_pnl(&self) -> f64 {
        self.realized_pnl - self.fee
    }
}

/// Insert shape for a trade; the store assigns `trade_id`.
#[derive(Debug, Clone)]
pub struct NewTrade {
    pub account_id: String,
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    pub side: String,
    pub quantity: f64,
    pub price: f64,
    pub fee: f64,
    pub realized_pnl: f64,
    pub strategy: Option<String>,
}

impl NewTrade {
    pub fn new(
        account_id: impl Into<String>,
        symbol: impl Into<String>,
        timestamp: DateTime<Utc>,
        side: impl Into<String>,
        quantity: f64,
        price: f64,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            symbol: symbol.into(),
            timestamp,
            side: side.into(),
            quantity,
            price,
            fee: 0.0,
            realized_pnl: 0.0,
            strategy: None,
        }
    }

    pub fn with_fee(mut self, fee: f64) -> Self {
        self.fee = fee;
        self
    }

    pub fn with_realized_pnl(mut self, realized_pnl: f64) -> Self {
        self.realized_pnl = realized_pnl;
        self
    }

    pub fn with_strategy(mut self, strategy: impl Into<String>) -> Self {
        self.strategy = Some(strategy.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_trade() -> Trade {
        Trade {
            trade_id: 1,
            account_id: "acct-1".into(),
            symbol: "BTCUSDT".into(),
            timestamp: Utc::now(),
            side: "buy".into(),
            quantity: 0.5,
            price: 40_000.0,
            fee: 10.0,
            realized_pnl: 250.0,
            strategy: Some("momentum".into()),
        }
    }

    #[test]
    fn notional_value() {
        let trade = sample_trade();
        assert!((trade.notional() - 20_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn net_pnl_subtracts_fee() {
        let trade = sample_trade();
        assert!((trade.net_pnl() - 240.0).abs() < f64::EPSILON);
    }

    #[test]
    fn new_trade_defaults() {
        let new = NewTrade::new("acct-1", "ETHUSDT", Utc::now(), "sell", 2.0, 2_500.0);
        assert_eq!(new.fee, 0.0);
        assert_eq!(new.realized_pnl, 0.0);
        assert!(new.strategy.is_none());
    }
}
