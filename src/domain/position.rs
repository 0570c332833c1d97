//! Position records. Long and short exposure on the same symbol are tracked
//! independently, so an account can carry both sides at once.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct Position {
    pub position_id: i64,
    pub account_id: String,
    pub symbol: String,
    pub long_quantity: f64,
    pub short_quantity: f64,
    pub long_cost_basis: f64,
    pub short_cost_basis: f64,
    pub short_margin_used: f64,
    pub opened_at: DateTime<Utc>,
    /// Null while the position is open; set once on close, never cleared.
    pub closed_at: Option<DateTime<Utc>>,
}

impl Position {
    pub fn is_open(&self) -> bool {
        self.closed_at.is_none()
    }

    /// Long minus short quantity.
    pub fn net_quantity(&self) -> f64 {
        self.long_quantity - self.short_quantity
    }

    pub fn is_flat(&self) -> bool {
        self.long_quantity == 0.0 && self.short_quantity == 0.0
    }
}

/// Insert shape for a position; the store assigns `position_id` and the row
/// starts open (`closed_at` null).
#[derive(Debug, Clone)]
pub struct NewPosition {
    pub account_id: String,
    pub symbol: String,
    pub long_quantity: f64,
    pub short_quantity: f64,
    pub long_cost_basis: f64,
    pub short_cost_basis: f64,
    pub short_margin_used: f64,
    pub opened_at: DateTime<Utc>,
}

impl NewPosition {
    pub fn new(
        account_id: impl Into<String>,
        symbol: impl Into<String>,
        opened_at: DateTime<Utc>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            symbol: symbol.into(),
            long_quantity: 0.0,
            short_quantity: 0.0,
            long_cost_basis: 0.0,
            short_cost_basis: 0.0,
            short_margin_used: 0.0,
            opened_at,
        }
    }

    pub fn with_long(mut self, quantity: f64, cost_basis: f64) -> Self {
        self.long_quantity = quantity;
        self.long_cost_basis = cost_basis;
        self
    }

    pub fn with_short(mut self, quantity: f64, cost_basis: f64, margin_used: f64) -> Self {
        self.short_quantity = quantity;
        self.short_cost_basis = cost_basis;
        self.short_margin_used = margin_used;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_position() -> Position {
        Position {
            position_id: 7,
            account_id: "acct-1".into(),
            symbol: "BTCUSDT".into(),
            long_quantity: 1.5,
            short_quantity: 0.5,
            long_cost_basis: 39_000.0,
            short_cost_basis: 41_000.0,
            short_margin_used: 20_500.0,
            opened_at: Utc::now(),
            closed_at: None,
        }
    }

    #[test]
    fn open_until_closed_at_set() {
        let mut position = sample_position();
        assert!(position.is_open());
        position.closed_at = Some(Utc::now());
        assert!(!position.is_open());
    }

    #[test]
    fn net_quantity_is_long_minus_short() {
        let position = sample_position();
        assert!((position.net_quantity() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn flat_when_both_sides_zero() {
        let mut position = sample_position();
        assert!(!position.is_flat());
        position.long_quantity = 0.0;
        position.short_quantity = 0.0;
        assert!(position.is_flat());
    }

    #[test]
    fn new_position_starts_empty() {
        let new = NewPosition::new("acct-1", "ETHUSDT", Utc::now());
        assert_eq!(new.long_quantity, 0.0);
        assert_eq!(new.short_quantity, 0.0);
        assert_eq!(new.short_margin_used, 0.0);
    }

    #[test]
    fn builder_sets_both_sides() {
        let new = NewPosition::new("acct-1", "ETHUSDT", Utc::now())
            .with_long(2.0, 2_400.0)
            .with_short(1.0, 2_600.0, 2_600.0);
        assert_eq!(new.long_quantity, 2.0);
        assert_eq!(new.short_quantity, 1.0);
        assert_eq!(new.short_margin_used, 2_600.0);
    }
}
