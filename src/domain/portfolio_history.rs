//! Portfolio valuation snapshots. Cadence is the caller's decision; the
//! store just appends whatever it is handed.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct PortfolioHistoryRecord {
    pub record_id: i64,
    pub account_id: String,
    pub timestamp: DateTime<Utc>,
    pub portfolio_value: f64,
    pub long_exposure: Option<f64>,
    pub short_exposure: Option<f64>,
    pub gross_exposure: Option<f64>,
    pub net_exposure: Option<f64>,
    pub long_short_ratio: Option<f64>,
}

/// Insert shape for a snapshot; the store assigns `record_id`.
#[derive(Debug, Clone)]
pub struct NewPortfolioHistoryRecord {
    pub account_id: String,
    pub timestamp: DateTime<Utc>,
    pub portfolio_value: f64,
    pub long_exposure: Option<f64>,
    pub short_exposure: Option<f64>,
    pub gross_exposure: Option<f64>,
    pub net_exposure: Option<f64>,
    pub long_short_ratio: Option<f64>,
}

impl NewPortfolioHistoryRecord {
    pub fn new(
        account_id: impl Into<String>,
        timestamp: DateTime<Utc>,
        portfolio_value: f64,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            timestamp,
            portfolio_value,
            long_exposure: None,
            short_exposure: None,
            gross_exposure: None,
            net_exposure: None,
            long_short_ratio: None,
        }
    }

    pub fn with_exposures(mut self, long: f64, short: f64) -> Self {
        self.long_exposure = Some(long);
        self.short_exposure = Some(short);
        self.gross_exposure = Some(long + short);
        self.net_exposure = Some(long - short);
        self.long_short_ratio = if short != 0.0 { Some(long / short) } else { None };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_only_snapshot() {
        let new = NewPortfolioHistoryRecord::new("acct-1", Utc::now(), 125_000.0);
        assert!(new.long_exposure.is_none());
        assert!(new.long_short_ratio.is_none());
    }

    #[test]
    fn exposures_derive_gross_and_net() {
        let new = NewPortfolioHistoryRecord::new("acct-1", Utc::now(), 125_000.0)
            .with_exposures(80_000.0, 20_000.0);
        assert_eq!(new.gross_exposure, Some(100_000.0));
        assert_eq!(new.net_exposure, Some(60_000.0));
        assert_eq!(new.long_short_ratio, Some(4.0));
    }

    #[test]
    fn zero_short_leaves_ratio_unset() {
        let new = NewPortfolioHistoryRecord::new("acct-1", Utc::now(), 125_000.0)
            .with_exposures(80_000.0, 0.0);
        assert_eq!(new.long_short_ratio, None);
    }
}
