//! OHLCV bar records, one row per symbol/interval/open-time.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct PriceDatum {
    pub id: i64,
    pub symbol: String,
    /// Interval label as free text, e.g. "1m", "1h", "1d".
    pub interval: String,
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: DateTime<Utc>,
    pub quote_volume: Option<f64>,
    pub trade_count: Option<i64>,
    pub taker_buy_volume: Option<f64>,
    pub taker_buy_quote_volume: Option<f64>,
}

impl PriceDatum {
    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    /// Volume sold into the book, when taker-buy volume was recorded.
    pub fn taker_sell_volume(&self) -> Option<f64> {
        self.taker_buy_volume.map(|buy| self.volume - buy)
    }
}

/// Insert shape for a bar; the store assigns `id`. No uniqueness is enforced
/// on (symbol, interval, open_time), so re-ingesting a range duplicates rows.
#[derive(Debug, Clone)]
pub struct NewPriceDatum {
    pub symbol: String,
    pub interval: String,
    pub open_time: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub close_time: DateTime<Utc>,
    pub quote_volume: Option<f64>,
    pub trade_count: Option<i64>,
    pub taker_buy_volume: Option<f64>,
    pub taker_buy_quote_volume: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_bar() -> PriceDatum {
        PriceDatum {
            id: 1,
            symbol: "BTCUSDT".into(),
            interval: "1h".into(),
            open_time: Utc::now(),
            open: 100.0,
            high: 110.0,
            low: 90.0,
            close: 105.0,
            volume: 500.0,
            close_time: Utc::now(),
            quote_volume: Some(52_500.0),
            trade_count: Some(1_200),
            taker_buy_volume: Some(300.0),
            taker_buy_quote_volume: Some(31_500.0),
        }
    }

    #[test]
    fn typical_price() {
        let bar = sample_bar();
        let expected = (110.0 + 90.0 + 105.0) / 3.0;
        assert!((bar.typical_price() - expected).abs() < f64::EPSILON);
    }

    #[test]
    fn taker_sell_volume() {
        let bar = sample_bar();
        assert_eq!(bar.taker_sell_volume(), Some(200.0));
    }

    #[test]
    fn taker_sell_volume_absent_without_taker_buy() {
        let mut bar = sample_bar();
        bar.taker_buy_volume = None;
        assert_eq!(bar.taker_sell_volume(), None);
    }
}
