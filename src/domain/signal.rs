//! Strategy signal records.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct StrategySignal {
    pub signal_id: i64,
    pub symbol: String,
    pub interval: String,
    pub timestamp: DateTime<Utc>,
    pub strategy_name: String,
    /// Free-form signal label; callers conventionally use "buy"/"sell"/"hold".
    pub signal: String,
    pub confidence: Option<f64>,
    /// Opaque serialized payload emitted by the strategy. Stored verbatim;
    /// its internal structure is owned by whoever wrote it.
    pub metrics: Option<String>,
}

/// Insert shape for a signal; the store assigns `signal_id`.
#[derive(Debug, Clone)]
pub struct NewStrategySignal {
    pub symbol: String,
    pub interval: String,
    pub timestamp: DateTime<Utc>,
    pub strategy_name: String,
    pub signal: String,
    pub confidence: Option<f64>,
    pub metrics: Option<String>,
}

impl NewStrategySignal {
    pub fn new(
        symbol: impl Into<String>,
        interval: impl Into<String>,
        timestamp: DateTime<Utc>,
        strategy_name: impl Into<String>,
        signal: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            interval: interval.into(),
            timestamp,
            strategy_name: strategy_name.into(),
            signal: signal.into(),
            confidence: None,
            metrics: None,
        }
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn with_metrics(mut self, metrics: impl Into<String>) -> Self {
        self.metrics = Some(metrics.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_fields_only() {
        let new = NewStrategySignal::new("BTCUSDT", "1h", Utc::now(), "momentum", "buy");
        assert!(new.confidence.is_none());
        assert!(new.metrics.is_none());
    }

    #[test]
    fn metrics_stored_verbatim() {
        let payload = r#"{"rsi":71.2,"macd":-0.4}"#;
        let new = NewStrategySignal::new("BTCUSDT", "1h", Utc::now(), "momentum", "sell")
            .with_confidence(0.82)
            .with_metrics(payload);
        assert_eq!(new.confidence, Some(0.82));
        assert_eq!(new.metrics.as_deref(), Some(payload));
    }
}
