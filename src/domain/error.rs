//! Crate-wide error types.

/// Top-level error type for tradeledger.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("no such account: {account_id}")]
    AccountNotFound { account_id: String },

    #[error("no price data for {symbol} at interval {interval}")]
    NoData { symbol: String, interval: String },

    #[error("import error in {file}: {reason}")]
    Import { file: String, reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<&LedgerError> for std::process::ExitCode {
    fn from(err: &LedgerError) -> Self {
        let code: u8 = match err {
            LedgerError::Io(_) => 1,
            LedgerError::ConfigParse { .. }
            | LedgerError::ConfigMissing { .. }
            | LedgerError::ConfigInvalid { .. } => 2,
            LedgerError::Database { .. } | LedgerError::DatabaseQuery { .. } => 3,
            LedgerError::Import { .. } => 4,
            LedgerError::AccountNotFound { .. } | LedgerError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::ExitCode;

    #[test]
    fn config_errors_share_exit_code() {
        let missing = LedgerError::ConfigMissing {
            section: "sqlite".into(),
            key: "path".into(),
        };
        let invalid = LedgerError::ConfigInvalid {
            section: "sqlite".into(),
            key: "pool_size".into(),
            reason: "not a number".into(),
        };
        assert_eq!(
            format!("{:?}", ExitCode::from(&missing)),
            format!("{:?}", ExitCode::from(&invalid))
        );
    }

    #[test]
    fn display_includes_context() {
        let err = LedgerError::NoData {
            symbol: "BTCUSDT".into(),
            interval: "1h".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("BTCUSDT"));
        assert!(msg.contains("1h"));
    }
}
