//! Trading account records.

use chrono::{DateTime, Utc};

/// A persisted trading account row.
#[derive(Debug, Clone)]
pub struct Account {
    pub account_id: String,
    pub owner: String,
    pub created_at: DateTime<Utc>,
    pub cash_balance: f64,
    pub margin_requirement: f64,
    pub margin_used: f64,
    pub last_update: Option<DateTime<Utc>>,
}

impl Account {
    /// Margin still available before the account breaches its requirement
    /// plus cash. Advisory only; the store never enforces this.
    pub fn margin_headroom(&self) -> f64 {
        self.margin_requirement + self.cash_balance - self.margin_used
    }

    pub fn within_margin(&self) -> bool {
        self.margin_used <= self.margin_requirement + self.cash_balance
    }
}

/// Insert shape for an account. `account_id` is caller-assigned; the money
/// columns default to zero and `created_at` is stamped by the store at insert.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub account_id: String,
    pub owner: String,
    pub cash_balance: f64,
    pub margin_requirement: f64,
    pub margin_used: f64,
}

impl NewAccount {
    pub fn new(account_id: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            owner: owner.into(),
            cash_balance: 0.0,
            margin_requirement: 0.0,
            margin_used: 0.0,
        }
    }

    pub fn with_cash_balance(mut self, cash_balance: f64) -> Self {
        self.cash_balance = cash_balance;
        self
    }

    pub fn with_margin_requirement(mut self, margin_requirement: f64) -> Self {
        self.margin_requirement = margin_requirement;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account {
            account_id: "acct-1".into(),
            owner: "sam".into(),
            created_at: Utc::now(),
            cash_balance: 10_000.0,
            margin_requirement: 5_000.0,
            margin_used: 2_000.0,
            last_update: None,
        }
    }

    #[test]
    fn margin_headroom() {
        let account = sample_account();
        // 5000 + 10000 - 2000
        assert!((account.margin_headroom() - 13_000.0).abs() < f64::EPSILON);
        assert!(account.within_margin());
    }

    #[test]
    fn over_margin_detected() {
        let mut account = sample_account();
        account.margin_used = 20_000.0;
        assert!(!account.within_margin());
        assert!(account.margin_headroom() < 0.0);
    }

    #[test]
    fn new_account_defaults_to_zero_balances() {
        let new = NewAccount::new("acct-1", "sam");
        assert_eq!(new.cash_balance, 0.0);
        assert_eq!(new.margin_requirement, 0.0);
        assert_eq!(new.margin_used, 0.0);
    }

    #[test]
    fn builder_overrides() {
        let new = NewAccount::new("acct-1", "sam")
            .with_cash_balance(50_000.0)
            .with_margin_requirement(10_000.0);
        assert_eq!(new.cash_balance, 50_000.0);
        assert_eq!(new.margin_requirement, 10_000.0);
        assert_eq!(new.margin_used, 0.0);
    }
}
