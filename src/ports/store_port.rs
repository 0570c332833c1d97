//! Persistence port trait over the six ledger tables.

use chrono::{DateTime, Utc};

use crate::domain::account::{Account, NewAccount};
use crate::domain::error::LedgerError;
use crate::domain::portfolio_history::{NewPortfolioHistoryRecord, PortfolioHistoryRecord};
use crate::domain::position::{NewPosition, Position};
use crate::domain::price_data::{NewPriceDatum, PriceDatum};
use crate::domain::signal::{NewStrategySignal, StrategySignal};
use crate::domain::trade::{NewTrade, Trade};

/// Mutation applied to an account's money columns. Fields left `None` keep
/// their stored value; `last_update` is stamped by the store.
#[derive(Debug, Clone, Default)]
pub struct AccountUpdate {
    pub cash_balance: Option<f64>,
    pub margin_requirement: Option<f64>,
    pub margin_used: Option<f64>,
}

/// Mutation applied to an open position as fills arrive.
#[derive(Debug, Clone, Default)]
pub struct PositionUpdate {
    pub long_quantity: Option<f64>,
    pub short_quantity: Option<f64>,
    pub long_cost_basis: Option<f64>,
    pub short_cost_basis: Option<f64>,
    pub short_margin_used: Option<f64>,
}

pub trait StorePort {
    /// Idempotent schema bootstrap: create missing tables, add missing
    /// columns to existing ones.
    fn ensure_schema(&self) -> Result<(), LedgerError>;

    // accounts
    fn insert_account(&self, account: &NewAccount) -> Result<(), LedgerError>;
    fn get_account(&self, account_id: &str) -> Result<Option<Account>, LedgerError>;
    fn list_accounts(&self) -> Result<Vec<Account>, LedgerError>;
    fn update_account(&self, account_id: &str, update: &AccountUpdate)
        -> Result<(), LedgerError>;

    // trades (append-only)
    fn insert_trade(&self, trade: &NewTrade) -> Result<i64, LedgerError>;
    fn fetch_trades(&self, account_id: &str) -> Result<Vec<Trade>, LedgerError>;
    /// Insert the trade and apply the account mutation in one transaction.
    /// The caller owns the balance arithmetic; the store owns atomicity.
    fn record_trade(&self, trade: &NewTrade, update: &AccountUpdate)
        -> Result<i64, LedgerError>;

    // positions
    fn insert_position(&self, position: &NewPosition) -> Result<i64, LedgerError>;
    fn get_position(&self, position_id: i64) -> Result<Option<Position>, LedgerError>;
    fn open_positions(&self, account_id: &str) -> Result<Vec<Position>, LedgerError>;
    fn update_position(
        &self,
        position_id: i64,
        update: &PositionUpdate,
    ) -> Result<(), LedgerError>;
    /// Mark the position closed. `opened_at` is never touched.
    fn close_position(
        &self,
        position_id: i64,
        closed_at: DateTime<Utc>,
    ) -> Result<(), LedgerError>;

    // price data (append-only time series)
    fn insert_price_data(&self, bars: &[NewPriceDatum]) -> Result<(), LedgerError>;
    fn fetch_price_data(
        &self,
        symbol: &str,
        interval: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceDatum>, LedgerError>;
    fn price_data_range(
        &self,
        symbol: &str,
        interval: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, LedgerError>;
    fn list_symbols(&self, interval: &str) -> Result<Vec<String>, LedgerError>;

    // strategy signals (append-only)
    fn insert_signal(&self, signal: &NewStrategySignal) -> Result<i64, LedgerError>;
    fn fetch_signals(
        &self,
        symbol: &str,
        interval: &str,
        strategy_name: Option<&str>,
    ) -> Result<Vec<StrategySignal>, LedgerError>;

    // portfolio history (append-only)
    fn insert_portfolio_record(
        &self,
        record: &NewPortfolioHistoryRecord,
    ) -> Result<i64, LedgerError>;
    fn portfolio_history(
        &self,
        account_id: &str,
    ) -> Result<Vec<PortfolioHistoryRecord>, LedgerError>;
}
