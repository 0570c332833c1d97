//! Core domain record types for the trading ledger.

pub mod account;
pub mod trade;
pub mod position;
pub mod price_data;
pub mod signal;
pub mod portfolio_history;
pub mod error;
