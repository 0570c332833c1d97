//! tradeledger — persistent store for trading accounts, trades, positions,
//! price history, strategy signals and portfolio valuations.
//!
//! Hexagonal architecture: record types in [`domain`], port traits in
//! [`ports`], concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
