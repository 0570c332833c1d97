#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use tradeledger::adapters::sqlite_adapter::SqliteAdapter;
use tradeledger::domain::account::NewAccount;
use tradeledger::domain::portfolio_history::NewPortfolioHistoryRecord;
use tradeledger::domain::position::NewPosition;
use tradeledger::domain::price_data::NewPriceDatum;
use tradeledger::domain::signal::NewStrategySignal;
use tradeledger::domain::trade::NewTrade;
use tradeledger::ports::store_port::StorePort;

/// Fresh in-memory store with the schema bootstrapped.
pub fn open_store() -> SqliteAdapter {
    let store = SqliteAdapter::in_memory().unwrap();
    store.ensure_schema().unwrap();
    store
}

/// Store with one zero-balance account already present.
pub fn store_with_account(account_id: &str) -> SqliteAdapter {
    let store = open_store();
    store
        .insert_account(&NewAccount::new(account_id, "test-owner"))
        .unwrap();
    store
}

pub fn ts(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
}

pub fn make_trade(account_id: &str, symbol: &str, minutes: i64) -> NewTrade {
    NewTrade::new(account_id, symbol, ts(minutes), "buy", 0.5, 40_000.0)
}

pub fn make_position(account_id: &str, symbol: &str, minutes: i64) -> NewPosition {
    NewPosition::new(account_id, symbol, ts(minutes)).with_long(1.0, 40_000.0)
}

pub fn make_bar(symbol: &str, interval: &str, minutes: i64) -> NewPriceDatum {
    NewPriceDatum {
        symbol: symbol.to_string(),
        interval: interval.to_string(),
        open_time: ts(minutes),
        open: 100.0,
        high: 110.0,
        low: 90.0,
        close: 105.0,
        volume: 500.0,
        close_time: ts(minutes + 59),
        quote_volume: Some(52_500.0),
        trade_count: Some(1_200),
        taker_buy_volume: Some(300.0),
        taker_buy_quote_volume: Some(31_500.0),
    }
}

pub fn make_signal(symbol: &str, strategy: &str, minutes: i64) -> NewStrategySignal {
    NewStrategySignal::new(symbol, "1h", ts(minutes), strategy, "buy")
}

pub fn make_snapshot(account_id: &str, minutes: i64, value: f64) -> NewPortfolioHistoryRecord {
    NewPortfolioHistoryRecord::new(account_id, ts(minutes), value)
}
