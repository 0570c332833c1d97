//! PostgreSQL store adapter (feature `postgres`). Mirrors the SQLite
//! adapter's behavior with native TIMESTAMPTZ columns and BIGSERIAL keys.

use crate::domain::account::{Account, NewAccount};
use crate::domain::error::LedgerError;
use crate::domain::portfolio_history::{NewPortfolioHistoryRecord, PortfolioHistoryRecord};
use crate::domain::position::{NewPosition, Position};
use crate::domain::price_data::{NewPriceDatum, PriceDatum};
use crate::domain::signal::{NewStrategySignal, StrategySignal};
use crate::domain::trade::{NewTrade, Trade};
use crate::ports::config_port::ConfigPort;
use crate::ports::store_port::{AccountUpdate, PositionUpdate, StorePort};
use chrono::{DateTime, Utc};
use postgres::types::ToSql;
use postgres::{Client, NoTls, Row};
use std::cell::RefCell;
use tracing::info;

struct TableSpec {
    name: &'static str,
    columns: &'static [(&'static str, &'static str)],
    constraints: &'static [&'static str],
}

impl TableSpec {
    fn create_sql(&self) -> String {
        let mut parts: Vec<String> = self
            .columns
            .iter()
            .map(|(name, ddl)| format!("{name} {ddl}"))
            .collect();
        parts.extend(self.constraints.iter().map(|c| c.to_string()));
        format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name,
            parts.join(", ")
        )
    }
}

const TABLES: &[TableSpec] = &[
    TableSpec {
        name: "accounts",
        columns: &[
            ("account_id", "TEXT PRIMARY KEY"),
            ("owner", "TEXT NOT NULL"),
            ("created_at", "TIMESTAMPTZ NOT NULL DEFAULT CURRENT_TIMESTAMP"),
            ("cash_balance", "DOUBLE PRECISION NOT NULL DEFAULT 0"),
            ("margin_requirement", "DOUBLE PRECISION NOT NULL DEFAULT 0"),
            ("margin_used", "DOUBLE PRECISION NOT NULL DEFAULT 0"),
            ("last_update", "TIMESTAMPTZ"),
        ],
        constraints: &[],
    },
    TableSpec {
        name: "trades",
        columns: &[
            ("trade_id", "BIGSERIAL PRIMARY KEY"),
            ("account_id", "TEXT NOT NULL"),
            ("symbol", "TEXT NOT NULL"),
            ("timestamp", "TIMESTAMPTZ NOT NULL"),
            ("side", "TEXT NOT NULL"),
            ("quantity", "DOUBLE PRECISION NOT NULL"),
            ("price", "DOUBLE PRECISION NOT NULL"),
            ("fee", "DOUBLE PRECISION NOT NULL DEFAULT 0"),
            ("realized_pnl", "DOUBLE PRECISION NOT NULL DEFAULT 0"),
            ("strategy", "TEXT"),
        ],
        constraints: &["FOREIGN KEY (account_id) REFERENCES accounts(account_id)"],
    },
    TableSpec {
        name: "positions",
        columns: &[
            ("position_id", "BIGSERIAL PRIMARY KEY"),
            ("account_id", "TEXT NOT NULL"),
            ("symbol", "TEXT NOT NULL"),
            ("long_quantity", "DOUBLE PRECISION NOT NULL DEFAULT 0"),
            ("short_quantity", "DOUBLE PRECISION NOT NULL DEFAULT 0"),
            ("long_cost_basis", "DOUBLE PRECISION NOT NULL DEFAULT 0"),
            ("short_cost_basis", "DOUBLE PRECISION NOT NULL DEFAULT 0"),
            ("short_margin_used", "DOUBLE PRECISION NOT NULL DEFAULT 0"),
            ("opened_at", "TIMESTAMPTZ NOT NULL"),
            ("closed_at", "TIMESTAMPTZ"),
        ],
        constraints: &["FOREIGN KEY (account_id) REFERENCES accounts(account_id)"],
    },
    TableSpec {
        // Deliberately no unique index on (symbol, interval, open_time).
        name: "price_data",
        columns: &[
            ("id", "BIGSERIAL PRIMARY KEY"),
            ("symbol", "TEXT NOT NULL"),
            ("interval", "TEXT NOT NULL"),
            ("open_time", "TIMESTAMPTZ NOT NULL"),
            ("open", "DOUBLE PRECISION NOT NULL"),
            ("high", "DOUBLE PRECISION NOT NULL"),
            ("low", "DOUBLE PRECISION NOT NULL"),
            ("close", "DOUBLE PRECISION NOT NULL"),
            ("volume", "DOUBLE PRECISION NOT NULL"),
            ("close_time", "TIMESTAMPTZ NOT NULL"),
            ("quote_volume", "DOUBLE PRECISION"),
            ("trade_count", "BIGINT"),
            ("taker_buy_volume", "DOUBLE PRECISION"),
            ("taker_buy_quote_volume", "DOUBLE PRECISION"),
        ],
        constraints: &[],
    },
    TableSpec {
        name: "strategy_signals",
        columns: &[
            ("signal_id", "BIGSERIAL PRIMARY KEY"),
            ("symbol", "TEXT NOT NULL"),
            ("interval", "TEXT NOT NULL"),
            ("timestamp", "TIMESTAMPTZ NOT NULL"),
            ("strategy_name", "TEXT NOT NULL"),
            ("signal", "TEXT NOT NULL"),
            ("confidence", "DOUBLE PRECISION"),
            ("metrics", "TEXT"),
        ],
        constraints: &[],
    },
    TableSpec {
        name: "portfolio_history",
        columns: &[
            ("record_id", "BIGSERIAL PRIMARY KEY"),
            ("account_id", "TEXT NOT NULL"),
            ("timestamp", "TIMESTAMPTZ NOT NULL"),
            ("portfolio_value", "DOUBLE PRECISION NOT NULL"),
            ("long_exposure", "DOUBLE PRECISION"),
            ("short_exposure", "DOUBLE PRECISION"),
            ("gross_exposure", "DOUBLE PRECISION"),
            ("net_exposure", "DOUBLE PRECISION"),
            ("long_short_ratio", "DOUBLE PRECISION"),
        ],
        constraints: &["FOREIGN KEY (account_id) REFERENCES accounts(account_id)"],
    },
];

fn query_err(e: postgres::Error) -> LedgerError {
    LedgerError::DatabaseQuery {
        reason: e.to_string(),
    }
}

fn account_from_row(row: &Row) -> Account {
    Account {
        account_id: row.get(0),
        owner: row.get(1),
        created_at: row.get(2),
        cash_balance: row.get(3),
        margin_requirement: row.get(4),
        margin_used: row.get(5),
        last_update: row.get(6),
    }
}

fn position_from_row(row: &Row) -> Position {
    Position {
        position_id: row.get(0),
        account_id: row.get(1),
        symbol: row.get(2),
        long_quantity: row.get(3),
        short_quantity: row.get(4),
        long_cost_basis: row.get(5),
        short_cost_basis: row.get(6),
        short_margin_used: row.get(7),
        opened_at: row.get(8),
        closed_at: row.get(9),
    }
}

const ACCOUNT_COLUMNS: &str = "account_id, owner, created_at, cash_balance, \
                               margin_requirement, margin_used, last_update";

const POSITION_COLUMNS: &str = "position_id, account_id, symbol, long_quantity, \
                                short_quantity, long_cost_basis, short_cost_basis, \
                                short_margin_used, opened_at, closed_at";

const ACCOUNT_UPDATE_SQL: &str =
    "UPDATE accounts SET cash_balance = COALESCE($2, cash_balance), \
     margin_requirement = COALESCE($3, margin_requirement), \
     margin_used = COALESCE($4, margin_used), \
     last_update = $5 \
     WHERE account_id = $1";

const TRADE_INSERT_SQL: &str =
    "INSERT INTO trades (account_id, symbol, timestamp, side, quantity, price, \
                         fee, realized_pnl, strategy) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
     RETURNING trade_id";

pub struct PostgresAdapter {
    client: RefCell<Client>,
}

impl PostgresAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, LedgerError> {
        let connection_string = config
            .get_string("postgres", "connection_string")
            .ok_or_else(|| LedgerError::ConfigMissing {
                section: "postgres".into(),
                key: "connection_string".into(),
            })?;

        let client =
            Client::connect(&connection_string, NoTls).map_err(|e| LedgerError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client: RefCell::new(client),
        })
    }

    /// Create missing tables, then add any column a live table lacks
    /// compared to [`TABLES`].
    fn bootstrap_schema(&self) -> Result<(), LedgerError> {
        let mut client = self.client.borrow_mut();

        for spec in TABLES {
            let exists: bool = client
                .query_one("SELECT to_regclass($1) IS NOT NULL", &[&spec.name])
                .map_err(query_err)?
                .get(0);

            if !exists {
                info!(table = spec.name, "creating table");
                client.execute(&spec.create_sql(), &[]).map_err(query_err)?;
                continue;
            }

            let existing: Vec<String> = client
                .query(
                    "SELECT column_name FROM information_schema.columns WHERE table_name = $1",
                    &[&spec.name],
                )
                .map_err(query_err)?
                .into_iter()
                .map(|row| row.get(0))
                .collect();

            for (name, ddl) in spec.columns {
                if existing.iter().any(|c| c == name) {
                    continue;
                }
                info!(table = spec.name, column = name, "adding missing column");
                client
                    .execute(
                        &format!("ALTER TABLE {} ADD COLUMN {} {}", spec.name, name, ddl),
                        &[],
                    )
                    .map_err(query_err)?;
            }
        }

        Ok(())
    }
}

impl StorePort for PostgresAdapter {
    fn ensure_schema(&self) -> Result<(), LedgerError> {
        self.bootstrap_schema()
    }

    fn insert_account(&self, account: &NewAccount) -> Result<(), LedgerError> {
        self.client
            .borrow_mut()
            .execute(
                "INSERT INTO accounts (account_id, owner, created_at, cash_balance, \
                                       margin_requirement, margin_used) \
                 VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &account.account_id,
                    &account.owner,
                    &Utc::now(),
                    &account.cash_balance,
                    &account.margin_requirement,
                    &account.margin_used,
                ],
            )
            .map_err(query_err)?;
        Ok(())
    }

    fn get_account(&self, account_id: &str) -> Result<Option<Account>, LedgerError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = $1");
        let row = self
            .client
            .borrow_mut()
            .query_opt(&query, &[&account_id])
            .map_err(query_err)?;
        Ok(row.as_ref().map(account_from_row))
    }

    fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY account_id");
        let rows = self
            .client
            .borrow_mut()
            .query(&query, &[])
            .map_err(query_err)?;
        Ok(rows.iter().map(account_from_row).collect())
    }

    fn update_account(
        &self,
        account_id: &str,
        update: &AccountUpdate,
    ) -> Result<(), LedgerError> {
        let affected = self
            .client
            .borrow_mut()
            .execute(
                ACCOUNT_UPDATE_SQL,
                &[
                    &account_id,
                    &update.cash_balance,
                    &update.margin_requirement,
                    &update.margin_used,
                    &Utc::now(),
                ],
            )
            .map_err(query_err)?;
        if affected == 0 {
            return Err(LedgerError::AccountNotFound {
                account_id: account_id.to_string(),
            });
        }
        Ok(())
    }

    fn insert_trade(&self, trade: &NewTrade) -> Result<i64, LedgerError> {
        let row = self
            .client
            .borrow_mut()
            .query_one(
                TRADE_INSERT_SQL,
                &[
                    &trade.account_id,
                    &trade.symbol,
                    &trade.timestamp,
                    &trade.side,
                    &trade.quantity,
                    &trade.price,
                    &trade.fee,
                    &trade.realized_pnl,
                    &trade.strategy,
                ],
            )
            .map_err(query_err)?;
        Ok(row.get(0))
    }

    fn fetch_trades(&self, account_id: &str) -> Result<Vec<Trade>, LedgerError> {
        let rows = self
            .client
            .borrow_mut()
            .query(
                "SELECT trade_id, account_id, symbol, timestamp, side, quantity, \
                        price, fee, realized_pnl, strategy \
                 FROM trades WHERE account_id = $1 \
                 ORDER BY timestamp ASC, trade_id ASC",
                &[&account_id],
            )
            .map_err(query_err)?;

        Ok(rows
            .into_iter()
            .map(|row| Trade {
                trade_id: row.get(0),
                account_id: row.get(1),
                symbol: row.get(2),
                timestamp: row.get(3),
                side: row.get(4),
                quantity: row.get(5),
                price: row.get(6),
                fee: row.get(7),
                realized_pnl: row.get(8),
                strategy: row.get(9),
            })
            .collect())
    }

    fn record_trade(
        &self,
        trade: &NewTrade,
        update: &AccountUpdate,
    ) -> Result<i64, LedgerError> {
        let mut client = self.client.borrow_mut();
        let mut tx = client.transaction().map_err(query_err)?;

        let row = tx
            .query_one(
                TRADE_INSERT_SQL,
                &[
                    &trade.account_id,
                    &trade.symbol,
                    &trade.timestamp,
                    &trade.side,
                    &trade.quantity,
                    &trade.price,
                    &trade.fee,
                    &trade.realized_pnl,
                    &trade.strategy,
                ],
            )
            .map_err(query_err)?;
        let trade_id: i64 = row.get(0);

        let affected = tx
            .execute(
                ACCOUNT_UPDATE_SQL,
                &[
                    &trade.account_id,
                    &update.cash_balance,
                    &update.margin_requirement,
                    &update.margin_used,
                    &Utc::now(),
                ],
            )
            .map_err(query_err)?;
        if affected == 0 {
            return Err(LedgerError::AccountNotFound {
                account_id: trade.account_id.clone(),
            });
        }

        tx.commit().map_err(query_err)?;
        Ok(trade_id)
    }

    fn insert_position(&self, position: &NewPosition) -> Result<i64, LedgerError> {
        let row = self
            .client
            .borrow_mut()
            .query_one(
                "INSERT INTO positions (account_id, symbol, long_quantity, short_quantity, \
                                        long_cost_basis, short_cost_basis, short_margin_used, \
                                        opened_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 RETURNING position_id",
                &[
                    &position.account_id,
                    &position.symbol,
                    &position.long_quantity,
                    &position.short_quantity,
                    &position.long_cost_basis,
                    &position.short_cost_basis,
                    &position.short_margin_used,
                    &position.opened_at,
                ],
            )
            .map_err(query_err)?;
        Ok(row.get(0))
    }

    fn get_position(&self, position_id: i64) -> Result<Option<Position>, LedgerError> {
        let query = format!("SELECT {POSITION_COLUMNS} FROM positions WHERE position_id = $1");
        let row = self
            .client
            .borrow_mut()
            .query_opt(&query, &[&position_id])
            .map_err(query_err)?;
        Ok(row.as_ref().map(position_from_row))
    }

    fn open_positions(&self, account_id: &str) -> Result<Vec<Position>, LedgerError> {
        let query = format!(
            "SELECT {POSITION_COLUMNS} FROM positions \
             WHERE account_id = $1 AND closed_at IS NULL \
             ORDER BY opened_at ASC, position_id ASC"
        );
        let rows = self
            .client
            .borrow_mut()
            .query(&query, &[&account_id])
            .map_err(query_err)?;
        Ok(rows.iter().map(position_from_row).collect())
    }

    fn update_position(
        &self,
        position_id: i64,
        update: &PositionUpdate,
    ) -> Result<(), LedgerError> {
        let affected = self
            .client
            .borrow_mut()
            .execute(
                "UPDATE positions SET \
                 long_quantity = COALESCE($2, long_quantity), \
                 short_quantity = COALESCE($3, short_quantity), \
                 long_cost_basis = COALESCE($4, long_cost_basis), \
                 short_cost_basis = COALESCE($5, short_cost_basis), \
                 short_margin_used = COALESCE($6, short_margin_used) \
                 WHERE position_id = $1",
                &[
                    &position_id,
                    &update.long_quantity,
                    &update.short_quantity,
                    &update.long_cost_basis,
                    &update.short_cost_basis,
                    &update.short_margin_used,
                ],
            )
            .map_err(query_err)?;
        if affected == 0 {
            return Err(LedgerError::DatabaseQuery {
                reason: format!("no position with id {position_id}"),
            });
        }
        Ok(())
    }

    fn close_position(
        &self,
        position_id: i64,
        closed_at: DateTime<Utc>,
    ) -> Result<(), LedgerError> {
        let affected = self
            .client
            .borrow_mut()
            .execute(
                "UPDATE positions SET closed_at = $2 WHERE position_id = $1",
                &[&position_id, &closed_at],
            )
            .map_err(query_err)?;
        if affected == 0 {
            return Err(LedgerError::DatabaseQuery {
                reason: format!("no position with id {position_id}"),
            });
        }
        Ok(())
    }

    fn insert_price_data(&self, bars: &[NewPriceDatum]) -> Result<(), LedgerError> {
        let mut client = self.client.borrow_mut();
        let mut tx = client.transaction().map_err(query_err)?;

        for bar in bars {
            let params: &[&(dyn ToSql + Sync)] = &[
                &bar.symbol,
                &bar.interval,
                &bar.open_time,
                &bar.open,
                &bar.high,
                &bar.low,
                &bar.close,
                &bar.volume,
                &bar.close_time,
                &bar.quote_volume,
                &bar.trade_count,
                &bar.taker_buy_volume,
                &bar.taker_buy_quote_volume,
            ];
            tx.execute(
                "INSERT INTO price_data (symbol, interval, open_time, open, high, low, \
                                         close, volume, close_time, quote_volume, \
                                         trade_count, taker_buy_volume, \
                                         taker_buy_quote_volume) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
                params,
            )
            .map_err(query_err)?;
        }

        tx.commit().map_err(query_err)?;
        info!(bars = bars.len(), "inserted price data batch");
        Ok(())
    }

    fn fetch_price_data(
        &self,
        symbol: &str,
        interval: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PriceDatum>, LedgerError> {
        let rows = self
            .client
            .borrow_mut()
            .query(
                "SELECT id, symbol, interval, open_time, open, high, low, close, \
                        volume, close_time, quote_volume, trade_count, \
                        taker_buy_volume, taker_buy_quote_volume \
                 FROM price_data \
                 WHERE symbol = $1 AND interval = $2 \
                   AND open_time >= $3 AND open_time <= $4 \
                 ORDER BY open_time ASC",
                &[&symbol, &interval, &start, &end],
            )
            .map_err(query_err)?;

        Ok(rows
            .into_iter()
            .map(|row| PriceDatum {
                id: row.get(0),
                symbol: row.get(1),
                interval: row.get(2),
                open_time: row.get(3),
                open: row.get(4),
                high: row.get(5),
                low: row.get(6),
                close: row.get(7),
                volume: row.get(8),
                close_time: row.get(9),
                quote_volume: row.get(10),
                trade_count: row.get(11),
                taker_buy_volume: row.get(12),
                taker_buy_quote_volume: row.get(13),
            })
            .collect())
    }

    fn price_data_range(
        &self,
        symbol: &str,
        interval: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, LedgerError> {
        let row = self
            .client
            .borrow_mut()
            .query_one(
                "SELECT MIN(open_time), MAX(open_time), COUNT(*) \
                 FROM price_data WHERE symbol = $1 AND interval = $2",
                &[&symbol, &interval],
            )
            .map_err(query_err)?;

        let min: Option<DateTime<Utc>> = row.get(0);
        let max: Option<DateTime<Utc>> = row.get(1);
        let count: i64 = row.get(2);

        match (min, max) {
            (Some(min), Some(max)) if count > 0 => Ok(Some((min, max, count as usize))),
            _ => Ok(None),
        }
    }

    fn list_symbols(&self, interval: &str) -> Result<Vec<String>, LedgerError> {
        let rows = self
            .client
            .borrow_mut()
            .query(
                "SELECT DISTINCT symbol FROM price_data WHERE interval = $1 ORDER BY symbol",
                &[&interval],
            )
            .map_err(query_err)?;
        Ok(rows.into_iter().map(|row| row.get(0)).collect())
    }

    fn insert_signal(&self, signal: &NewStrategySignal) -> Result<i64, LedgerError> {
        let row = self
            .client
            .borrow_mut()
            .query_one(
                "INSERT INTO strategy_signals (symbol, interval, timestamp, strategy_name, \
                                               signal, confidence, metrics) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) \
                 RETURNING signal_id",
                &[
                    &signal.symbol,
                    &signal.interval,
                    &signal.timestamp,
                    &signal.strategy_name,
                    &signal.signal,
                    &signal.confidence,
                    &signal.metrics,
                ],
            )
            .map_err(query_err)?;
        Ok(row.get(0))
    }

    fn fetch_signals(
        &self,
        symbol: &str,
        interval: &str,
        strategy_name: Option<&str>,
    ) -> Result<Vec<StrategySignal>, LedgerError> {
        let rows = self
            .client
            .borrow_mut()
            .query(
                "SELECT signal_id, symbol, interval, timestamp, strategy_name, \
                        signal, confidence, metrics \
                 FROM strategy_signals \
                 WHERE symbol = $1 AND interval = $2 \
                   AND ($3::text IS NULL OR strategy_name = $3) \
                 ORDER BY timestamp ASC, signal_id ASC",
                &[&symbol, &interval, &strategy_name],
            )
            .map_err(query_err)?;

        Ok(rows
            .into_iter()
            .map(|row| StrategySignal {
                signal_id: row.get(0),
                symbol: row.get(1),
                interval: row.get(2),
                timestamp: row.get(3),
                strategy_name: row.get(4),
                signal: row.get(5),
                confidence: row.get(6),
                metrics: row.get(7),
            })
            .collect())
    }

    fn insert_portfolio_record(
        &self,
        record: &NewPortfolioHistoryRecord,
    ) -> Result<i64, LedgerError> {
        let row = self
            .client
            .borrow_mut()
            .query_one(
                "INSERT INTO portfolio_history (account_id, timestamp, portfolio_value, \
                                                long_exposure, short_exposure, gross_exposure, \
                                                net_exposure, long_short_ratio) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
                 RETURNING record_id",
                &[
                    &record.account_id,
                    &record.timestamp,
                    &record.portfolio_value,
                    &record.long_exposure,
                    &record.short_exposure,
                    &record.gross_exposure,
                    &record.net_exposure,
                    &record.long_short_ratio,
                ],
            )
            .map_err(query_err)?;
        Ok(row.get(0))
    }

    fn portfolio_history(
        &self,
        account_id: &str,
    ) -> Result<Vec<PortfolioHistoryRecord>, LedgerError> {
        let rows = self
            .client
            .borrow_mut()
            .query(
                "SELECT record_id, account_id, timestamp, portfolio_value, long_exposure, \
                        short_exposure, gross_exposure, net_exposure, long_short_ratio \
                 FROM portfolio_history WHERE account_id = $1 \
                 ORDER BY timestamp ASC, record_id ASC",
                &[&account_id],
            )
            .map_err(query_err)?;

        Ok(rows
            .into_iter()
            .map(|row| PortfolioHistoryRecord {
                record_id: row.get(0),
                account_id: row.get(1),
                timestamp: row.get(2),
                portfolio_value: row.get(3),
                long_exposure: row.get(4),
                short_exposure: row.get(5),
                gross_exposure: row.get(6),
                net_exposure: row.get(7),
                long_short_ratio: row.get(8),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EmptyConfig;

    impl ConfigPort for EmptyConfig {
        fn get_string(&self, _section: &str, _key: &str) -> Option<String> {
            None
        }
        fn get_int(&self, _section: &str, _key: &str, default: i64) -> i64 {
            default
        }
        fn get_double(&self, _section: &str, _key: &str, default: f64) -> f64 {
            default
        }
        fn get_bool(&self, _section: &str, _key: &str, default: bool) -> bool {
            default
        }
    }

    #[test]
    fn from_config_missing_connection_string() {
        let config = EmptyConfig;
        let result = PostgresAdapter::from_config(&config);
        match result {
            Err(LedgerError::ConfigMissing { section, key }) => {
                assert_eq!(section, "postgres");
                assert_eq!(key, "connection_string");
            }
            Err(other) => panic!("expected ConfigMissing, got: {other}"),
            Ok(_) => panic!("expected error, got Ok"),
        }
    }

    #[test]
    fn create_sql_includes_foreign_key() {
        let trades = TABLES.iter().find(|t| t.name == "trades").unwrap();
        let sql = trades.create_sql();
        assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS trades"));
        assert!(sql.contains("FOREIGN KEY (account_id) REFERENCES accounts(account_id)"));
    }
}
