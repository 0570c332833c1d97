//! SQLite store adapter. Timestamps are stored as RFC 3339 text in UTC.

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
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use tracing::info;

/// Declarative table shape, used both to create tables and to evolve
/// existing ones by adding columns that are missing.
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
            ("created_at", "TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP"),
            ("cash_balance", "REAL NOT NULL DEFAULT 0"),
            ("margin_requirement", "REAL NOT NULL DEFAULT 0"),
            ("margin_used", "REAL NOT NULL DEFAULT 0"),
            ("last_update", "TEXT"),
        ],
        constraints: &[],
    },
    TableSpec {
        name: "trades",
        columns: &[
            ("trade_id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
            ("account_id", "TEXT NOT NULL"),
            ("symbol", "TEXT NOT NULL"),
            ("timestamp", "TEXT NOT NULL"),
            ("side", "TEXT NOT NULL"),
            ("quantity", "REAL NOT NULL"),
            ("price", "REAL NOT NULL"),
            ("fee", "REAL NOT NULL DEFAULT 0"),
            ("realized_pnl", "REAL NOT NULL DEFAULT 0"),
            ("strategy", "TEXT"),
        ],
        constraints: &["FOREIGN KEY (account_id) REFERENCES accounts(account_id)"],
    },
    TableSpec {
        name: "positions",
        columns: &[
            ("position_id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
            ("account_id", "TEXT NOT NULL"),
            ("symbol", "TEXT NOT NULL"),
            ("long_quantity", "REAL NOT NULL DEFAULT 0"),
            ("short_quantity", "REAL NOT NULL DEFAULT 0"),
            ("long_cost_basis", "REAL NOT NULL DEFAULT 0"),
            ("short_cost_basis", "REAL NOT NULL DEFAULT 0"),
            ("short_margin_used", "REAL NOT NULL DEFAULT 0"),
            ("opened_at", "TEXT NOT NULL"),
            ("closed_at", "TEXT"),
        ],
        constraints: &["FOREIGN KEY (account_id) REFERENCES accounts(account_id)"],
    },
    TableSpec {
        // No uniqueness on (symbol, interval, open_time): re-ingesting a
        // range duplicates rows, matching the upstream schema.
        name: "price_data",
        columns: &[
            ("id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
            ("symbol", "TEXT NOT NULL"),
            ("interval", "TEXT NOT NULL"),
            ("open_time", "TEXT NOT NULL"),
            ("open", "REAL NOT NULL"),
            ("high", "REAL NOT NULL"),
            ("low", "REAL NOT NULL"),
            ("close", "REAL NOT NULL"),
            ("volume", "REAL NOT NULL"),
            ("close_time", "TEXT NOT NULL"),
            ("quote_volume", "REAL"),
            ("trade_count", "INTEGER"),
            ("taker_buy_volume", "REAL"),
            ("taker_buy_quote_volume", "REAL"),
        ],
        constraints: &[],
    },
    TableSpec {
        name: "strategy_signals",
        columns: &[
            ("signal_id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
            ("symbol", "TEXT NOT NULL"),
            ("interval", "TEXT NOT NULL"),
            ("timestamp", "TEXT NOT NULL"),
            ("strategy_name", "TEXT NOT NULL"),
            ("signal", "TEXT NOT NULL"),
            ("confidence", "REAL"),
            ("metrics", "TEXT"),
        ],
        constraints: &[],
    },
    TableSpec {
        name: "portfolio_history",
        columns: &[
            ("record_id", "INTEGER PRIMARY KEY AUTOINCREMENT"),
            ("account_id", "TEXT NOT NULL"),
            ("timestamp", "TEXT NOT NULL"),
            ("portfolio_value", "REAL NOT NULL"),
            ("long_exposure", "REAL"),
            ("short_exposure", "REAL"),
            ("gross_exposure", "REAL"),
            ("net_exposure", "REAL"),
            ("long_short_ratio", "REAL"),
        ],
        constraints: &["FOREIGN KEY (account_id) REFERENCES accounts(account_id)"],
    },
];

// Fixed-width RFC 3339 so text comparison matches chronological order.
fn to_ts(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Micros, true)
}

fn parse_ts(raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                raw.len(),
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

pub struct SqliteAdapter {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteAdapter {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, LedgerError> {
        let db_path =
            config
                .get_string("sqlite", "path")
                .ok_or_else(|| LedgerError::ConfigMissing {
                    section: "sqlite".into(),
                    key: "path".into(),
                })?;

        let pool_size = config.get_int("sqlite", "pool_size", 4) as u32;

        let manager = SqliteConnectionManager::file(&db_path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder()
            .max_size(pool_size)
            .build(manager)
            .map_err(|e: r2d2::Error| LedgerError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    pub fn in_memory() -> Result<Self, LedgerError> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e: r2d2::Error| LedgerError::Database {
                reason: e.to_string(),
            })?;

        Ok(Self { pool })
    }

    fn conn(
        &self,
    ) -> Result<r2d2::PooledConnection<SqliteConnectionManager>, LedgerError> {
        self.pool
            .get()
            .map_err(|e: r2d2::Error| LedgerError::Database {
                reason: e.to_string(),
            })
    }

    /// Create any table that does not exist, then add any column the live
    /// table is missing relative to [`TABLES`].
    fn bootstrap_schema(&self) -> Result<(), LedgerError> {
        let conn = self.conn()?;

        for spec in TABLES {
            let exists: bool = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    params![spec.name],
                    |row| row.get::<_, i64>(0),
                )
                .map(|n| n > 0)
                .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

            if !exists {
                info!(table = spec.name, "creating table");
                conn.execute(&spec.create_sql(), [])
                    .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                        reason: e.to_string(),
                    })?;
                continue;
            }

            let mut stmt = conn
                .prepare(&format!("PRAGMA table_info({})", spec.name))
                .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                    reason: e.to_string(),
                })?;
            let existing: Vec<String> = stmt
                .query_map([], |row| row.get::<_, String>(1))
                .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                    reason: e.to_string(),
                })?
                .collect::<Result<_, _>>()
                .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                    reason: e.to_string(),
                })?;

            for (name, ddl) in spec.columns {
                if existing.iter().any(|c| c == name) {
                    continue;
                }
                info!(table = spec.name, column = name, "adding missing column");
                conn.execute(
                    &format!("ALTER TABLE {} ADD COLUMN {} {}", spec.name, name, ddl),
                    [],
                )
                .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                    reason: e.to_string(),
                })?;
            }
        }

        Ok(())
    }
}

fn account_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Account> {
    let created_raw: String = row.get(2)?;
    let last_update_raw: Option<String> = row.get(6)?;
    Ok(Account {
        account_id: row.get(0)?,
        owner: row.get(1)?,
        created_at: parse_ts(&created_raw)?,
        cash_balance: row.get(3)?,
        margin_requirement: row.get(4)?,
        margin_used: row.get(5)?,
        last_update: last_update_raw.as_deref().map(parse_ts).transpose()?,
    })
}

fn position_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Position> {
    let opened_raw: String = row.get(8)?;
    let closed_raw: Option<String> = row.get(9)?;
    Ok(Position {
        position_id: row.get(0)?,
        account_id: row.get(1)?,
        symbol: row.get(2)?,
        long_quantity: row.get(3)?,
        short_quantity: row.get(4)?,
        long_cost_basis: row.get(5)?,
        short_cost_basis: row.get(6)?,
        short_margin_used: row.get(7)?,
        opened_at: parse_ts(&opened_raw)?,
        closed_at: closed_raw.as_deref().map(parse_ts).transpose()?,
    })
}

const ACCOUNT_COLUMNS: &str = "account_id, owner, created_at, cash_balance, \
                               margin_requirement, margin_used, last_update";

const POSITION_COLUMNS: &str = "position_id, account_id, symbol, long_quantity, \
                                short_quantity, long_cost_basis, short_cost_basis, \
                                short_margin_used, opened_at, closed_at";

const ACCOUNT_UPDATE_SQL: &str =
    "UPDATE accounts SET cash_balance = COALESCE(?2, cash_balance), \
     margin_requirement = COALESCE(?3, margin_requirement), \
     margin_used = COALESCE(?4, margin_used), \
     last_update = ?5 \
     WHERE account_id = ?1";

impl StorePort for SqliteAdapter {
    fn ensure_schema(&self) -> Result<(), LedgerError> {
        self.bootstrap_schema()
    }

    fn insert_account(&self, account: &NewAccount) -> Result<(), LedgerError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO accounts (account_id, owner, created_at, cash_balance, \
                                   margin_requirement, margin_used) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                account.account_id,
                account.owner,
                to_ts(&Utc::now()),
                account.cash_balance,
                account.margin_requirement,
                account.margin_used,
            ],
        )
        .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
            reason: e.to_string(),
        })?;
        Ok(())
    }

    fn get_account(&self, account_id: &str) -> Result<Option<Account>, LedgerError> {
        let conn = self.conn()?;
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = ?1");
        conn.query_row(&query, params![account_id], account_from_row)
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(LedgerError::DatabaseQuery {
                    reason: other.to_string(),
                }),
            })
    }

    fn list_accounts(&self) -> Result<Vec<Account>, LedgerError> {
        let conn = self.conn()?;
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM accounts ORDER BY account_id");
        let mut stmt =
            conn.prepare(&query)
                .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                    reason: e.to_string(),
                })?;
        let rows = stmt
            .query_map([], account_from_row)
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut accounts = Vec::new();
        for row in rows {
            accounts.push(row.map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?);
        }
        Ok(accounts)
    }

    fn update_account(
        &self,
        account_id: &str,
        update: &AccountUpdate,
    ) -> Result<(), LedgerError> {
        let conn = self.conn()?;
        let affected = conn
            .execute(
                ACCOUNT_UPDATE_SQL,
                params![
                    account_id,
                    update.cash_balance,
                    update.margin_requirement,
                    update.margin_used,
                    to_ts(&Utc::now()),
                ],
            )
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        if affected == 0 {
            return Err(LedgerError::AccountNotFound {
                account_id: account_id.to_string(),
            });
        }
        Ok(())
    }

    fn insert_trade(&self, trade: &NewTrade) -> Result<i64, LedgerError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO trades (account_id, symbol, timestamp, side, quantity, \
                                 price, fee, realized_pnl, strategy) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                trade.account_id,
                trade.symbol,
                to_ts(&trade.timestamp),
                trade.side,
                trade.quantity,
                trade.price,
                trade.fee,
                trade.realized_pnl,
                trade.strategy,
            ],
        )
        .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
            reason: e.to_string(),
        })?;
        Ok(conn.last_insert_rowid())
    }

    fn fetch_trades(&self, account_id: &str) -> Result<Vec<Trade>, LedgerError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT trade_id, account_id, symbol, timestamp, side, quantity, \
                        price, fee, realized_pnl, strategy \
                 FROM trades WHERE account_id = ?1 \
                 ORDER BY timestamp ASC, trade_id ASC",
            )
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        let rows = stmt
            .query_map(params![account_id], |row| {
                let ts_raw: String = row.get(3)?;
                Ok(Trade {
                    trade_id: row.get(0)?,
                    account_id: row.get(1)?,
                    symbol: row.get(2)?,
                    timestamp: parse_ts(&ts_raw)?,
                    side: row.get(4)?,
                    quantity: row.get(5)?,
                    price: row.get(6)?,
                    fee: row.get(7)?,
                    realized_pnl: row.get(8)?,
                    strategy: row.get(9)?,
                })
            })
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut trades = Vec::new();
        for row in rows {
            trades.push(row.map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?);
        }
        Ok(trades)
    }

    fn record_trade(
        &self,
        trade: &NewTrade,
        update: &AccountUpdate,
    ) -> Result<i64, LedgerError> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        tx.execute(
            "INSERT INTO trades (account_id, symbol, timestamp, side, quantity, \
                                 price, fee, realized_pnl, strategy) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                trade.account_id,
                trade.symbol,
                to_ts(&trade.timestamp),
                trade.side,
                trade.quantity,
                trade.price,
                trade.fee,
                trade.realized_pnl,
                trade.strategy,
            ],
        )
        .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
            reason: e.to_string(),
        })?;
        let trade_id = tx.last_insert_rowid();

        let affected = tx
            .execute(
                ACCOUNT_UPDATE_SQL,
                params![
                    trade.account_id,
                    update.cash_balance,
                    update.margin_requirement,
                    update.margin_used,
                    to_ts(&Utc::now()),
                ],
            )
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        if affected == 0 {
            // Rolls back the trade insert when the transaction drops.
            return Err(LedgerError::AccountNotFound {
                account_id: trade.account_id.clone(),
            });
        }

        tx.commit()
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        Ok(trade_id)
    }

    fn insert_position(&self, position: &NewPosition) -> Result<i64, LedgerError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO positions (account_id, symbol, long_quantity, short_quantity, \
                                    long_cost_basis, short_cost_basis, short_margin_used, \
                                    opened_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                position.account_id,
                position.symbol,
                position.long_quantity,
                position.short_quantity,
                position.long_cost_basis,
                position.short_cost_basis,
                position.short_margin_used,
                to_ts(&position.opened_at),
            ],
        )
        .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
            reason: e.to_string(),
        })?;
        Ok(conn.last_insert_rowid())
    }

    fn get_position(&self, position_id: i64) -> Result<Option<Position>, LedgerError> {
        let conn = self.conn()?;
        let query = format!("SELECT {POSITION_COLUMNS} FROM positions WHERE position_id = ?1");
        conn.query_row(&query, params![position_id], position_from_row)
            .map(Some)
            .or_else(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => Ok(None),
                other => Err(LedgerError::DatabaseQuery {
                    reason: other.to_string(),
                }),
            })
    }

    fn open_positions(&self, account_id: &str) -> Result<Vec<Position>, LedgerError> {
        let conn = self.conn()?;
        let query = format!(
            "SELECT {POSITION_COLUMNS} FROM positions \
             WHERE account_id = ?1 AND closed_at IS NULL \
             ORDER BY opened_at ASC, position_id ASC"
        );
        let mut stmt =
            conn.prepare(&query)
                .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                    reason: e.to_string(),
                })?;
        let rows = stmt
            .query_map(params![account_id], position_from_row)
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut positions = Vec::new();
        for row in rows {
            positions.push(row.map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?);
        }
        Ok(positions)
    }

    fn update_position(
        &self,
        position_id: i64,
        update: &PositionUpdate,
    ) -> Result<(), LedgerError> {
        let conn = self.conn()?;
        let affected = conn
            .execute(
                "UPDATE positions SET \
                 long_quantity = COALESCE(?2, long_quantity), \
                 short_quantity = COALESCE(?3, short_quantity), \
                 long_cost_basis = COALESCE(?4, long_cost_basis), \
                 short_cost_basis = COALESCE(?5, short_cost_basis), \
                 short_margin_used = COALESCE(?6, short_margin_used) \
                 WHERE position_id = ?1",
                params![
                    position_id,
                    update.long_quantity,
                    update.short_quantity,
                    update.long_cost_basis,
                    update.short_cost_basis,
                    update.short_margin_used,
                ],
            )
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;
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
        let conn = self.conn()?;
        let affected = conn
            .execute(
                "UPDATE positions SET closed_at = ?2 WHERE position_id = ?1",
                params![position_id, to_ts(&closed_at)],
            )
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        if affected == 0 {
            return Err(LedgerError::DatabaseQuery {
                reason: format!("no position with id {position_id}"),
            });
        }
        Ok(())
    }

    fn insert_price_data(&self, bars: &[NewPriceDatum]) -> Result<(), LedgerError> {
        let mut conn = self.conn()?;
        let tx = conn
            .transaction()
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        for bar in bars {
            tx.execute(
                "INSERT INTO price_data (symbol, interval, open_time, open, high, low, \
                                         close, volume, close_time, quote_volume, \
                                         trade_count, taker_buy_volume, \
                                         taker_buy_quote_volume) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    bar.symbol,
                    bar.interval,
                    to_ts(&bar.open_time),
                    bar.open,
                    bar.high,
                    bar.low,
                    bar.close,
                    bar.volume,
                    to_ts(&bar.close_time),
                    bar.quote_volume,
                    bar.trade_count,
                    bar.taker_buy_volume,
                    bar.taker_buy_quote_volume,
                ],
            )
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        }

        tx.commit()
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;

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
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, symbol, interval, open_time, open, high, low, close, \
                        volume, close_time, quote_volume, trade_count, \
                        taker_buy_volume, taker_buy_quote_volume \
                 FROM price_data \
                 WHERE symbol = ?1 AND interval = ?2 \
                   AND open_time >= ?3 AND open_time <= ?4 \
                 ORDER BY open_time ASC",
            )
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        let rows = stmt
            .query_map(
                params![symbol, interval, to_ts(&start), to_ts(&end)],
                |row| {
                    let open_raw: String = row.get(3)?;
                    let close_raw: String = row.get(9)?;
                    Ok(PriceDatum {
                        id: row.get(0)?,
                        symbol: row.get(1)?,
                        interval: row.get(2)?,
                        open_time: parse_ts(&open_raw)?,
                        open: row.get(4)?,
                        high: row.get(5)?,
                        low: row.get(6)?,
                        close: row.get(7)?,
                        volume: row.get(8)?,
                        close_time: parse_ts(&close_raw)?,
                        quote_volume: row.get(10)?,
                        trade_count: row.get(11)?,
                        taker_buy_volume: row.get(12)?,
                        taker_buy_quote_volume: row.get(13)?,
                    })
                },
            )
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut bars = Vec::new();
        for row in rows {
            bars.push(row.map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?);
        }
        Ok(bars)
    }

    fn price_data_range(
        &self,
        symbol: &str,
        interval: &str,
    ) -> Result<Option<(DateTime<Utc>, DateTime<Utc>, usize)>, LedgerError> {
        let conn = self.conn()?;
        let query = "SELECT MIN(open_time), MAX(open_time), COUNT(*) \
                     FROM price_data WHERE symbol = ?1 AND interval = ?2";

        let result: (Option<String>, Option<String>, i64) = conn
            .query_row(query, params![symbol, interval], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        match result {
            (Some(min_raw), Some(max_raw), count) if count > 0 => {
                let min = DateTime::parse_from_rfc3339(&min_raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e: chrono::ParseError| LedgerError::Database {
                        reason: e.to_string(),
                    })?;
                let max = DateTime::parse_from_rfc3339(&max_raw)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e: chrono::ParseError| LedgerError::Database {
                        reason: e.to_string(),
                    })?;
                Ok(Some((min, max, count as usize)))
            }
            _ => Ok(None),
        }
    }

    fn list_symbols(&self, interval: &str) -> Result<Vec<String>, LedgerError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT DISTINCT symbol FROM price_data WHERE interval = ?1 ORDER BY symbol",
            )
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        let rows = stmt
            .query_map(params![interval], |row| row.get(0))
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut symbols = Vec::new();
        for row in rows {
            symbols.push(row.map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?);
        }
        Ok(symbols)
    }

    fn insert_signal(&self, signal: &NewStrategySignal) -> Result<i64, LedgerError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO strategy_signals (symbol, interval, timestamp, strategy_name, \
                                           signal, confidence, metrics) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                signal.symbol,
                signal.interval,
                to_ts(&signal.timestamp),
                signal.strategy_name,
                signal.signal,
                signal.confidence,
                signal.metrics,
            ],
        )
        .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
            reason: e.to_string(),
        })?;
        Ok(conn.last_insert_rowid())
    }

    fn fetch_signals(
        &self,
        symbol: &str,
        interval: &str,
        strategy_name: Option<&str>,
    ) -> Result<Vec<StrategySignal>, LedgerError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT signal_id, symbol, interval, timestamp, strategy_name, \
                        signal, confidence, metrics \
                 FROM strategy_signals \
                 WHERE symbol = ?1 AND interval = ?2 \
                   AND (?3 IS NULL OR strategy_name = ?3) \
                 ORDER BY timestamp ASC, signal_id ASC",
            )
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        let rows = stmt
            .query_map(params![symbol, interval, strategy_name], |row| {
                let ts_raw: String = row.get(3)?;
                Ok(StrategySignal {
                    signal_id: row.get(0)?,
                    symbol: row.get(1)?,
                    interval: row.get(2)?,
                    timestamp: parse_ts(&ts_raw)?,
                    strategy_name: row.get(4)?,
                    signal: row.get(5)?,
                    confidence: row.get(6)?,
                    metrics: row.get(7)?,
                })
            })
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut signals = Vec::new();
        for row in rows {
            signals.push(row.map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?);
        }
        Ok(signals)
    }

    fn insert_portfolio_record(
        &self,
        record: &NewPortfolioHistoryRecord,
    ) -> Result<i64, LedgerError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO portfolio_history (account_id, timestamp, portfolio_value, \
                                            long_exposure, short_exposure, gross_exposure, \
                                            net_exposure, long_short_ratio) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                record.account_id,
                to_ts(&record.timestamp),
                record.portfolio_value,
                record.long_exposure,
                record.short_exposure,
                record.gross_exposure,
                record.net_exposure,
                record.long_short_ratio,
            ],
        )
        .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
            reason: e.to_string(),
        })?;
        Ok(conn.last_insert_rowid())
    }

    fn portfolio_history(
        &self,
        account_id: &str,
    ) -> Result<Vec<PortfolioHistoryRecord>, LedgerError> {
        let conn = self.conn()?;
        let mut stmt = conn
            .prepare(
                "SELECT record_id, account_id, timestamp, portfolio_value, long_exposure, \
                        short_exposure, gross_exposure, net_exposure, long_short_ratio \
                 FROM portfolio_history WHERE account_id = ?1 \
                 ORDER BY timestamp ASC, record_id ASC",
            )
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;
        let rows = stmt
            .query_map(params![account_id], |row| {
                let ts_raw: String = row.get(2)?;
                Ok(PortfolioHistoryRecord {
                    record_id: row.get(0)?,
                    account_id: row.get(1)?,
                    timestamp: parse_ts(&ts_raw)?,
                    portfolio_value: row.get(3)?,
                    long_exposure: row.get(4)?,
                    short_exposure: row.get(5)?,
                    gross_exposure: row.get(6)?,
                    net_exposure: row.get(7)?,
                    long_short_ratio: row.get(8)?,
                })
            })
            .map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(|e: rusqlite::Error| LedgerError::DatabaseQuery {
                reason: e.to_string(),
            })?);
        }
        Ok(records)
    }
}
