//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::error::LedgerError;
use crate::ports::store_port::StorePort;

#[derive(Parser, Debug)]
#[command(name = "tradeledger", about = "Trading ledger database tool")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create or evolve the database schema
    Init {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List accounts with balances and margin state
    Accounts {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Show price-data coverage for one symbol or all symbols at an interval
    Info {
        #[arg(long)]
        symbol: Option<String>,
        #[arg(long, default_value = "1h")]
        interval: String,
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Import OHLCV bars from a CSV file into price_data
    Import {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        symbol: String,
        #[arg(long, default_value = "1h")]
        interval: String,
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Init { config } => run_init(&config),
        Command::Accounts { config } => run_accounts(&config),
        Command::Info {
            symbol,
            interval,
            config,
        } => run_info(&config, symbol.as_deref(), &interval),
        Command::Import {
            file,
            symbol,
            interval,
            config,
        } => run_import(&config, &file, &symbol, &interval),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(&err)
        }
    }
}

fn load_config(path: &Path) -> Result<FileConfigAdapter, LedgerError> {
    FileConfigAdapter::from_file(path).map_err(|e| LedgerError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Pick a store from the config file, preferring SQLite when both backends
/// are configured. The schema is ensured on every open, like the original
/// bootstrap did on connect.
fn open_store(config: &FileConfigAdapter) -> Result<Box<dyn StorePort>, LedgerError> {
    use crate::ports::config_port::ConfigPort;

    #[cfg(feature = "sqlite")]
    if config.get_string("sqlite", "path").is_some() {
        let store = crate::adapters::sqlite_adapter::SqliteAdapter::from_config(config)?;
        store.ensure_schema()?;
        return Ok(Box::new(store));
    }

    #[cfg(feature = "postgres")]
    if config.get_string("postgres", "connection_string").is_some() {
        let store = crate::adapters::postgres_adapter::PostgresAdapter::from_config(config)?;
        store.ensure_schema()?;
        return Ok(Box::new(store));
    }

    Err(LedgerError::ConfigMissing {
        section: "sqlite".into(),
        key: "path".into(),
    })
}

fn run_init(config_path: &Path) -> Result<(), LedgerError> {
    let config = load_config(config_path)?;
    let _store = open_store(&config)?;
    println!("Database check complete.");
    Ok(())
}

fn run_accounts(config_path: &Path) -> Result<(), LedgerError> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    let accounts = store.list_accounts()?;
    if accounts.is_empty() {
        println!("No accounts.");
        return Ok(());
    }

    for account in accounts {
        println!(
            "{}  owner={}  cash={:.2}  margin_req={:.2}  margin_used={:.2}{}",
            account.account_id,
            account.owner,
            account.cash_balance,
            account.margin_requirement,
            account.margin_used,
            if account.within_margin() {
                ""
            } else {
                "  [over margin]"
            }
        );
    }
    Ok(())
}

fn run_info(
    config_path: &Path,
    symbol: Option<&str>,
    interval: &str,
) -> Result<(), LedgerError> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    let symbols = match symbol {
        Some(s) => vec![s.to_string()],
        None => store.list_symbols(interval)?,
    };

    if symbols.is_empty() {
        println!("No price data at interval {interval}.");
        return Ok(());
    }

    for sym in symbols {
        match store.price_data_range(&sym, interval)? {
            Some((min, max, count)) => {
                println!("{sym} [{interval}]: {count} bars from {min} to {max}");
            }
            None => {
                return Err(LedgerError::NoData {
                    symbol: sym,
                    interval: interval.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn run_import(
    config_path: &Path,
    file: &Path,
    symbol: &str,
    interval: &str,
) -> Result<(), LedgerError> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    let bars = CsvAdapter::new(file).load_bars(symbol, interval)?;
    if bars.is_empty() {
        println!("Nothing to import from {}.", file.display());
        return Ok(());
    }

    store.insert_price_data(&bars)?;
    println!(
        "Imported {} bars for {symbol} [{interval}] from {}.",
        bars.len(),
        file.display()
    );
    Ok(())
}
