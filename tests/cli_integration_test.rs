//! CLI integration tests: init, import and info against a temp database.

mod common;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use tradeledger::adapters::file_config_adapter::FileConfigAdapter;
use tradeledger::adapters::sqlite_adapter::SqliteAdapter;
use tradeledger::cli::{run, Cli, Command};
use tradeledger::ports::store_port::StorePort;

fn success(code: ExitCode) -> bool {
    format!("{code:?}") == format!("{:?}", ExitCode::SUCCESS)
}

struct TempSetup {
    _dir: tempfile::TempDir,
    config_path: PathBuf,
    db_path: PathBuf,
}

fn setup() -> TempSetup {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("ledger.db");
    let config_path = dir.path().join("config.ini");
    std::fs::write(
        &config_path,
        format!("[sqlite]\npath = {}\npool_size = 2\n", db_path.display()),
    )
    .unwrap();
    TempSetup {
        _dir: dir,
        config_path,
        db_path,
    }
}

fn open_db(setup: &TempSetup) -> SqliteAdapter {
    let ini = format!("[sqlite]\npath = {}\n", setup.db_path.display());
    let config = FileConfigAdapter::from_string(&ini).unwrap();
    SqliteAdapter::from_config(&config).unwrap()
}

#[test]
fn init_bootstraps_schema() {
    let setup = setup();
    let code = run(Cli {
        command: Command::Init {
            config: setup.config_path.clone(),
        },
    });
    assert!(success(code));

    // The schema exists: inserting through a fresh pool works without
    // another ensure_schema call.
    let store = open_db(&setup);
    assert!(store.list_accounts().unwrap().is_empty());
}

#[test]
fn import_then_info() {
    let setup = setup();
    let csv_path = setup._dir.path().join("klines.csv");
    let mut file = std::fs::File::create(&csv_path).unwrap();
    writeln!(
        file,
        "open_time,open,high,low,close,volume,close_time,quote_volume,trade_count,taker_buy_volume,taker_buy_quote_volume"
    )
    .unwrap();
    writeln!(
        file,
        "1704067200000,100,110,90,105,500,1704070799999,52500,1200,300,31500"
    )
    .unwrap();
    writeln!(
        file,
        "1704070800000,105,115,95,110,600,1704074399999,,,,"
    )
    .unwrap();

    let code = run(Cli {
        command: Command::Import {
            file: csv_path,
            symbol: "BTCUSDT".into(),
            interval: "1h".into(),
            config: setup.config_path.clone(),
        },
    });
    assert!(success(code));

    let store = open_db(&setup);
    let (_, _, count) = store.price_data_range("BTCUSDT", "1h").unwrap().unwrap();
    assert_eq!(count, 2);

    let code = run(Cli {
        command: Command::Info {
            symbol: Some("BTCUSDT".into()),
            interval: "1h".into(),
            config: setup.config_path.clone(),
        },
    });
    assert!(success(code));
}

#[test]
fn info_for_unknown_symbol_fails() {
    let setup = setup();
    run(Cli {
        command: Command::Init {
            config: setup.config_path.clone(),
        },
    });

    let code = run(Cli {
        command: Command::Info {
            symbol: Some("NOPE".into()),
            interval: "1h".into(),
            config: setup.config_path.clone(),
        },
    });
    assert!(!success(code));
}

#[test]
fn missing_config_file_fails() {
    let code = run(Cli {
        command: Command::Init {
            config: PathBuf::from("/nonexistent/config.ini"),
        },
    });
    assert!(!success(code));
}

#[test]
fn accounts_on_empty_database() {
    let setup = setup();
    let code = run(Cli {
        command: Command::Accounts {
            config: setup.config_path.clone(),
        },
    });
    assert!(success(code));
}
