//! CSV bulk-import adapter for historical OHLCV bars.
//!
//! Expects one header row followed by the kline column order:
//! `open_time, open, high, low, close, volume, close_time, quote_volume,
//! trade_count, taker_buy_volume, taker_buy_quote_volume` with the two time
//! columns as epoch milliseconds. The last four columns may be left empty.

use crate::domain::error::LedgerError;
use crate::domain::price_data::NewPriceDatum;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    path: PathBuf,
}

impl CsvAdapter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn import_err(&self, reason: impl Into<String>) -> LedgerError {
        LedgerError::Import {
            file: self.path.display().to_string(),
            reason: reason.into(),
        }
    }

    fn field<'r>(
        &self,
        record: &'r csv::StringRecord,
        index: usize,
        name: &str,
    ) -> Result<&'r str, LedgerError> {
        record
            .get(index)
            .ok_or_else(|| self.import_err(format!("missing {name} column")))
    }

    fn required_f64(
        &self,
        record: &csv::StringRecord,
        index: usize,
        name: &str,
    ) -> Result<f64, LedgerError> {
        self.field(record, index, name)?
            .trim()
            .parse()
            .map_err(|e| self.import_err(format!("invalid {name} value: {e}")))
    }

    fn optional_f64(
        &self,
        record: &csv::StringRecord,
        index: usize,
        name: &str,
    ) -> Result<Option<f64>, LedgerError> {
        match record.get(index).map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|e| self.import_err(format!("invalid {name} value: {e}"))),
        }
    }

    fn required_millis(
        &self,
        record: &csv::StringRecord,
        index: usize,
        name: &str,
    ) -> Result<DateTime<Utc>, LedgerError> {
        let millis: i64 = self
            .field(record, index, name)?
            .trim()
            .parse()
            .map_err(|e| self.import_err(format!("invalid {name} value: {e}")))?;
        DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| self.import_err(format!("{name} out of range: {millis}")))
    }

    /// Read every row into an insert-ready bar for the given symbol/interval.
    pub fn load_bars(
        &self,
        symbol: &str,
        interval: &str,
    ) -> Result<Vec<NewPriceDatum>, LedgerError> {
        let mut rdr = csv::Reader::from_path(&self.path)
            .map_err(|e| self.import_err(e.to_string()))?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| self.import_err(format!("CSV parse error: {e}")))?;

            let trade_count = match record.get(8).map(str::trim) {
                None | Some("") => None,
                Some(raw) => Some(raw.parse::<i64>().map_err(|e| {
                    self.import_err(format!("invalid trade_count value: {e}"))
                })?),
            };

            bars.push(NewPriceDatum {
                symbol: symbol.to_string(),
                interval: interval.to_string(),
                open_time: self.required_millis(&record, 0, "open_time")?,
                open: self.required_f64(&record, 1, "open")?,
                high: self.required_f64(&record, 2, "high")?,
                low: self.required_f64(&record, 3, "low")?,
                close: self.required_f64(&record, 4, "close")?,
                volume: self.required_f64(&record, 5, "volume")?,
                close_time: self.required_millis(&record, 6, "close_time")?,
                quote_volume: self.optional_f64(&record, 7, "quote_volume")?,
                trade_count,
                taker_buy_volume: self.optional_f64(&record, 9, "taker_buy_volume")?,
                taker_buy_quote_volume: self
                    .optional_f64(&record, 10, "taker_buy_quote_volume")?,
            });
        }

        Ok(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "open_time,open,high,low,close,volume,close_time,\
                          quote_volume,trade_count,taker_buy_volume,taker_buy_quote_volume";

    fn write_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn loads_full_rows() {
        let file = write_csv(&format!(
            "{HEADER}\n1704067200000,100,110,90,105,500,1704070799999,52500,1200,300,31500\n"
        ));
        let adapter = CsvAdapter::new(file.path());

        let bars = adapter.load_bars("BTCUSDT", "1h").unwrap();
        assert_eq!(bars.len(), 1);
        let bar = &bars[0];
        assert_eq!(bar.symbol, "BTCUSDT");
        assert_eq!(bar.interval, "1h");
        assert_eq!(bar.open, 100.0);
        assert_eq!(bar.volume, 500.0);
        assert_eq!(bar.trade_count, Some(1200));
        assert_eq!(bar.taker_buy_quote_volume, Some(31_500.0));
        assert_eq!(bar.open_time.timestamp_millis(), 1_704_067_200_000);
    }

    #[test]
    fn empty_optional_columns_become_none() {
        let file = write_csv(&format!(
            "{HEADER}\n1704067200000,100,110,90,105,500,1704070799999,,,,\n"
        ));
        let adapter = CsvAdapter::new(file.path());

        let bars = adapter.load_bars("BTCUSDT", "1h").unwrap();
        assert_eq!(bars[0].quote_volume, None);
        assert_eq!(bars[0].trade_count, None);
        assert_eq!(bars[0].taker_buy_volume, None);
        assert_eq!(bars[0].taker_buy_quote_volume, None);
    }

    #[test]
    fn rejects_bad_price() {
        let file = write_csv(&format!(
            "{HEADER}\n1704067200000,abc,110,90,105,500,1704070799999,,,,\n"
        ));
        let adapter = CsvAdapter::new(file.path());

        match adapter.load_bars("BTCUSDT", "1h") {
            Err(LedgerError::Import { reason, .. }) => {
                assert!(reason.contains("open"));
            }
            other => panic!("expected Import error, got: {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_import_error() {
        let adapter = CsvAdapter::new("/nonexistent/klines.csv");
        assert!(adapter.load_bars("BTCUSDT", "1h").is_err());
    }
}
