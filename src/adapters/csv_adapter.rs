//! CSV candle cache adapter.
//!
//! Reads `<base_path>/<SYMBOL>_<timeframe>.csv` where any `/` in the symbol is
//! replaced by `_` (so `BTC/USDT` at `1h` is `BTC_USDT_1h.csv`). Columns:
//! `datetime,open,high,low,close,volume`.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::{Candle, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn csv_path(&self, symbol: &str, timeframe: &str) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", symbol.replace('/', "_"), timeframe))
    }
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`, `YYYY-MM-DD` or epoch milliseconds.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if let Ok(ms) = value.parse::<i64>() {
        return DateTime::from_timestamp_millis(ms).map(|dt| dt.naive_utc());
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn parse_price(record: &csv::StringRecord, idx: usize, name: &str) -> Result<f64, SigtraderError> {
    record
        .get(idx)
        .ok_or_else(|| SigtraderError::InvalidData {
            reason: format!("missing {} column", name),
        })?
        .trim()
        .parse()
        .map_err(|e| SigtraderError::InvalidData {
            reason: format!("invalid {} value: {}", name, e),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_candles(&self, symbol: &str, timeframe: &str) -> Result<PriceSeries, SigtraderError> {
        let path = self.csv_path(symbol, timeframe);
        if !path.exists() {
            return Err(SigtraderError::NoData {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            });
        }
        let content = fs::read_to_string(&path)?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let mut candles = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| SigtraderError::InvalidData {
                reason: format!("CSV parse error: {}", e),
            })?;

            let ts_str = record.get(0).ok_or_else(|| SigtraderError::InvalidData {
                reason: "missing datetime column".into(),
            })?;
            let timestamp = parse_timestamp(ts_str).ok_or_else(|| SigtraderError::InvalidData {
                reason: format!("invalid datetime '{}'", ts_str),
            })?;

            candles.push(Candle {
                timestamp,
                open: parse_price(&record, 1, "open")?,
                high: parse_price(&record, 2, "high")?,
                low: parse_price(&record, 3, "low")?,
                close: parse_price(&record, 4, "close")?,
                volume: parse_price(&record, 5, "volume")?,
            });
        }

        candles.sort_by_key(|c| c.timestamp);
        log::info!(
            "loaded {} candles from {}",
            candles.len(),
            path.display()
        );
        PriceSeries::new(candles)
    }

    fn list_symbols(&self, timeframe: &str) -> Result<Vec<String>, SigtraderError> {
        let suffix = format!("_{}.csv", timeframe);
        let mut symbols = Vec::new();

        for entry in fs::read_dir(&self.base_path)? {
            let name = entry?.file_name();
            let name_str = name.to_string_lossy();

            if let Some(symbol) = name_str.strip_suffix(&suffix) {
                symbols.push(symbol.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }
}
