#![allow(dead_code)]

use chrono::{Duration, NaiveDate, NaiveDateTime};
use sigtrader::domain::backtest::BacktestConfig;
use sigtrader::domain::error::SigtraderError;
pub use sigtrader::domain::ohlcv::{Candle, PriceSeries};
use sigtrader::domain::signal::Signal;
use sigtrader::ports::data_port::DataPort;
use std::collections::HashMap;
use std::path::Path;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Candle>>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_candles(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.data.insert(symbol.to_string(), candles);
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_candles(&self, symbol: &str, timeframe: &str) -> Result<PriceSeries, SigtraderError> {
        match self.data.get(symbol) {
            Some(candles) => PriceSeries::new(candles.clone()),
            None => Err(SigtraderError::NoData {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            }),
        }
    }

    fn list_symbols(&self, _timeframe: &str) -> Result<Vec<String>, SigtraderError> {
        let mut symbols: Vec<String> = self.data.keys().cloned().collect();
        symbols.sort();
        Ok(symbols)
    }
}

pub fn start_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Hourly candles starting at 2024-01-01 00:00.
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Candle {
            timestamp: start_time() + Duration::hours(i as i64),
            open: close - 0.5,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 100.0,
        })
        .collect()
}

pub fn make_series(closes: &[f64]) -> PriceSeries {
    PriceSeries::new(make_candles(closes)).unwrap()
}

/// A deterministic oscillating walk long enough to pass every default warm-up.
pub fn wavy_closes(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            100.0 + 8.0 * (t / 6.0).sin() + 3.0 * (t / 2.3).cos() + t * 0.05
        })
        .collect()
}

pub fn signals(values: &[i8]) -> Vec<Signal> {
    values
        .iter()
        .map(|&v| Signal::try_from(v).unwrap())
        .collect()
}

pub fn sample_config() -> BacktestConfig {
    BacktestConfig {
        initial_balance: 1_000_000.0,
        trade_fee: 0.001,
    }
}

/// Writes candles in the cache format read by `CsvAdapter`.
pub fn write_cache_csv(dir: &Path, file_name: &str, candles: &[Candle]) {
    let mut content = String::from("datetime,open,high,low,close,volume\n");
    for c in candles {
        content.push_str(&format!(
            "{},{},{},{},{},{}\n",
            c.timestamp.format("%Y-%m-%d %H:%M:%S"),
            c.open,
            c.high,
            c.low,
            c.close,
            c.volume
        ));
    }
    std::fs::write(dir.join(file_name), content).unwrap();
}
