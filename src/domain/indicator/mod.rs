//! Technical indicator implementations.
//!
//! Every indicator is a pure function of a close-price slice and returns
//! columns aligned one-to-one with the input:
//! - `Series`: `None` marks the warm-up region, `Some(v)` a defined value
//! - `MacdSeries` / `BollingerSeries`: multi-line indicators, one `Series` per line
//! - `IndicatorType`: indicator identity + parameters, used for logging and output

pub mod sma;
pub mod ema;
pub mod rsi;
pub mod macd;
pub mod stddev;
pub mod bollinger;

pub use bollinger::calculate_bollinger;
pub use ema::calculate_ema;
pub use macd::calculate_macd;
pub use rsi::calculate_rsi;
pub use sma::calculate_sma;
pub use stddev::calculate_stddev;

use crate::domain::error::SigtraderError;
use std::fmt;

/// One value per period; `None` while the lookback window is incomplete.
pub type Series = Vec<Option<f64>>;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Series,
    pub signal: Series,
    pub histogram: Series,
}

impl MacdSeries {
    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub upper: Series,
    pub middle: Series,
    pub lower: Series,
}

impl BollingerSeries {
    pub fn len(&self) -> usize {
        self.middle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum IndicatorType {
    Sma(usize),
    Ema(usize),
    Rsi(usize),
    Stddev(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        window: usize,
        num_std: f64,
    },
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(window) => write!(f, "SMA({})", window),
            IndicatorType::Ema(window) => write!(f, "EMA({})", window),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Stddev(window) => write!(f, "STDDEV({})", window),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger { window, num_std } => {
                write!(f, "BOLLINGER({},{})", window, num_std)
            }
        }
    }
}

/// Rejects a zero window or period.
pub(crate) fn require_positive(name: &str, value: usize) -> Result<(), SigtraderError> {
    if value == 0 {
        return Err(SigtraderError::invalid_parameter(
            name,
            "must be a positive integer",
        ));
    }
    Ok(())
}
