//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Default parameters: fast=12, slow=26, signal=9. Requires fast < slow.
//! Every EMA is seeded with its first input, so all lines are defined from period 0.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::ema::ema_values;
use crate::domain::indicator::{require_positive, MacdSeries};

pub const DEFAULT_FAST: usize = 12;
pub const DEFAULT_SLOW: usize = 26;
pub const DEFAULT_SIGNAL: usize = 9;

pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal_period: usize,
) -> Result<MacdSeries, SigtraderError> {
    require_positive("macd_fast", fast)?;
    require_positive("macd_slow", slow)?;
    require_positive("macd_signal", signal_period)?;
    if fast >= slow {
        return Err(SigtraderError::invalid_parameter(
            "macd_fast",
            format!("fast period {} must be less than slow period {}", fast, slow),
        ));
    }

    let ema_fast = ema_values(closes, fast);
    let ema_slow = ema_values(closes, slow);

    let line: Vec<f64> = ema_fast
        .iter()
        .zip(ema_slow.iter())
        .map(|(f, s)| f - s)
        .collect();
    let signal = ema_values(&line, signal_period);
    let histogram = line
        .iter()
        .zip(signal.iter())
        .map(|(l, s)| Some(l - s))
        .collect();

    Ok(MacdSeries {
        line: line.into_iter().map(Some).collect(),
        signal: signal.into_iter().map(Some).collect(),
        histogram,
    })
}

pub fn calculate_macd_default(closes: &[f64]) -> Result<MacdSeries, SigtraderError> {
    calculate_macd(closes, DEFAULT_FAST, DEFAULT_SLOW, DEFAULT_SIGNAL)
}
