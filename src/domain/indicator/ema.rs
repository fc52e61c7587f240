//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first close, then EMA[i] = C[i]*k + EMA[i-1]*(1-k).
//! No warmup: defined from period 0, with early values biased toward the seed.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{require_positive, Series};

pub fn calculate_ema(closes: &[f64], window: usize) -> Result<Series, SigtraderError> {
    require_positive("window", window)?;
    Ok(ema_values(closes, window).into_iter().map(Some).collect())
}

/// Raw EMA over a fully-defined input, seeded with `values[0]`.
pub(crate) fn ema_values(values: &[f64], window: usize) -> Vec<f64> {
    let k = smoothing_factor(window);
    let mut out = Vec::with_capacity(values.len());

    for (i, &v) in values.iter().enumerate() {
        let ema = if i == 0 {
            v
        } else {
            v * k + out[i - 1] * (1.0 - k)
        };
        out.push(ema);
    }

    out
}

pub fn smoothing_factor(window: usize) -> f64 {
    2.0 / (window as f64 + 1.0)
}
