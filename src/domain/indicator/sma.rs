//! Simple Moving Average indicator.
//!
//! SMA(n)[i] = mean(C[i-n+1..=i]).
//! Warmup: first (n-1) periods are `None`.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{require_positive, Series};

pub fn calculate_sma(closes: &[f64], window: usize) -> Result<Series, SigtraderError> {
    require_positive("window", window)?;

    let mut values = Vec::with_capacity(closes.len());
    let mut sum = 0.0;

    for (i, &close) in closes.iter().enumerate() {
        sum += close;
        if i >= window {
            sum -= closes[i - window];
        }

        if i + 1 < window {
            values.push(None);
        } else {
            values.push(Some(sum / window as f64));
        }
    }

    Ok(values)
}
