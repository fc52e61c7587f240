//! Rolling Standard Deviation indicator.
//!
//! Population standard deviation over n closing prices.
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / n)
//! Warmup: first (n-1) periods are `None`.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{require_positive, Series};

pub fn calculate_stddev(closes: &[f64], window: usize) -> Result<Series, SigtraderError> {
    require_positive("window", window)?;

    let values = (0..closes.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &closes[i + 1 - window..=i];
            let (_, stddev) = mean_and_stddev(slice);
            Some(stddev)
        })
        .collect();

    Ok(values)
}

/// Mean and population standard deviation of a non-empty slice.
pub(crate) fn mean_and_stddev(window: &[f64]) -> (f64, f64) {
    let n = window.len() as f64;
    let mean = window.iter().sum::<f64>() / n;
    let variance = window
        .iter()
        .map(|v| {
            let diff = v - mean;
            diff * diff
        })
        .sum::<f64>()
        / n;
    (mean, variance.sqrt())
}
