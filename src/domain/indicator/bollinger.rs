//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (num_std × StdDev)
//! - Lower: Middle - (num_std × StdDev)
//!
//! Where StdDev is population standard deviation (divides by N, not N-1).
//!
//! Default parameters: window=20, num_std=2.0
//! Warmup: first (window-1) periods are `None`.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::stddev::mean_and_stddev;
use crate::domain::indicator::{require_positive, BollingerSeries};

pub const DEFAULT_WINDOW: usize = 20;
pub const DEFAULT_NUM_STD: f64 = 2.0;

pub fn calculate_bollinger(
    closes: &[f64],
    window: usize,
    num_std: f64,
) -> Result<BollingerSeries, SigtraderError> {
    require_positive("bollinger_window", window)?;
    if !num_std.is_finite() || num_std < 0.0 {
        return Err(SigtraderError::invalid_parameter(
            "bollinger_std",
            format!("must be finite and non-negative, got {}", num_std),
        ));
    }

    let mut upper = Vec::with_capacity(closes.len());
    let mut middle = Vec::with_capacity(closes.len());
    let mut lower = Vec::with_capacity(closes.len());

    for i in 0..closes.len() {
        if i + 1 < window {
            upper.push(None);
            middle.push(None);
            lower.push(None);
            continue;
        }

        let (mean, stddev) = mean_and_stddev(&closes[i + 1 - window..=i]);
        upper.push(Some(mean + num_std * stddev));
        middle.push(Some(mean));
        lower.push(Some(mean - num_std * stddev));
    }

    Ok(BollingerSeries {
        upper,
        middle,
        lower,
    })
}
