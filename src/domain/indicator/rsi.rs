//! RSI (Relative Strength Index) indicator.
//!
//! Average gain/loss are simple trailing means over the last n price changes:
//! - gain = max(ΔC, 0), loss = max(-ΔC, 0)
//! - RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//!
//! If avg_loss == 0: RSI = 100, or 50 when avg_gain is also 0 (flat window).
//!
//! Warmup: first n periods are `None` (period 0 has no price change).

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{require_positive, Series};

pub const DEFAULT_PERIOD: usize = 14;

pub fn calculate_rsi(closes: &[f64], period: usize) -> Result<Series, SigtraderError> {
    require_positive("rsi_period", period)?;

    let mut values: Series = vec![None; closes.len()];
    if closes.len() <= period {
        return Ok(values);
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for w in closes.windows(2) {
        let change = w[1] - w[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    // gains[j] is the change into period j + 1.
    for i in period..closes.len() {
        let window = (i - period)..i;
        let avg_gain = gains[window.clone()].iter().sum::<f64>() / period as f64;
        let avg_loss = losses[window].iter().sum::<f64>() / period as f64;
        values[i] = Some(rsi_from_averages(avg_gain, avg_loss));
    }

    Ok(values)
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 { 50.0 } else { 100.0 }
    } else {
        100.0 - (100.0 / (1.0 + avg_gain / avg_loss))
    }
}
