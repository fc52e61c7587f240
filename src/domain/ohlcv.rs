//! OHLCV candle and validated price series.

use crate::domain::error::SigtraderError;
use chrono::NaiveDateTime;

#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// A close must be finite and positive for period returns to be defined.
    pub fn check_close(&self) -> Result<(), SigtraderError> {
        if !self.close.is_finite() || self.close <= 0.0 {
            return Err(SigtraderError::InvalidData {
                reason: format!(
                    "close at {} must be finite and positive, got {}",
                    self.timestamp, self.close
                ),
            });
        }
        Ok(())
    }
}

/// Time-ordered candles for one instrument and timeframe.
///
/// Timestamps are strictly increasing and every close is finite and positive.
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    candles: Vec<Candle>,
}

impl PriceSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self, SigtraderError> {
        for (i, candle) in candles.iter().enumerate() {
            candle.check_close()?;
            if i > 0 && candle.timestamp <= candles[i - 1].timestamp {
                return Err(SigtraderError::InvalidData {
                    reason: format!(
                        "timestamps must be strictly increasing: {} follows {}",
                        candle.timestamp,
                        candles[i - 1].timestamp
                    ),
                });
            }
        }
        Ok(Self { candles })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// First and last timestamp, if any.
    pub fn range(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match (self.candles.first(), self.candles.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }
}
