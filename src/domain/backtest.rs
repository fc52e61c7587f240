//! Position simulator: lagged position, flat per-change fee, compounding equity.
//!
//! Per period i:
//! - position[i] = signal[i-1], position[0] = 0
//! - return[i] = close[i]/close[i-1] - 1, return[0] = 0
//! - strategy_return[i] = position[i] * return[i] - (trade_fee if position changed)
//! - cumulative_return, cumulative_market_return: running products of (1 + r)
//! - equity[i] = initial_balance * cumulative_return[i]

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::Candle;
use crate::domain::signal::Signal;
use chrono::NaiveDateTime;

pub const DEFAULT_INITIAL_BALANCE: f64 = 1_000_000.0;
pub const DEFAULT_TRADE_FEE: f64 = 0.001;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub initial_balance: f64,
    /// Fraction of position value charged on every position change.
    pub trade_fee: f64,
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_balance: DEFAULT_INITIAL_BALANCE,
            trade_fee: DEFAULT_TRADE_FEE,
        }
    }
}

impl BacktestConfig {
    pub fn validate(&self) -> Result<(), SigtraderError> {
        if !self.initial_balance.is_finite() || self.initial_balance <= 0.0 {
            return Err(SigtraderError::invalid_parameter(
                "initial_balance",
                format!("must be positive, got {}", self.initial_balance),
            ));
        }
        if !(0.0..1.0).contains(&self.trade_fee) {
            return Err(SigtraderError::invalid_parameter(
                "trade_fee",
                format!("must be in [0, 1), got {}", self.trade_fee),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestRow {
    pub timestamp: NaiveDateTime,
    pub close: f64,
    pub signal: Signal,
    pub position: Signal,
    pub ret: f64,
    pub strategy_return: f64,
    pub cumulative_return: f64,
    pub cumulative_market_return: f64,
    pub equity: f64,
    /// Position differs from the previous period's; the fee was charged.
    pub traded: bool,
}

#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub config: BacktestConfig,
    pub rows: Vec<BacktestRow>,
}

impl BacktestResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// cumulative_return[last] - 1, or 0 for an empty run.
    pub fn final_return(&self) -> f64 {
        self.rows
            .last()
            .map(|r| r.cumulative_return - 1.0)
            .unwrap_or(0.0)
    }

    /// Buy-and-hold return over the same periods.
    pub fn market_return(&self) -> f64 {
        self.rows
            .last()
            .map(|r| r.cumulative_market_return - 1.0)
            .unwrap_or(0.0)
    }

    pub fn final_equity(&self) -> f64 {
        self.rows
            .last()
            .map(|r| r.equity)
            .unwrap_or(self.config.initial_balance)
    }

    pub fn trade_count(&self) -> usize {
        self.rows.iter().filter(|r| r.traded).count()
    }

    pub fn equity_curve(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.equity).collect()
    }
}

pub fn run_backtest(
    candles: &[Candle],
    signals: &[Signal],
    config: &BacktestConfig,
) -> Result<BacktestResult, SigtraderError> {
    config.validate()?;
    SigtraderError::check_aligned("signals", candles.len(), signals.len())?;
    for candle in candles {
        candle.check_close()?;
    }

    let mut rows: Vec<BacktestRow> = Vec::with_capacity(candles.len());
    let mut cumulative_return = 1.0;
    let mut cumulative_market_return = 1.0;

    for (i, (candle, &signal)) in candles.iter().zip(signals.iter()).enumerate() {
        let (position, ret, traded) = match rows.last() {
            None => (Signal::Hold, 0.0, false),
            Some(prev) => {
                let position = signals[i - 1];
                (
                    position,
                    candle.close / prev.close - 1.0,
                    position != prev.position,
                )
            }
        };

        let mut strategy_return = f64::from(position.value()) * ret;
        if traded {
            strategy_return -= config.trade_fee;
        }

        cumulative_return *= 1.0 + strategy_return;
        cumulative_market_return *= 1.0 + ret;

        rows.push(BacktestRow {
            timestamp: candle.timestamp,
            close: candle.close,
            signal,
            position,
            ret,
            strategy_return,
            cumulative_return,
            cumulative_market_return,
            equity: config.initial_balance * cumulative_return,
            traded,
        });
    }

    let result = BacktestResult {
        config: config.clone(),
        rows,
    };
    log::debug!(
        "backtest: {} periods, {} trades, final return {:.4}",
        result.rows.len(),
        result.trade_count(),
        result.final_return()
    );
    Ok(result)
}
