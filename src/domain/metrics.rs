//! Performance summary of a backtest run.

use super::backtest::BacktestResult;
use super::signal::Signal;

#[derive(Debug, Clone, PartialEq)]
pub struct Metrics {
    pub periods: usize,
    pub total_return: f64,
    pub market_return: f64,
    pub final_equity: f64,
    pub max_drawdown: f64,
    pub max_drawdown_duration: usize,
    pub total_trades: usize,
    /// Sum of fee fractions deducted from strategy returns.
    pub total_fees: f64,
    /// Share of periods holding a non-zero position.
    pub exposure: f64,
}

impl Metrics {
    pub fn compute(result: &BacktestResult) -> Self {
        let periods = result.rows.len();
        let total_trades = result.trade_count();
        let (max_drawdown, max_drawdown_duration) = compute_drawdown(&result.equity_curve());

        let exposed = result
            .rows
            .iter()
            .filter(|r| r.position != Signal::Hold)
            .count();
        let exposure = if periods > 0 {
            exposed as f64 / periods as f64
        } else {
            0.0
        };

        Metrics {
            periods,
            total_return: result.final_return(),
            market_return: result.market_return(),
            final_equity: result.final_equity(),
            max_drawdown,
            max_drawdown_duration,
            total_trades,
            total_fees: total_trades as f64 * result.config.trade_fee,
            exposure,
        }
    }
}

/// Largest peak-to-trough decline as a fraction of the peak, and the longest
/// run of periods spent below a prior peak.
fn compute_drawdown(equity: &[f64]) -> (f64, usize) {
    let mut peak = match equity.first() {
        Some(&e) => e,
        None => return (0.0, 0),
    };
    let mut max_dd = 0.0_f64;
    let mut duration = 0usize;
    let mut max_duration = 0usize;

    for &e in equity {
        if e >= peak {
            peak = e;
            duration = 0;
        } else {
            duration += 1;
            if peak > 0.0 {
                max_dd = max_dd.max((peak - e) / peak);
            }
            max_duration = max_duration.max(duration);
        }
    }

    (max_dd, max_duration)
}
