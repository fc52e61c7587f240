//! Backtest result output port trait.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SigtraderError;

/// Port for writing the per-period result table.
pub trait ReportPort {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), SigtraderError>;
}
