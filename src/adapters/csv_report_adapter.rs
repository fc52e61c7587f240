//! CSV writer for the per-period backtest table.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::SigtraderError;
use crate::ports::report_port::ReportPort;
use std::io::Write;

pub const HEADER: [&str; 9] = [
    "datetime",
    "close",
    "signal",
    "position",
    "return",
    "strategy_return",
    "cumulative_return",
    "cumulative_market_return",
    "equity",
];

pub struct CsvReportAdapter;

impl CsvReportAdapter {
    /// Writes the table to any sink; `write` targets a file path.
    pub fn write_to<W: Write>(result: &BacktestResult, sink: W) -> Result<(), SigtraderError> {
        let mut wtr = csv::Writer::from_writer(sink);
        wtr.write_record(HEADER).map_err(csv_error)?;

        for row in &result.rows {
            wtr.write_record([
                row.timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
                row.close.to_string(),
                row.signal.to_string(),
                row.position.to_string(),
                row.ret.to_string(),
                row.strategy_return.to_string(),
                row.cumulative_return.to_string(),
                row.cumulative_market_return.to_string(),
                row.equity.to_string(),
            ])
            .map_err(csv_error)?;
        }

        wtr.flush()?;
        Ok(())
    }
}

fn csv_error(e: csv::Error) -> SigtraderError {
    SigtraderError::Io(std::io::Error::other(e))
}

impl ReportPort for CsvReportAdapter {
    fn write(&self, result: &BacktestResult, output_path: &str) -> Result<(), SigtraderError> {
        let file = std::fs::File::create(output_path)?;
        Self::write_to(result, file)?;
        log::info!("wrote {} rows to {}", result.rows.len(), output_path);
        Ok(())
    }
}
