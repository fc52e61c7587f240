//! Candle source port trait.
//!
//! Implementations own retrieval and caching; the domain only sees the
//! returned candles.

use crate::domain::error::SigtraderError;
use crate::domain::ohlcv::PriceSeries;

pub trait DataPort {
    /// Time-ordered candles for `symbol` at `timeframe` (e.g. `"BTC/USDT"`, `"1h"`).
    fn fetch_candles(&self, symbol: &str, timeframe: &str) -> Result<PriceSeries, SigtraderError>;

    /// Symbols available at `timeframe`.
    fn list_symbols(&self, timeframe: &str) -> Result<Vec<String>, SigtraderError>;
}
