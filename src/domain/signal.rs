//! Composite signal generation by independent per-indicator voting.
//!
//! Each available indicator adds +1 (buy), -1 (sell) or nothing to a per-period
//! tally; the signal is the sign of the tally. Opposing votes cancel to `Hold`.

use crate::domain::error::SigtraderError;
use crate::domain::indicator::{
    bollinger, calculate_bollinger, calculate_macd, calculate_rsi, macd, rsi, BollingerSeries,
    IndicatorType, MacdSeries, Series,
};
use std::fmt;
use std::str::FromStr;

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Signal {
    Sell,
    #[default]
    Hold,
    Buy,
}

impl Signal {
    pub fn from_vote(vote: i32) -> Self {
        match vote.signum() {
            1 => Signal::Buy,
            -1 => Signal::Sell,
            _ => Signal::Hold,
        }
    }

    pub fn value(self) -> i8 {
        match self {
            Signal::Sell => -1,
            Signal::Hold => 0,
            Signal::Buy => 1,
        }
    }
}

impl TryFrom<i8> for Signal {
    type Error = SigtraderError;

    fn try_from(value: i8) -> Result<Self, Self::Error> {
        match value {
            -1 => Ok(Signal::Sell),
            0 => Ok(Signal::Hold),
            1 => Ok(Signal::Buy),
            other => Err(SigtraderError::invalid_parameter(
                "signal",
                format!("expected -1, 0 or 1, got {}", other),
            )),
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value(), f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Rsi,
    Macd,
    Bollinger,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 3] =
        [IndicatorKind::Rsi, IndicatorKind::Macd, IndicatorKind::Bollinger];
}

impl FromStr for IndicatorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rsi" => Ok(IndicatorKind::Rsi),
            "macd" => Ok(IndicatorKind::Macd),
            "bollinger" | "bb" => Ok(IndicatorKind::Bollinger),
            other => Err(format!("unknown indicator '{}'", other)),
        }
    }
}

/// Parameters for indicators the generator computes itself.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalParams {
    pub indicators: Vec<IndicatorKind>,
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_window: usize,
    pub bollinger_std: f64,
}

impl Default for SignalParams {
    fn default() -> Self {
        Self {
            indicators: IndicatorKind::ALL.to_vec(),
            rsi_period: rsi::DEFAULT_PERIOD,
            macd_fast: macd::DEFAULT_FAST,
            macd_slow: macd::DEFAULT_SLOW,
            macd_signal: macd::DEFAULT_SIGNAL,
            bollinger_window: bollinger::DEFAULT_WINDOW,
            bollinger_std: bollinger::DEFAULT_NUM_STD,
        }
    }
}

impl SignalParams {
    pub fn enabled(&self, kind: IndicatorKind) -> bool {
        self.indicators.contains(&kind)
    }

    /// Indicator identities for the enabled set, in voting order.
    pub fn indicator_types(&self) -> Vec<IndicatorType> {
        IndicatorKind::ALL
            .iter()
            .filter(|k| self.enabled(**k))
            .map(|k| match k {
                IndicatorKind::Rsi => IndicatorType::Rsi(self.rsi_period),
                IndicatorKind::Macd => IndicatorType::Macd {
                    fast: self.macd_fast,
                    slow: self.macd_slow,
                    signal: self.macd_signal,
                },
                IndicatorKind::Bollinger => IndicatorType::Bollinger {
                    window: self.bollinger_window,
                    num_std: self.bollinger_std,
                },
            })
            .collect()
    }
}

/// Indicator columns aligned with a close series. `None` means "not provided".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndicatorBundle {
    pub rsi: Option<Series>,
    pub macd: Option<MacdSeries>,
    pub bollinger: Option<BollingerSeries>,
}

impl IndicatorBundle {
    /// Computes every enabled indicator the bundle is missing.
    ///
    /// Supplied columns are kept as-is, even when their parameters differ from `params`.
    pub fn complete(mut self, closes: &[f64], params: &SignalParams) -> Result<Self, SigtraderError> {
        if self.rsi.is_none() && params.enabled(IndicatorKind::Rsi) {
            log::debug!("computing RSI({})", params.rsi_period);
            self.rsi = Some(calculate_rsi(closes, params.rsi_period)?);
        }
        if self.macd.is_none() && params.enabled(IndicatorKind::Macd) {
            log::debug!(
                "computing MACD({},{},{})",
                params.macd_fast,
                params.macd_slow,
                params.macd_signal
            );
            self.macd = Some(calculate_macd(
                closes,
                params.macd_fast,
                params.macd_slow,
                params.macd_signal,
            )?);
        }
        if self.bollinger.is_none() && params.enabled(IndicatorKind::Bollinger) {
            log::debug!(
                "computing BOLLINGER({},{})",
                params.bollinger_window,
                params.bollinger_std
            );
            self.bollinger = Some(calculate_bollinger(
                closes,
                params.bollinger_window,
                params.bollinger_std,
            )?);
        }
        Ok(self)
    }

    fn check_aligned(&self, len: usize) -> Result<(), SigtraderError> {
        if let Some(rsi) = &self.rsi {
            SigtraderError::check_aligned("rsi", len, rsi.len())?;
        }
        if let Some(macd) = &self.macd {
            SigtraderError::check_aligned("macd line", len, macd.line.len())?;
            SigtraderError::check_aligned("macd signal", len, macd.signal.len())?;
        }
        if let Some(bands) = &self.bollinger {
            SigtraderError::check_aligned("bollinger upper", len, bands.upper.len())?;
            SigtraderError::check_aligned("bollinger lower", len, bands.lower.len())?;
        }
        Ok(())
    }
}

fn rsi_vote(rsi: Option<f64>) -> i32 {
    match rsi {
        Some(v) if v < RSI_OVERSOLD => 1,
        Some(v) if v > RSI_OVERBOUGHT => -1,
        _ => 0,
    }
}

fn macd_vote(line: Option<f64>, signal: Option<f64>) -> i32 {
    match (line, signal) {
        (Some(l), Some(s)) if l > s => 1,
        (Some(l), Some(s)) if l < s => -1,
        _ => 0,
    }
}

fn bollinger_vote(close: f64, upper: Option<f64>, lower: Option<f64>) -> i32 {
    match (upper, lower) {
        (_, Some(lo)) if close < lo => 1,
        (Some(up), _) if close > up => -1,
        _ => 0,
    }
}

/// Tallies the votes of every indicator present in `bundle`.
pub fn vote(closes: &[f64], bundle: &IndicatorBundle) -> Result<Vec<Signal>, SigtraderError> {
    bundle.check_aligned(closes.len())?;

    let signals = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let mut tally = 0;
            if let Some(rsi) = &bundle.rsi {
                tally += rsi_vote(rsi[i]);
            }
            if let Some(macd) = &bundle.macd {
                tally += macd_vote(macd.line[i], macd.signal[i]);
            }
            if let Some(bands) = &bundle.bollinger {
                tally += bollinger_vote(close, bands.upper[i], bands.lower[i]);
            }
            Signal::from_vote(tally)
        })
        .collect();

    Ok(signals)
}

/// Completes `bundle` with the enabled indicators it lacks, then votes.
pub fn generate_signals(
    closes: &[f64],
    bundle: IndicatorBundle,
    params: &SignalParams,
) -> Result<Vec<Signal>, SigtraderError> {
    let bundle = bundle.complete(closes, params)?;
    vote(closes, &bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn macd_from(line: Vec<f64>, signal: Vec<f64>) -> MacdSeries {
        let histogram = line.iter().zip(&signal).map(|(l, s)| Some(l - s)).collect();
        MacdSeries {
            line: line.into_iter().map(Some).collect(),
            signal: signal.into_iter().map(Some).collect(),
            histogram,
        }
    }

    fn bands(upper: f64, lower: f64, n: usize) -> BollingerSeries {
        BollingerSeries {
            upper: vec![Some(upper); n],
            middle: vec![Some((upper + lower) / 2.0); n],
            lower: vec![Some(lower); n],
        }
    }

    #[test]
    fn signal_from_vote_clips_to_sign() {
        assert_eq!(Signal::from_vote(3), Signal::Buy);
        assert_eq!(Signal::from_vote(1), Signal::Buy);
        assert_eq!(Signal::from_vote(0), Signal::Hold);
        assert_eq!(Signal::from_vote(-2), Signal::Sell);
    }

    #[test]
    fn signal_try_from_i8() {
        assert_eq!(Signal::try_from(-1).unwrap(), Signal::Sell);
        assert_eq!(Signal::try_from(1).unwrap().value(), 1);
        assert!(Signal::try_from(2).is_err());
    }

    #[test]
    fn indicator_kind_parses() {
        assert_eq!("RSI".parse::<IndicatorKind>().unwrap(), IndicatorKind::Rsi);
        assert_eq!(" macd ".parse::<IndicatorKind>().unwrap(), IndicatorKind::Macd);
        assert_eq!(
            "bollinger".parse::<IndicatorKind>().unwrap(),
            IndicatorKind::Bollinger
        );
        assert!("stochastic".parse::<IndicatorKind>().is_err());
    }

    #[test]
    fn empty_bundle_votes_hold() {
        let signals = vote(&[1.0, 2.0, 3.0], &IndicatorBundle::default()).unwrap();
        assert_eq!(signals, vec![Signal::Hold; 3]);
    }

    #[test]
    fn rsi_thresholds() {
        let bundle = IndicatorBundle {
            rsi: Some(vec![Some(29.9), Some(30.0), Some(50.0), Some(70.0), Some(70.1), None]),
            ..Default::default()
        };
        let signals = vote(&[1.0; 6], &bundle).unwrap();
        assert_eq!(
            signals,
            vec![
                Signal::Buy,
                Signal::Hold,
                Signal::Hold,
                Signal::Hold,
                Signal::Sell,
                Signal::Hold
            ]
        );
    }

    #[test]
    fn macd_crossing_direction() {
        let bundle = IndicatorBundle {
            macd: Some(macd_from(vec![1.0, -1.0, 0.5], vec![0.0, 0.0, 0.5])),
            ..Default::default()
        };
        let signals = vote(&[1.0; 3], &bundle).unwrap();
        assert_eq!(signals, vec![Signal::Buy, Signal::Sell, Signal::Hold]);
    }

    #[test]
    fn bollinger_band_breaks() {
        let bundle = IndicatorBundle {
            bollinger: Some(bands(110.0, 90.0, 4)),
            ..Default::default()
        };
        let signals = vote(&[89.0, 100.0, 111.0, 110.0], &bundle).unwrap();
        assert_eq!(
            signals,
            vec![Signal::Buy, Signal::Hold, Signal::Sell, Signal::Hold]
        );
    }

    #[test]
    fn warmup_values_do_not_vote() {
        let bundle = IndicatorBundle {
            rsi: Some(vec![None, Some(10.0)]),
            bollinger: Some(BollingerSeries {
                upper: vec![None, None],
                middle: vec![None, None],
                lower: vec![None, None],
            }),
            ..Default::default()
        };
        let signals = vote(&[1.0, 1.0], &bundle).unwrap();
        assert_eq!(signals, vec![Signal::Hold, Signal::Buy]);
    }

    #[test]
    fn opposing_votes_cancel() {
        let bundle = IndicatorBundle {
            rsi: Some(vec![Some(20.0)]),
            macd: Some(macd_from(vec![-1.0], vec![0.0])),
            ..Default::default()
        };
        assert_eq!(vote(&[100.0], &bundle).unwrap(), vec![Signal::Hold]);
    }

    #[test]
    fn majority_wins() {
        let bundle = IndicatorBundle {
            rsi: Some(vec![Some(80.0)]),
            macd: Some(macd_from(vec![1.0], vec![0.0])),
            bollinger: Some(bands(99.0, 90.0, 1)),
        };
        assert_eq!(vote(&[100.0], &bundle).unwrap(), vec![Signal::Sell]);
    }

    #[test]
    fn misaligned_indicator_rejected() {
        let bundle = IndicatorBundle {
            rsi: Some(vec![Some(50.0)]),
            ..Default::default()
        };
        let err = vote(&[1.0, 2.0], &bundle).unwrap_err();
        assert!(matches!(err, SigtraderError::Alignment { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn complete_fills_only_missing_indicators() {
        let closes: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let supplied_rsi = vec![Some(1.0); 30];
        let bundle = IndicatorBundle {
            rsi: Some(supplied_rsi.clone()),
            ..Default::default()
        }
        .complete(&closes, &SignalParams::default())
        .unwrap();

        assert_eq!(bundle.rsi, Some(supplied_rsi));
        assert!(bundle.macd.is_some());
        assert!(bundle.bollinger.is_some());
    }

    #[test]
    fn complete_respects_enabled_set() {
        let params = SignalParams {
            indicators: vec![IndicatorKind::Rsi],
            ..Default::default()
        };
        let bundle = IndicatorBundle::default()
            .complete(&[1.0, 2.0, 3.0], &params)
            .unwrap();
        assert!(bundle.rsi.is_some());
        assert!(bundle.macd.is_none());
        assert!(bundle.bollinger.is_none());
    }

    #[test]
    fn generate_signals_rejects_bad_period() {
        let params = SignalParams {
            rsi_period: 0,
            ..Default::default()
        };
        let err = generate_signals(&[1.0, 2.0], IndicatorBundle::default(), &params).unwrap_err();
        assert!(matches!(err, SigtraderError::InvalidParameter { .. }));
    }

    #[test]
    fn generate_signals_uptrend_is_not_buy() {
        // steady rise: RSI pinned at 100 offsets the MACD buy vote
        let closes: Vec<f64> = (0..60).map(|i| 100.0 * 1.01_f64.powi(i)).collect();
        let signals =
            generate_signals(&closes, IndicatorBundle::default(), &SignalParams::default())
                .unwrap();
        assert_eq!(signals.len(), 60);
        assert_ne!(*signals.last().unwrap(), Signal::Buy);
    }

    #[test]
    fn indicator_types_follow_params() {
        let types = SignalParams::default().indicator_types();
        let names: Vec<String> = types.iter().map(|t| t.to_string()).collect();
        assert_eq!(names, vec!["RSI(14)", "MACD(12,26,9)", "BOLLINGER(20,2)"]);
    }
}
