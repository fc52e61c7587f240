//! Configuration validation.
//!
//! Validates all config fields before a backtest runs, so bad values surface as
//! `ConfigInvalid` with their section and key rather than deep inside the pipeline.

use crate::domain::backtest::{DEFAULT_INITIAL_BALANCE, DEFAULT_TRADE_FEE};
use crate::domain::error::SigtraderError;
use crate::domain::indicator::{bollinger, macd};
use crate::domain::signal::IndicatorKind;
use crate::ports::config_port::ConfigPort;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    validate_initial_balance(config)?;
    validate_trade_fee(config)?;
    Ok(())
}

pub fn validate_signal_config(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let enabled = parse_indicator_list(config)?;
    for key in [
        "rsi_period",
        "macd_fast",
        "macd_slow",
        "macd_signal",
        "bollinger_window",
    ] {
        validate_positive_int(config, "signals", key)?;
    }
    if enabled.contains(&IndicatorKind::Macd) {
        validate_macd_order(config)?;
    }
    if enabled.contains(&IndicatorKind::Bollinger) {
        validate_bollinger_std(config)?;
    }
    Ok(())
}

/// Enabled indicators from `[signals] indicators`; all of them when unset.
pub fn parse_indicator_list(config: &dyn ConfigPort) -> Result<Vec<IndicatorKind>, SigtraderError> {
    let raw = match config.get_string("signals", "indicators") {
        Some(s) => s,
        None => return Ok(IndicatorKind::ALL.to_vec()),
    };

    let mut kinds = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind = part
            .parse::<IndicatorKind>()
            .map_err(|reason| SigtraderError::ConfigInvalid {
                section: "signals".to_string(),
                key: "indicators".to_string(),
                reason,
            })?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

fn validate_initial_balance(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = validate_number(config, "backtest", "initial_balance", DEFAULT_INITIAL_BALANCE)?;
    if value <= 0.0 {
        return Err(SigtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "initial_balance".to_string(),
            reason: "initial_balance must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_trade_fee(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = validate_number(config, "backtest", "trade_fee", DEFAULT_TRADE_FEE)?;
    if !(0.0..1.0).contains(&value) {
        return Err(SigtraderError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "trade_fee".to_string(),
            reason: "trade_fee must be in [0, 1)".to_string(),
        });
    }
    Ok(())
}

fn validate_macd_order(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let fast = config.get_int("signals", "macd_fast", macd::DEFAULT_FAST as i64);
    let slow = config.get_int("signals", "macd_slow", macd::DEFAULT_SLOW as i64);
    if fast >= slow {
        return Err(SigtraderError::ConfigInvalid {
            section: "signals".to_string(),
            key: "macd_fast".to_string(),
            reason: "macd_fast must be less than macd_slow".to_string(),
        });
    }
    Ok(())
}

fn validate_bollinger_std(config: &dyn ConfigPort) -> Result<(), SigtraderError> {
    let value = validate_number(config, "signals", "bollinger_std", bollinger::DEFAULT_NUM_STD)?;
    if value < 0.0 {
        return Err(SigtraderError::ConfigInvalid {
            section: "signals".to_string(),
            key: "bollinger_std".to_string(),
            reason: "bollinger_std must be non-negative".to_string(),
        });
    }
    Ok(())
}

/// A present key must parse as a finite number; an absent key yields `default`.
fn validate_number(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, SigtraderError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Ok(v),
            _ => Err(SigtraderError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("expected a number, got '{}'", raw),
            }),
        },
    }
}

fn validate_positive_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<(), SigtraderError> {
    match config.get_string(section, key) {
        None => Ok(()),
        Some(raw) => match raw.trim().parse::<i64>() {
            Ok(v) if v >= 1 => Ok(()),
            _ => Err(SigtraderError::ConfigInvalid {
                section: section.to_string(),
                key: key.to_string(),
                reason: format!("{} must be a positive integer, got '{}'", key, raw),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn empty_config_uses_valid_defaults() {
        let config = make_config("[backtest]\n");
        assert!(validate_backtest_config(&config).is_ok());
        assert!(validate_signal_config(&config).is_ok());
    }

    #[test]
    fn valid_backtest_config_passes() {
        let config = make_config("[backtest]\ninitial_balance = 1000000\ntrade_fee = 0.001\n");
        assert!(validate_backtest_config(&config).is_ok());
    }

    #[test]
    fn initial_balance_must_be_positive() {
        let config = make_config("[backtest]\ninitial_balance = -5\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(
            matches!(err, SigtraderError::ConfigInvalid { key, .. } if key == "initial_balance")
        );
    }

    #[test]
    fn initial_balance_non_numeric_fails() {
        let config = make_config("[backtest]\ninitial_balance = lots\n");
        let err = validate_backtest_config(&config).unwrap_err();
        assert!(
            matches!(err, SigtraderError::ConfigInvalid { key, .. } if key == "initial_balance")
        );
    }

    #[test]
    fn trade_fee_out_of_range_fails() {
        for fee in ["1.5", "1", "-0.001"] {
            let config = make_config(&format!("[backtest]\ntrade_fee = {}\n", fee));
            let err = validate_backtest_config(&config).unwrap_err();
            assert!(
                matches!(err, SigtraderError::ConfigInvalid { ref key, .. } if key == "trade_fee"),
                "fee {} should fail",
                fee
            );
        }
    }

    #[test]
    fn trade_fee_zero_passes() {
        let config = make_config("[backtest]\ntrade_fee = 0\n");
        assert!(validate_backtest_config(&config).is_ok());
    }

    #[test]
    fn valid_signal_config_passes() {
        let config = make_config(
            r#"
[signals]
indicators = rsi,macd,bollinger
rsi_period = 14
macd_fast = 12
macd_slow = 26
macd_signal = 9
bollinger_window = 20
bollinger_std = 2.0
"#,
        );
        assert!(validate_signal_config(&config).is_ok());
    }

    #[test]
    fn rsi_period_zero_fails() {
        let config = make_config("[signals]\nrsi_period = 0\n");
        let err = validate_signal_config(&config).unwrap_err();
        assert!(matches!(err, SigtraderError::ConfigInvalid { key, .. } if key == "rsi_period"));
    }

    #[test]
    fn bollinger_window_negative_fails() {
        let config = make_config("[signals]\nbollinger_window = -3\n");
        let err = validate_signal_config(&config).unwrap_err();
        assert!(
            matches!(err, SigtraderError::ConfigInvalid { key, .. } if key == "bollinger_window")
        );
    }

    #[test]
    fn macd_fast_not_below_slow_fails() {
        let config = make_config("[signals]\nmacd_fast = 30\nmacd_slow = 26\n");
        let err = validate_signal_config(&config).unwrap_err();
        assert!(matches!(err, SigtraderError::ConfigInvalid { key, .. } if key == "macd_fast"));
    }

    #[test]
    fn disabled_indicator_parameters_skip_cross_checks() {
        let config = make_config(
            "[signals]\nindicators = rsi\nmacd_fast = 30\nmacd_slow = 26\nbollinger_std = -1\n",
        );
        assert!(validate_signal_config(&config).is_ok());
    }

    #[test]
    fn bollinger_std_negative_fails() {
        let config = make_config("[signals]\nbollinger_std = -1\n");
        let err = validate_signal_config(&config).unwrap_err();
        assert!(
            matches!(err, SigtraderError::ConfigInvalid { key, .. } if key == "bollinger_std")
        );
    }

    #[test]
    fn unknown_indicator_fails() {
        let config = make_config("[signals]\nindicators = rsi, ichimoku\n");
        let err = validate_signal_config(&config).unwrap_err();
        assert!(matches!(err, SigtraderError::ConfigInvalid { key, .. } if key == "indicators"));
    }

    #[test]
    fn indicator_list_parsing() {
        let config = make_config("[signals]\nindicators = MACD, rsi, macd\n");
        assert_eq!(
            parse_indicator_list(&config).unwrap(),
            vec![IndicatorKind::Macd, IndicatorKind::Rsi]
        );

        let config = make_config("[signals]\n");
        assert_eq!(
            parse_indicator_list(&config).unwrap(),
            IndicatorKind::ALL.to_vec()
        );
    }
}
