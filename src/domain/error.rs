//! Domain error types.

/// Top-level error type for sigtrader.
#[derive(Debug, thiserror::Error)]
pub enum SigtraderError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("alignment error: {what} has {actual} values, expected {expected}")]
    Alignment {
        what: String,
        expected: usize,
        actual: usize,
    },

    #[error("invalid price data: {reason}")]
    InvalidData { reason: String },

    #[error("no data for {symbol} ({timeframe})")]
    NoData { symbol: String, timeframe: String },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SigtraderError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        SigtraderError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// Fails with `Alignment` unless `actual == expected`.
    pub fn check_aligned(what: &str, expected: usize, actual: usize) -> Result<(), Self> {
        if expected == actual {
            Ok(())
        } else {
            Err(SigtraderError::Alignment {
                what: what.to_string(),
                expected,
                actual,
            })
        }
    }

    /// Process exit status for this error family.
    pub fn exit_status(&self) -> u8 {
        match self {
            SigtraderError::Io(_) => 1,
            SigtraderError::ConfigParse { .. }
            | SigtraderError::ConfigMissing { .. }
            | SigtraderError::ConfigInvalid { .. } => 2,
            SigtraderError::InvalidParameter { .. } => 3,
            SigtraderError::Alignment { .. } | SigtraderError::InvalidData { .. } => 4,
            SigtraderError::NoData { .. } => 5,
        }
    }
}

impl From<&SigtraderError> for std::process::ExitCode {
    fn from(err: &SigtraderError) -> Self {
        std::process::ExitCode::from(err.exit_status())
    }
}
