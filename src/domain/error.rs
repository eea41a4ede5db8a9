//! Domain error types.

/// Top-level error type for horizon.
#[derive(Debug, thiserror::Error)]
pub enum HorizonError {
    #[error("database error: {reason}")]
    Database { reason: String },

    #[error("database query error: {reason}")]
    DatabaseQuery { reason: String },

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

    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("no price data for {symbol}")]
    NoData { symbol: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HorizonError {
    pub(crate) fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        HorizonError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }

    /// True for errors the caller caused through configuration or parameters.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HorizonError::ConfigParse { .. }
                | HorizonError::ConfigMissing { .. }
                | HorizonError::ConfigInvalid { .. }
                | HorizonError::InvalidParameter { .. }
        )
    }
}

impl From<&HorizonError> for std::process::ExitCode {
    fn from(err: &HorizonError) -> Self {
        let code: u8 = match err {
            HorizonError::Io(_) | HorizonError::Report { .. } => 1,
            HorizonError::ConfigParse { .. }
            | HorizonError::ConfigMissing { .. }
            | HorizonError::ConfigInvalid { .. } => 2,
            HorizonError::Database { .. } | HorizonError::DatabaseQuery { .. } => 3,
            HorizonError::InvalidParameter { .. } => 4,
            HorizonError::NoData { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        let err = HorizonError::ConfigMissing {
            section: "strategy".into(),
            key: "threshold".into(),
        };
        assert_eq!(err.to_string(), "missing config key [strategy] threshold");

        let err = HorizonError::invalid_parameter("slow", "must be greater than fast");
        assert_eq!(
            err.to_string(),
            "invalid parameter slow: must be greater than fast"
        );
    }

    #[test]
    fn configuration_classification() {
        assert!(HorizonError::invalid_parameter("fast", "zero").is_configuration());
        assert!(
            HorizonError::ConfigInvalid {
                section: "backtest".into(),
                key: "hold_days".into(),
                reason: "must be at least 1".into(),
            }
            .is_configuration()
        );
        assert!(!HorizonError::NoData { symbol: "SPY".into() }.is_configuration());
    }
}
