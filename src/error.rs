//! Error types for chart resolution and analysis.

use thiserror::Error;

/// Errors raised while resolving or analysing a chart.
#[derive(Debug, Error)]
pub enum BaziError {
    /// A symbol outside the closed stem/branch sets reached the engine.
    #[error("Unknown {kind}: {symbol:?}")]
    UnknownSymbol { kind: &'static str, symbol: String },

    /// A pillar or chart string has the wrong shape.
    #[error("Malformed pillar: {0}")]
    MalformedPillar(String),

    /// Birth date, time or timezone could not be interpreted.
    #[error("Invalid birth input: {0}")]
    InvalidBirthInput(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl BaziError {
    /// Whether the error was caused by the caller's input rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, BaziError::Config(_))
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Figment extraction or merge error.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A configuration field has an invalid value.
    #[error("Invalid configuration value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_errors_are_client_errors() {
        let err = BaziError::UnknownSymbol {
            kind: "stem",
            symbol: "X".to_string(),
        };
        assert!(err.is_client_error());
        assert_eq!(err.to_string(), "Unknown stem: \"X\"");

        let err = BaziError::InvalidBirthInput("bad date".to_string());
        assert!(err.is_client_error());
    }

    #[test]
    fn config_errors_are_server_errors() {
        let err = BaziError::from(ConfigError::InvalidValue {
            field: "state.fading".to_string(),
            reason: "must be finite".to_string(),
        });
        assert!(!err.is_client_error());
        assert_eq!(
            err.to_string(),
            "Invalid configuration value for 'state.fading': must be finite"
        );
    }
}
