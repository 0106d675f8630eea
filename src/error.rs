//! Error types for shocksim.
//!
//! All fallible operations return `Result<T, SimError>` instead of panicking.
//! Custom-function failures are always non-fatal: they surface as a sidebar
//! message and never tear down the dashboard session.

use thiserror::Error;

/// Result type alias for shocksim operations.
pub type SimResult<T> = Result<T, SimError>;

/// Unified error type for all shocksim operations.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// Custom-function compilation error.
    #[error("Invalid function: {0}")]
    Expr(#[from] crate::expr::ExprError),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SimError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_config() {
        let err = SimError::config("invalid parameter");
        let msg = err.to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("invalid parameter"));
    }

    #[test]
    fn test_error_from_expr() {
        let expr_err = crate::expr::ExprError::UnknownSymbol("y".to_string());
        let err = SimError::from(expr_err);
        let msg = err.to_string();
        assert!(msg.contains("Invalid function"));
        assert!(msg.contains('y'));
    }

    #[test]
    fn test_error_debug() {
        let err = SimError::config("test");
        let debug = format!("{err:?}");
        assert!(debug.contains("Config"));
    }
}
