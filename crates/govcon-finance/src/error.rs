//! Financial engine error types

use thiserror::Error;

use crate::advisory::AdviceParseError;

/// Financial engine error types
#[derive(Debug, Error)]
pub enum FinanceError {
    /// A budget, timeline or analysis input violated its constraints
    #[error("Invalid input for {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    /// A threshold mapping entry was malformed
    #[error("Invalid threshold for rule {rule}: {reason}")]
    InvalidThreshold { rule: String, reason: String },

    /// Alert lifecycle transition not permitted from the current state
    #[error("Alert {alert_id} cannot move from {from} to {to}")]
    InvalidTransition {
        alert_id: String,
        from: String,
        to: String,
    },

    /// Alert not present in the ledger
    #[error("Alert not found: {alert_id}")]
    AlertNotFound { alert_id: String },

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    ConfigurationError { message: String },

    /// The advisory collaborator could not be reached
    #[error("Advisory service unavailable: {reason}")]
    AdvisoryUnavailable { reason: String },

    /// The advisory collaborator returned an unusable response
    #[error("Advisory response rejected: {0}")]
    AdviceParse(#[from] AdviceParseError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    /// YAML deserialization error
    #[error("YAML error: {source}")]
    YamlError {
        #[from]
        source: serde_yaml::Error,
    },
}

impl FinanceError {
    pub(crate) fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        FinanceError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_threshold(rule: impl Into<String>, reason: impl Into<String>) -> Self {
        FinanceError::InvalidThreshold {
            rule: rule.into(),
            reason: reason.into(),
        }
    }

    /// True for the input-validation class of errors (inputs or thresholds)
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            FinanceError::InvalidInput { .. } | FinanceError::InvalidThreshold { .. }
        )
    }
}

/// Financial engine result type
pub type FinanceResult<T> = Result<T, FinanceError>;

/// Rejects negative and non-finite amounts
pub(crate) fn ensure_non_negative(field: &str, value: f64) -> FinanceResult<()> {
    if !value.is_finite() {
        return Err(FinanceError::invalid_input(field, "must be a finite number"));
    }
    if value < 0.0 {
        return Err(FinanceError::invalid_input(
            field,
            format!("must be >= 0, got {}", value),
        ));
    }
    Ok(())
}
