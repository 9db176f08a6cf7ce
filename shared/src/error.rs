//! Model validation errors

use thiserror::Error;

/// Raised when local input is rejected before it reaches the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A required field is missing or blank
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A field is present but unusable
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl ModelError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for model validation
pub type ModelResult<T> = Result<T, ModelError>;
