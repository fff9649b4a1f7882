//! Error types for the common model.

use thiserror::Error;

/// Errors raised while building or validating common-model values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// A duration string did not match any accepted Slurm time format.
    #[error("invalid duration '{input}': {reason}")]
    InvalidDuration {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A required identifying field was missing or empty.
    #[error("{field} is required")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A field was present but held an unusable value.
    #[error("invalid {field}: {reason}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl TypesError {
    /// Create a missing-field error.
    #[must_use]
    pub const fn missing(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create an invalid-field error.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    /// Returns the field name this error refers to, if any.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::MissingField { field } | Self::InvalidField { field, .. } => Some(field),
            Self::InvalidDuration { .. } => None,
        }
    }
}

/// Result type for common-model operations.
pub type TypesResult<T> = Result<T, TypesError>;

/// Fails with [`TypesError::MissingField`] when `value` is empty or whitespace.
pub(crate) fn require(field: &'static str, value: &str) -> TypesResult<()> {
    if value.trim().is_empty() {
        return Err(TypesError::missing(field));
    }
    Ok(())
}
