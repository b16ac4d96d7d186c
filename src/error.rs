//! Error types for the request execution seam.
//!
//! The preparation and collection helpers themselves never fail; errors
//! only arise once a request is actually built and dispatched, or when a
//! submission is attempted with invalid fields.

use std::collections::BTreeMap;
use std::fmt;

use crate::types::FieldId;

/// Errors that can occur when executing a sandbox request.
#[derive(Debug, Clone)]
pub enum SandboxError {
    /// One or more fields failed validation; the map holds the per-field
    /// messages exactly as the fields reported them.
    Validation(BTreeMap<FieldId, String>),

    /// The resolved URL (or its join against the base) is not parseable.
    InvalidUrl(String),

    /// The HTTP client rejected or failed the request.
    Http(String),

    /// Internal error occurred.
    Internal(String),
}

impl fmt::Display for SandboxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(errors) => {
                write!(f, "validation failed for {} field(s): ", errors.len())?;
                let mut first = true;
                for (id, message) in errors {
                    if !first {
                        write!(f, ", ")?;
                    }
                    write!(f, "{id}: {message}")?;
                    first = false;
                }
                Ok(())
            }
            Self::InvalidUrl(msg) => write!(f, "invalid request URL: {msg}"),
            Self::Http(msg) => write!(f, "HTTP request failed: {msg}"),
            Self::Internal(msg) => write!(f, "internal error: {msg}"),
        }
    }
}

impl std::error::Error for SandboxError {}

/// Result type for sandbox operations.
pub type SandboxResult<T> = Result<T, SandboxError>;

impl From<reqwest::Error> for SandboxError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<anyhow::Error> for SandboxError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display_lists_fields() {
        let errors = BTreeMap::from([
            (FieldId::new("age"), "must be a number".to_string()),
            (FieldId::new("name"), "required".to_string()),
        ]);

        let text = SandboxError::Validation(errors).to_string();
        assert!(text.contains("2 field(s)"));
        assert!(text.contains("age: must be a number"));
        assert!(text.contains("name: required"));
    }

    #[test]
    fn test_invalid_url_display() {
        let text = SandboxError::InvalidUrl("relative URL without a base".to_string()).to_string();
        assert!(text.contains("invalid request URL"));
    }

    #[test]
    fn test_from_anyhow() {
        let err: SandboxError = anyhow::anyhow!("boom").into();
        assert!(matches!(err, SandboxError::Internal(msg) if msg == "boom"));
    }
}
