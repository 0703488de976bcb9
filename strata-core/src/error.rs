//! Error types for declaration and synthesis

use thiserror::Error;

/// Result type alias for declaration and synthesis operations
pub type Result<T> = std::result::Result<T, SynthError>;

/// Errors raised while declaring or synthesizing a stack
///
/// Every failure in this crate is a declare-time validation failure: a
/// missing required field, a malformed ARN, a duplicate construct path, or a
/// broken artifact handoff. Execution-time failures (build exits non-zero,
/// deploy command fails) belong to the external pipeline engine and have no
/// representation here.
#[derive(Debug, Error)]
pub enum SynthError {
    /// A declaration carried a missing or malformed field
    #[error("validation failed: {0}")]
    Validation(String),
}

impl SynthError {
    /// Create a validation error from a message
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

/// Reject empty or whitespace-only required fields
pub(crate) fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SynthError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}
