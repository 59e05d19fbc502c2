//! Core error type for strict value parsing
//!
//! The document parser itself is lenient and never fails; these errors are
//! produced by the strict helpers in [`crate::utils`] and let callers decide
//! whether a malformed value should fall back to a default.

use thiserror::Error;

/// Error produced by the strict value parsers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Structural parsing problem
    #[error("Parse error: {0}")]
    Parse(String),

    /// Color string is not `&H[AA]BBGGRR` or a decimal color value
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    /// Numeric field could not be parsed
    #[error("Invalid numeric value: {0}")]
    InvalidNumeric(String),

    /// Time field is not `H:MM:SS.ff`
    #[error("Invalid time: {0}")]
    InvalidTime(String),
}

impl CoreError {
    /// Check whether the error originates from a malformed field value
    ///
    /// Field errors are always recoverable by substituting the field default.
    #[must_use]
    pub const fn is_field_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidColor(_) | Self::InvalidNumeric(_) | Self::InvalidTime(_)
        )
    }
}
