//! Error types for the overlay renderer

use ass_script::CoreError;
use thiserror::Error;

/// Overlay error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OverlayError {
    /// Strict value parsing failed
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Subtitle source could not be fetched or decoded
    #[error("Failed to load subtitle source: {0}")]
    Load(String),

    /// Operation not valid in the current lifecycle state
    #[error("Invalid renderer state: {0}")]
    InvalidState(String),

    /// Host surface rejected an operation
    #[error("Surface error: {0}")]
    Surface(String),
}

impl OverlayError {
    /// Check if error is recoverable
    ///
    /// A failed load can be retried with `init`, and field errors fall back
    /// to defaults. Lifecycle misuse and surface failures are not recoverable
    /// without host intervention.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Load(_) | Self::Core(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_convert() {
        let err: OverlayError = CoreError::InvalidTime("x".to_string()).into();
        assert_eq!(err.to_string(), "Invalid time: x");
        assert!(err.is_recoverable());
    }

    #[test]
    fn recoverability() {
        assert!(OverlayError::Load("404".to_string()).is_recoverable());
        assert!(!OverlayError::InvalidState("busy".to_string()).is_recoverable());
        assert!(!OverlayError::Surface("gone".to_string()).is_recoverable());
    }
}
