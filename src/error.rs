//! Error types for the rating engine
//!
//! This module defines all error types using anyhow for consistent error handling
//! throughout the application. Typed failures are raised as [`RatingError`] and
//! can be recovered from an [`anyhow::Error`] with `downcast_ref`.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    /// Malformed match input, rejected before any state is touched
    #[error("Invalid match: {reason}")]
    InvalidMatch { reason: String },

    /// An algorithm reached a state the append-only match log cannot produce
    #[error("Algorithm invariant violated in {algorithm}: {reason}")]
    AlgorithmInvariantViolation { algorithm: String, reason: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },
}

impl RatingError {
    /// Whether the caller can retry with corrected input
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RatingError::InvalidMatch { .. })
    }

    pub(crate) fn invalid_match(reason: impl Into<String>) -> Self {
        RatingError::InvalidMatch {
            reason: reason.into(),
        }
    }

    pub(crate) fn invariant(algorithm: &str, reason: impl Into<String>) -> Self {
        RatingError::AlgorithmInvariantViolation {
            algorithm: algorithm.to_string(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_invalid_match_is_recoverable() {
        assert!(RatingError::invalid_match("empty player").is_recoverable());
        assert!(!RatingError::invariant("Elo", "negative games").is_recoverable());
        assert!(!RatingError::ConfigurationError {
            message: "bad".to_string()
        }
        .is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = RatingError::invariant("Rating Percentage Index", "negative game count");
        assert_eq!(
            err.to_string(),
            "Algorithm invariant violated in Rating Percentage Index: negative game count"
        );

        let err: anyhow::Error = RatingError::invalid_match("score1 is negative").into();
        assert_eq!(
            err.downcast_ref::<RatingError>(),
            Some(&RatingError::invalid_match("score1 is negative"))
        );
    }
}
