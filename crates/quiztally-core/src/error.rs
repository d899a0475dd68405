//! Quiz error types.
//!
//! The evaluator and aggregation engine are pure and surface contract
//! violations synchronously. Only the persistence boundary recovers from
//! errors, see [`crate::store::ResultStore::open_or_empty`].

use thiserror::Error;

/// Errors raised by the quiz core.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Malformed input to the submission evaluator.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The backing blob store could not be read or written.
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),
}

impl QuizError {
    /// Returns `true` if this error came from the persistence layer.
    pub fn is_persistence(&self) -> bool {
        matches!(self, QuizError::PersistenceUnavailable(_))
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        QuizError::Validation(message.into())
    }

    pub(crate) fn persistence(message: impl Into<String>) -> Self {
        QuizError::PersistenceUnavailable(message.into())
    }
}

impl From<std::io::Error> for QuizError {
    fn from(err: std::io::Error) -> Self {
        QuizError::PersistenceUnavailable(err.to_string())
    }
}

impl From<serde_json::Error> for QuizError {
    fn from(err: serde_json::Error) -> Self {
        QuizError::PersistenceUnavailable(format!("malformed result blob: {err}"))
    }
}
