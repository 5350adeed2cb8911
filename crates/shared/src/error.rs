//! Application-wide error types.
//!
//! The billing core returns typed module errors; `AppError` is the boundary
//! taxonomy an API layer maps them into. Validation, state, concurrency,
//! and configuration failures surface distinctly so callers can decide
//! whether a retry makes sense.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Deterministic, caller-correctable input error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation not valid given the aggregate's current lifecycle state.
    #[error("Invalid state: {0}")]
    State(String),

    /// Optimistic-lock loss; retryable by the caller.
    #[error("Concurrency conflict: {0}")]
    Concurrency(String),

    /// Malformed reference data (e.g., a rate plan) that must block usage.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistence or connectivity failure.
    #[error("Store error: {0}")]
    Store(String),

    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::State(_) | Self::Configuration(_) => 422,
            Self::Concurrency(_) => 409,
            Self::NotFound(_) => 404,
            Self::Store(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::State(_) => "INVALID_STATE",
            Self::Concurrency(_) => "CONCURRENCY_CONFLICT",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may meaningfully retry the operation.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Concurrency(_) | Self::Store(_))
    }
}
