//! Core error types for the stagehand framework.
//!
//! [`StagehandError`] covers the failures the framework surfaces to its
//! callers: using request-scoped state outside of a request, query evaluation
//! faults, configuration problems, and serialization or I/O errors.

use thiserror::Error;

/// The primary error type for the stagehand framework.
///
/// Every variant signals a programming or configuration error rather than a
/// recoverable data condition, so each one maps to HTTP 500 via
/// [`StagehandError::status_code`].
#[derive(Error, Debug)]
pub enum StagehandError {
    // ── Request scope ────────────────────────────────────────────────

    /// Request-scoped state was read outside of any request's processing scope.
    #[error("No active request context: request-scoped state was accessed outside of a request")]
    NoActiveContext,

    // ── Queries ──────────────────────────────────────────────────────

    /// An XPath expression could not be compiled or evaluated.
    #[error("Query evaluation error: {0}")]
    QueryEvaluation(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl StagehandError {
    /// Returns the HTTP status code associated with this error.
    ///
    /// None of these errors are caused by the client, so all of them map
    /// to 500.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NoActiveContext
            | Self::QueryEvaluation(_)
            | Self::ConfigurationError(_)
            | Self::SerializationError(_)
            | Self::IoError(_) => 500,
        }
    }
}

/// A convenience type alias for `Result<T, StagehandError>`.
pub type StagehandResult<T> = Result<T, StagehandError>;
