//! Error taxonomy for upstream transcript fetches and the dispatch engine.
//!
//! Every upstream failure is reduced to one [`ErrorKind`] before the worker
//! decides whether to retry, move on to the next language, or give up on the
//! job entirely. Callers of the engine only ever see a [`FailureCategory`].

use serde::Serialize;
use thiserror::Error;

/// Classification of a single upstream attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// No captions exist for the requested language.
    NotFound,
    /// Network hiccup, timeout or throttling; the same language may work later.
    Transient,
    /// The content is private, removed or otherwise inaccessible in every language.
    Forbidden,
    /// Anything the adapter could not classify.
    Other,
}

impl ErrorKind {
    /// Whether another attempt at the same language is worthwhile.
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Transient | ErrorKind::Other)
    }

    /// Classify a free-text error message.
    ///
    /// Adapters that expose structured status information should classify from
    /// that instead; this is the fallback for upstreams that only hand back a
    /// human-readable string.
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_lowercase();

        if ["timeout", "timed out", "connection", "network", "temporary"]
            .iter()
            .any(|needle| lower.contains(needle))
        {
            return ErrorKind::Transient;
        }

        if lower.contains("captions not found") || lower.contains("no captions") {
            return ErrorKind::NotFound;
        }

        if lower.contains("private") || lower.contains("unavailable") {
            return ErrorKind::Forbidden;
        }

        ErrorKind::Other
    }
}

/// A classified failure returned by a [`TranscriptSource`](crate::upstream::TranscriptSource).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("captions not found: {0}")]
    NotFound(String),

    #[error("temporary upstream failure: {0}")]
    Transient(String),

    #[error("content is private: {0}")]
    Private(String),

    #[error("content not accessible: {0}")]
    Forbidden(String),

    #[error("upstream error: {0}")]
    Other(String),
}

impl FetchError {
    /// Build an error from a raw message using [`ErrorKind::from_message`].
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        match ErrorKind::from_message(&message) {
            ErrorKind::NotFound => FetchError::NotFound(message),
            ErrorKind::Transient => FetchError::Transient(message),
            ErrorKind::Forbidden if message.to_lowercase().contains("private") => {
                FetchError::Private(message)
            }
            ErrorKind::Forbidden => FetchError::Forbidden(message),
            ErrorKind::Other => FetchError::Other(message),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::NotFound(_) => ErrorKind::NotFound,
            FetchError::Transient(_) => ErrorKind::Transient,
            FetchError::Private(_) | FetchError::Forbidden(_) => ErrorKind::Forbidden,
            FetchError::Other(_) => ErrorKind::Other,
        }
    }
}

/// Failure category preserved in a job's verdict.
///
/// The HTTP layer maps these onto 404, 403 and 500 respectively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    NotFound,
    Forbidden,
    Other,
}

impl From<ErrorKind> for FailureCategory {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => FailureCategory::NotFound,
            ErrorKind::Forbidden => FailureCategory::Forbidden,
            ErrorKind::Transient | ErrorKind::Other => FailureCategory::Other,
        }
    }
}

/// Errors surfaced by [`Engine::submit`](crate::engine::Engine::submit).
///
/// These never describe an upstream failure; those are carried inside the
/// verdict. They only cover jobs the engine could not accept or answer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid job: {0}")]
    InvalidJob(String),

    #[error("engine is shut down and no longer accepts jobs")]
    Closed,

    #[error("worker dropped the job without responding")]
    WorkerGone,
}
