use serde::Serialize;
use tokio::sync::oneshot;

use crate::error::{EngineError, FailureCategory, FetchError};
use crate::language::fallback_languages;

/// One screening request waiting in the queue.
///
/// The response sender is consumed by the single write a worker makes, so a
/// job can never be answered twice.
#[derive(Debug)]
pub struct Job {
    pub identifier: String,
    pub languages: Vec<String>,
    pub respond_to: oneshot::Sender<Verdict>,
}

impl Job {
    /// Build a job and the receiver its caller waits on.
    pub fn new(
        identifier: &str,
        preferred_language: Option<&str>,
    ) -> Result<(Self, oneshot::Receiver<Verdict>), EngineError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(EngineError::InvalidJob("empty identifier".to_string()));
        }

        let (respond_to, receiver) = oneshot::channel();
        let job = Job {
            identifier: identifier.to_string(),
            languages: fallback_languages(preferred_language),
            respond_to,
        };
        Ok((job, receiver))
    }
}

/// Why a job produced no screening result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    pub category: FailureCategory,
    pub message: String,
}

impl Failure {
    pub fn new(category: FailureCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
        }
    }

    /// Summarize a job whose every language came up empty.
    ///
    /// `last_error` is the error from the final attempt that ran, or `None`
    /// if no attempt ran at all.
    pub fn exhausted(
        identifier: &str,
        languages: &[String],
        last_error: Option<&FetchError>,
    ) -> Self {
        let Some(err) = last_error else {
            return Self::new(
                FailureCategory::NotFound,
                format!(
                    "No transcripts found for video {} in any of the attempted languages: {:?}",
                    identifier, languages
                ),
            );
        };

        let message = match err {
            FetchError::NotFound(_) => format!(
                "No captions/transcripts are available for video {}. \
                 This video may not have auto-generated or manual captions enabled.",
                identifier
            ),
            FetchError::Private(_) => format!(
                "Video {} is private and transcripts cannot be accessed.",
                identifier
            ),
            FetchError::Forbidden(_) => {
                format!("Video {} is unavailable or has been removed.", identifier)
            }
            FetchError::Transient(_) | FetchError::Other(_) => {
                format!("Failed to fetch transcripts for video {}: {}", identifier, err)
            }
        };

        Self::new(FailureCategory::from(err.kind()), message)
    }

    /// A resolve step that crashed instead of returning.
    pub fn internal(identifier: &str, detail: impl std::fmt::Display) -> Self {
        Self::new(
            FailureCategory::Other,
            format!("Internal error while processing video {}: {}", identifier, detail),
        )
    }
}

/// The single outcome delivered for a [`Job`].
///
/// `flagged` only means something when `failure` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub identifier: String,
    pub flagged: bool,
    pub failure: Option<Failure>,
}

impl Verdict {
    pub fn screened(identifier: &str, flagged: bool) -> Self {
        Self {
            identifier: identifier.to_string(),
            flagged,
            failure: None,
        }
    }

    pub fn failed(identifier: &str, failure: Failure) -> Self {
        Self {
            identifier: identifier.to_string(),
            flagged: false,
            failure: Some(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    pub fn category(&self) -> Option<FailureCategory> {
        self.failure.as_ref().map(|f| f.category)
    }
}
