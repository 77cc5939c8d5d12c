//! Upstream transcript access.
//!
//! [`TranscriptSource`] is the seam between the worker pool and whatever
//! actually serves captions. [`HttpTranscriptSource`] talks to a timedtext
//! style endpoint and classifies every failure into a [`FetchError`].

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use crate::error::FetchError;

/// One caption cue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptSegment {
    pub start_ms: u64,
    pub duration_ms: u64,
    pub text: String,
}

impl TranscriptSegment {
    pub fn new(start_ms: u64, duration_ms: u64, text: impl Into<String>) -> Self {
        Self {
            start_ms,
            duration_ms,
            text: text.into(),
        }
    }
}

/// Fetches the transcript of one video in one language.
///
/// An empty `Ok` is allowed; the worker treats it the same as
/// [`FetchError::NotFound`].
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    async fn fetch(
        &self,
        video_id: &str,
        language: &str,
    ) -> std::result::Result<Vec<TranscriptSegment>, FetchError>;
}

/// Render segments as plain text without timestamps.
pub fn format_plain(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|s| s.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// json3 timedtext payload
#[derive(Debug, Deserialize)]
struct TimedTextResponse {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedTextEvent {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<TimedTextSeg>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSeg {
    #[serde(default)]
    utf8: String,
}

/// HTTP-backed [`TranscriptSource`].
#[derive(Debug, Clone)]
pub struct HttpTranscriptSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTranscriptSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36")
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }
}

#[async_trait]
impl TranscriptSource for HttpTranscriptSource {
    async fn fetch(
        &self,
        video_id: &str,
        language: &str,
    ) -> std::result::Result<Vec<TranscriptSegment>, FetchError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("v", video_id), ("lang", language), ("fmt", "json3")])
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, video_id, language, &body));
        }

        let body = response
            .bytes()
            .await
            .map_err(classify_transport_error)?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(captions_not_found(video_id, language));
        }

        let parsed: TimedTextResponse = serde_json::from_slice(&body).map_err(|e| {
            FetchError::Other(format!(
                "failed to parse transcript for video {} ({}): {}",
                video_id, language, e
            ))
        })?;

        let segments: Vec<TranscriptSegment> = parsed
            .events
            .into_iter()
            .filter_map(|event| {
                let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
                let text = text.trim();
                if text.is_empty() {
                    None
                } else {
                    Some(TranscriptSegment::new(
                        event.t_start_ms,
                        event.d_duration_ms,
                        text,
                    ))
                }
            })
            .collect();

        if segments.is_empty() {
            return Err(captions_not_found(video_id, language));
        }

        debug!(
            "Fetched {} caption segments for video {} ({})",
            segments.len(),
            video_id,
            language
        );
        Ok(segments)
    }
}

fn captions_not_found(video_id: &str, language: &str) -> FetchError {
    FetchError::NotFound(format!(
        "captions not found for video {} in language {}",
        video_id, language
    ))
}

fn classify_status(status: StatusCode, video_id: &str, language: &str, body: &str) -> FetchError {
    match status.as_u16() {
        404 => captions_not_found(video_id, language),
        401 | 403 => FetchError::Private(format!(
            "video {} requires sign-in (HTTP {})",
            video_id, status
        )),
        410 | 451 => FetchError::Forbidden(format!(
            "video {} is unavailable (HTTP {})",
            video_id, status
        )),
        408 | 429 | 500..=599 => FetchError::Transient(format!(
            "upstream returned HTTP {} for video {} ({})",
            status, video_id, language
        )),
        _ => FetchError::from_message(format!("HTTP {}: {}", status, body.trim())),
    }
}

fn classify_transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        FetchError::Transient(err.to_string())
    } else {
        FetchError::from_message(err.to_string())
    }
}
