use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::dispatcher::Dispatcher;
use super::job::{Failure, Job, Verdict};
use super::rate_gate::RateGate;
use crate::error::{ErrorKind, FetchError};
use crate::retry::{with_retry_if, RetryConfig, Sleeper};
use crate::upstream::{format_plain, TranscriptSource};
use crate::vocabulary::Vocabulary;

/// Everything a worker needs to turn a job into a verdict.
///
/// Built once per engine and shared by every worker.
pub struct Resolver {
    source: Arc<dyn TranscriptSource>,
    vocabulary: Arc<Vocabulary>,
    gate: RateGate,
    retry: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl Resolver {
    pub fn new(
        source: Arc<dyn TranscriptSource>,
        vocabulary: Arc<Vocabulary>,
        gate: RateGate,
        retry: RetryConfig,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            source,
            vocabulary,
            gate,
            retry,
            sleeper,
        }
    }

    /// Walk the fallback languages until one yields a transcript.
    ///
    /// Each language passes the rate gate once; retries inside it only pay
    /// the backoff delay. A forbidden video stops the walk, since no other
    /// language will fare better.
    pub async fn resolve(&self, identifier: &str, languages: &[String]) -> Verdict {
        let mut last_error: Option<FetchError> = None;

        for language in languages {
            info!(
                "Attempting to fetch transcript for video {} with language: {}",
                identifier, language
            );

            self.gate.acquire().await;

            let operation_name = format!("Transcript {} [{}]", identifier, language);
            let result = with_retry_if(
                &self.retry,
                self.sleeper.as_ref(),
                &operation_name,
                || self.fetch_text(identifier, language),
                |e: &FetchError| e.kind().is_retryable(),
            )
            .await;

            match result {
                Ok(text) => {
                    let flagged = self.vocabulary.contains_flagged(&text);
                    info!(
                        "Processed transcript for video {} ({}), profanity detected: {}",
                        identifier, language, flagged
                    );
                    return Verdict::screened(identifier, flagged);
                }
                Err(e) if e.kind() == ErrorKind::Forbidden => {
                    warn!(
                        "Video {} is not accessible, skipping remaining languages: {}",
                        identifier, e
                    );
                    last_error = Some(e);
                    break;
                }
                Err(e) => {
                    debug!(
                        "No transcript for video {} in {}: {}",
                        identifier, language, e
                    );
                    last_error = Some(e);
                }
            }
        }

        let failure = Failure::exhausted(identifier, languages, last_error.as_ref());
        warn!(
            "No transcripts found for video {} after trying {} language(s): {}",
            identifier,
            languages.len(),
            failure.message
        );
        Verdict::failed(identifier, failure)
    }

    async fn fetch_text(&self, identifier: &str, language: &str) -> Result<String, FetchError> {
        let segments = self.source.fetch(identifier, language).await?;
        let text = format_plain(&segments);
        if text.is_empty() {
            return Err(FetchError::NotFound(format!(
                "captions not found for video {} in language {}",
                identifier, language
            )));
        }
        Ok(text)
    }
}

/// One pool slot: takes jobs until the queue closes.
pub struct Worker {
    id: usize,
    dispatcher: Arc<Dispatcher>,
    resolver: Arc<Resolver>,
}

impl Worker {
    pub fn new(id: usize, dispatcher: Arc<Dispatcher>, resolver: Arc<Resolver>) -> Self {
        Self {
            id,
            dispatcher,
            resolver,
        }
    }

    pub async fn run(self) {
        debug!("Worker {} started", self.id);

        while let Some(job) = self.dispatcher.take().await {
            self.handle(job).await;
        }

        debug!("Worker {} stopped: queue closed and drained", self.id);
    }

    async fn handle(&self, job: Job) {
        let Job {
            identifier,
            languages,
            respond_to,
        } = job;

        // Resolve on its own task so a panic costs one job, not the worker
        let resolver = Arc::clone(&self.resolver);
        let task_identifier = identifier.clone();
        let outcome =
            tokio::spawn(async move { resolver.resolve(&task_identifier, &languages).await })
                .await;

        let verdict = match outcome {
            Ok(verdict) => verdict,
            Err(e) => {
                error!(
                    "Worker {} failed while processing video {}: {}",
                    self.id, identifier, e
                );
                Verdict::failed(&identifier, Failure::internal(&identifier, e))
            }
        };

        if respond_to.send(verdict).is_err() {
            debug!(
                "Caller for video {} went away before the verdict was delivered",
                identifier
            );
        }
    }
}
