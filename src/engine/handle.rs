use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, info};

use super::dispatcher::Dispatcher;
use super::job::{Job, Verdict};
use super::pool::WorkerPool;
use super::rate_gate::RateGate;
use super::worker::Resolver;
use crate::config::Config;
use crate::error::EngineError;
use crate::retry::{RetryConfig, Sleeper, TokioSleeper};
use crate::upstream::TranscriptSource;
use crate::vocabulary::Vocabulary;

/// Sizing and pacing of an [`Engine`].
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub rate_interval: Duration,
    pub retry: RetryConfig,
}

impl EngineConfig {
    pub fn with_worker_count(mut self, worker_count: usize) -> Self {
        self.worker_count = worker_count;
        self
    }

    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity;
        self
    }

    pub fn with_rate_interval(mut self, rate_interval: Duration) -> Self {
        self.rate_interval = rate_interval;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            worker_count: 5,
            queue_capacity: 100,
            rate_interval: Duration::from_secs(2),
            retry: RetryConfig::transcript_fetch(),
        }
    }
}

impl From<&Config> for EngineConfig {
    fn from(config: &Config) -> Self {
        Self {
            worker_count: config.worker_count,
            queue_capacity: config.queue_capacity,
            rate_interval: config.rate_interval,
            retry: RetryConfig::new(config.max_retries, config.backoff_base),
        }
    }
}

/// Handle to the dispatch engine: the queue, the worker pool and the shared
/// rate gate they all pass through.
///
/// Cheap to share behind an `Arc`; every request handler submits through the
/// same instance.
pub struct Engine {
    dispatcher: Arc<Dispatcher>,
    pool: Mutex<Option<WorkerPool>>,
}

impl Engine {
    /// Start the engine with real backoff sleeps.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        config: EngineConfig,
        source: Arc<dyn TranscriptSource>,
        vocabulary: Arc<Vocabulary>,
    ) -> Self {
        Self::start_with_sleeper(config, source, vocabulary, Arc::new(TokioSleeper))
    }

    /// Start the engine with a caller-provided backoff [`Sleeper`].
    ///
    /// # Panics
    /// Panics if `config.queue_capacity` is 0
    pub fn start_with_sleeper(
        config: EngineConfig,
        source: Arc<dyn TranscriptSource>,
        vocabulary: Arc<Vocabulary>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let dispatcher = Arc::new(Dispatcher::new(config.queue_capacity));
        let resolver = Arc::new(Resolver::new(
            source,
            vocabulary,
            RateGate::new(config.rate_interval),
            config.retry,
            sleeper,
        ));
        let pool = WorkerPool::start(config.worker_count, Arc::clone(&dispatcher), resolver);

        Self {
            dispatcher,
            pool: Mutex::new(Some(pool)),
        }
    }

    /// Queue a screening job and wait for its verdict.
    ///
    /// Upstream failures come back inside the [`Verdict`]; `Err` only means
    /// the job was rejected or the engine stopped.
    pub async fn submit(
        &self,
        identifier: &str,
        preferred_language: Option<&str>,
    ) -> Result<Verdict, EngineError> {
        let (job, response) = Job::new(identifier, preferred_language)?;
        debug!(
            "Queueing video {} with {} candidate language(s)",
            job.identifier,
            job.languages.len()
        );

        self.dispatcher.submit(job).await?;
        response.await.map_err(|_| EngineError::WorkerGone)
    }

    /// Stop accepting jobs, finish the queued ones and wait for every worker.
    ///
    /// Calling it again is a no-op.
    pub async fn shutdown(&self) {
        self.dispatcher.close();

        let pool = self
            .pool
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if let Some(pool) = pool {
            info!("Draining {} workers", pool.len());
            pool.join().await;
        }
    }
}
