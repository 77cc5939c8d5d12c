//! Shared fakes for integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use transcript_screener::engine::{Engine, EngineConfig};
use transcript_screener::error::FetchError;
use transcript_screener::retry::{RetryConfig, Sleeper};
use transcript_screener::upstream::{TranscriptSegment, TranscriptSource};
use transcript_screener::vocabulary::Vocabulary;

pub type Reply = Result<Vec<TranscriptSegment>, FetchError>;

/// Scripted upstream keyed by (video id, language).
///
/// Unscripted calls return NotFound, except video ids starting with `echo-`,
/// which return the id itself as the transcript, and `panic`, which panics.
#[derive(Default)]
pub struct ScriptedSource {
    replies: Mutex<HashMap<(String, String), VecDeque<Reply>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, video_id: &str, language: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .entry((video_id.to_string(), language.to_string()))
            .or_default()
            .push_back(reply);
        self
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_for(&self, video_id: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|(id, _)| id == video_id)
            .map(|(_, lang)| lang)
            .collect()
    }
}

#[async_trait]
impl TranscriptSource for ScriptedSource {
    async fn fetch(&self, video_id: &str, language: &str) -> Reply {
        self.calls
            .lock()
            .unwrap()
            .push((video_id.to_string(), language.to_string()));

        if video_id == "panic" {
            panic!("adapter blew up");
        }

        let scripted = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&(video_id.to_string(), language.to_string()))
            .and_then(VecDeque::pop_front);

        match scripted {
            Some(reply) => reply,
            None if video_id.starts_with("echo-") => {
                Ok(vec![TranscriptSegment::new(0, 1000, video_id)])
            }
            None => Err(FetchError::NotFound("captions not found".to_string())),
        }
    }
}

/// Records backoff delays and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

pub fn text(line: &str) -> Reply {
    Ok(vec![TranscriptSegment::new(0, 1000, line)])
}

/// Engine with no rate-gate delay and the production retry schedule.
pub fn fast_config(worker_count: usize) -> EngineConfig {
    EngineConfig::default()
        .with_worker_count(worker_count)
        .with_queue_capacity(16)
        .with_rate_interval(Duration::ZERO)
        .with_retry(RetryConfig::transcript_fetch())
}

pub fn start_engine(
    config: EngineConfig,
    source: Arc<ScriptedSource>,
    words: &[&str],
) -> (Engine, Arc<RecordingSleeper>) {
    let sleeper = Arc::new(RecordingSleeper::default());
    let engine = Engine::start_with_sleeper(
        config,
        source,
        Arc::new(Vocabulary::from_words(words)),
        sleeper.clone(),
    );
    (engine, sleeper)
}
