use anyhow::{bail, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub port: u16,

    // Vocabulary
    pub wordlist_path: String,

    // Upstream
    pub upstream_base_url: String,
    pub upstream_timeout: Duration,

    // Worker pool
    pub worker_count: usize,
    pub queue_capacity: usize,
    pub rate_interval: Duration,

    // Retry
    pub max_retries: u32,
    pub backoff_base: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let config = Self {
            // Server
            port: env_or("PORT", 8080),

            // Vocabulary
            wordlist_path: std::env::var("WORDLIST_PATH")
                .unwrap_or_else(|_| "eng.txt".to_string()),

            // Upstream
            upstream_base_url: std::env::var("UPSTREAM_BASE_URL")
                .unwrap_or_else(|_| "https://www.youtube.com/api/timedtext".to_string()),
            upstream_timeout: Duration::from_secs(env_or("UPSTREAM_TIMEOUT_SECS", 10)),

            // Worker pool
            worker_count: env_or("WORKER_COUNT", 5),
            queue_capacity: env_or("QUEUE_CAPACITY", 100),
            rate_interval: Duration::from_millis(env_or("RATE_INTERVAL_MS", 2000)),

            // Retry
            max_retries: env_or("MAX_RETRIES", 3),
            backoff_base: Duration::from_millis(env_or("BACKOFF_BASE_MS", 2000)),
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.worker_count == 0 {
            bail!("WORKER_COUNT must be at least 1");
        }
        if self.queue_capacity == 0 {
            bail!("QUEUE_CAPACITY must be at least 1");
        }
        if self.max_retries == 0 {
            bail!("MAX_RETRIES must be at least 1");
        }
        Ok(())
    }
}

/// Parse an environment variable, falling back to `default` when unset or unparsable.
fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
