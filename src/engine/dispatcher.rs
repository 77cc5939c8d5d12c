use std::sync::{PoisonError, RwLock};
use tokio::sync::{mpsc, Mutex};

use super::job::Job;
use crate::error::EngineError;

/// Bounded FIFO of pending jobs shared by every worker.
///
/// `submit` waits while the queue is full. Workers `take` through a fair
/// mutex around the single receiver, so jobs leave in the order they arrived.
#[derive(Debug)]
pub struct Dispatcher {
    sender: RwLock<Option<mpsc::Sender<Job>>>,
    receiver: Mutex<mpsc::Receiver<Job>>,
}

impl Dispatcher {
    /// # Panics
    /// Panics if `capacity` is 0
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Dispatcher capacity must be > 0");
        let (sender, receiver) = mpsc::channel(capacity);
        Self {
            sender: RwLock::new(Some(sender)),
            receiver: Mutex::new(receiver),
        }
    }

    /// Enqueue a job, waiting for room if the queue is full.
    pub async fn submit(&self, job: Job) -> Result<(), EngineError> {
        // Clone out of the lock so the wait for capacity happens unlocked
        let sender = self
            .sender
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or(EngineError::Closed)?;

        sender.send(job).await.map_err(|_| EngineError::Closed)
    }

    /// Wait for the next job. Returns `None` once the queue is closed and drained.
    pub async fn take(&self) -> Option<Job> {
        self.receiver.lock().await.recv().await
    }

    /// Stop accepting jobs. Jobs already queued are still handed out.
    pub fn close(&self) {
        self.sender
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn job(id: &str) -> Job {
        Job::new(id, Some("fr")).expect("Should build job").0
    }

    #[tokio::test]
    async fn test_take_returns_jobs_in_submission_order() {
        let dispatcher = Dispatcher::new(10);
        for id in ["a", "b", "c"] {
            dispatcher.submit(job(id)).await.expect("Should enqueue");
        }

        let mut taken = Vec::new();
        for _ in 0..3 {
            taken.push(dispatcher.take().await.expect("Job queued").identifier);
        }
        assert_eq!(taken, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_submit_blocks_when_full() {
        let dispatcher = Arc::new(Dispatcher::new(1));
        dispatcher.submit(job("first")).await.expect("Should enqueue");

        let blocked = {
            let dispatcher = Arc::clone(&dispatcher);
            tokio::spawn(async move { dispatcher.submit(job("second")).await })
        };

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!blocked.is_finished(), "submit should wait for capacity");

        assert_eq!(dispatcher.take().await.unwrap().identifier, "first");
        blocked.await.unwrap().expect("Should enqueue once space frees up");
        assert_eq!(dispatcher.take().await.unwrap().identifier, "second");
    }

    #[tokio::test]
    async fn test_close_rejects_new_jobs_but_drains_queued_ones() {
        let dispatcher = Dispatcher::new(4);
        dispatcher.submit(job("queued")).await.expect("Should enqueue");

        dispatcher.close();
        assert_eq!(
            dispatcher.submit(job("late")).await.unwrap_err(),
            EngineError::Closed
        );

        assert_eq!(dispatcher.take().await.unwrap().identifier, "queued");
        assert!(dispatcher.take().await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_takers_each_get_distinct_jobs() {
        let dispatcher = Arc::new(Dispatcher::new(32));
        for i in 0..20 {
            dispatcher.submit(job(&format!("job-{}", i))).await.unwrap();
        }
        dispatcher.close();

        let mut handles = Vec::new();
        for _ in 0..4 {
            let dispatcher = Arc::clone(&dispatcher);
            handles.push(tokio::spawn(async move {
                let mut ids = Vec::new();
                while let Some(job) = dispatcher.take().await {
                    ids.push(job.identifier);
                }
                ids
            }));
        }

        let mut all: Vec<String> = Vec::new();
        for handle in handles {
            all.extend(handle.await.unwrap());
        }
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 20);
    }

    #[test]
    #[should_panic(expected = "capacity must be > 0")]
    fn test_zero_capacity_panics() {
        let _ = Dispatcher::new(0);
    }
}
