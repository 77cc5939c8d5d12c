use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{error, info};

use super::dispatcher::Dispatcher;
use super::worker::{Resolver, Worker};

/// Fixed set of workers draining one dispatcher.
#[derive(Debug)]
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn exactly `worker_count` workers on the current tokio runtime.
    pub fn start(
        worker_count: usize,
        dispatcher: Arc<Dispatcher>,
        resolver: Arc<Resolver>,
    ) -> Self {
        let handles = (0..worker_count)
            .map(|id| {
                let worker = Worker::new(id, Arc::clone(&dispatcher), Arc::clone(&resolver));
                tokio::spawn(worker.run())
            })
            .collect();

        info!("Started worker pool with {} workers", worker_count);
        Self { handles }
    }

    pub(crate) fn len(&self) -> usize {
        self.handles.len()
    }

    /// Wait for every worker to exit. Workers exit once their dispatcher is
    /// closed and drained.
    pub async fn join(self) {
        let results = futures::future::join_all(self.handles).await;
        for result in results {
            if let Err(e) = result {
                error!("Worker task ended abnormally: {}", e);
            }
        }
        info!("Worker pool stopped");
    }
}
