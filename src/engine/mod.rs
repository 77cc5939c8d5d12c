//! Job dispatch and retry engine.
//!
//! Request handlers call [`Engine::submit`], which queues a [`Job`] on the
//! [`Dispatcher`] and waits for its [`Verdict`]. A fixed [`WorkerPool`] drains
//! the queue; every upstream call passes the shared [`RateGate`] first.
//!
//! - `job`: jobs, verdicts and failure summaries
//! - `dispatcher`: bounded FIFO queue shared by the workers
//! - `rate_gate`: global upstream cadence
//! - `worker`: language fallback and retry loop
//! - `pool`: worker supervisor
//! - `handle`: the `Engine` entry point

mod dispatcher;
mod handle;
mod job;
mod pool;
mod rate_gate;
mod worker;

pub use dispatcher::Dispatcher;
pub use handle::{Engine, EngineConfig};
pub use job::{Failure, Job, Verdict};
pub use pool::WorkerPool;
pub use rate_gate::RateGate;
pub use worker::{Resolver, Worker};
