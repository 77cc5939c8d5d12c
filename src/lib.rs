//! Transcript screening service.
//!
//! Fetches a video's captions through a rate-limited worker pool, trying a
//! list of fallback languages with per-language retries, and reports whether
//! the transcript contains any word from a flagged vocabulary.

pub mod config;
pub mod engine;
pub mod error;
pub mod language;
pub mod retry;
pub mod server;
pub mod upstream;
pub mod vocabulary;
