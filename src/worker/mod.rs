//! Worker pool for parallel vanity address search.
//!
//! This module provides:
//! - Multi-threaded CPU workers polling a shared completion flag
//! - Exactly-once delivery of the first match
//! - A shared, lock-free attempt counter

mod cpu;
mod pool;
mod signal;

pub use pool::{search, SearchStatus, StopHandle, VanityResult, WorkerPool, DEFAULT_WORKERS};
pub use signal::MatchSignal;
