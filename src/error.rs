//! Error types shared across the search engine.

use std::io;

/// Errors that abort a search run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The operating system random source could not produce bytes.
    #[error("entropy source unavailable: {0}")]
    Entropy(#[from] rand::Error),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[source] io::Error),

    #[error("failed to read pattern: {0}")]
    Input(#[source] io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
