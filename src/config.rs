//! Runtime configuration for the vanity address search.

use std::path::PathBuf;

use clap::Parser;

use crate::report::DEFAULT_LOG_FILE;
use crate::worker::DEFAULT_WORKERS;

/// Ethereum Vanity Address Search
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Pattern: "p" followed by the prefix (e.g. p123), or the bare suffix
    /// (e.g. 123). Prompted for when omitted.
    pub pattern: Option<String>,

    /// Number of worker threads (0 = one per logical CPU)
    #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS)]
    pub workers: usize,

    /// File the result record is appended to
    #[arg(short = 'o', long, default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Do not append the result to the log file
    #[arg(long, default_value_t = false)]
    pub no_log_file: bool,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value_t = 5)]
    pub report_interval: u64,
}

impl Config {
    /// Returns the number of workers, resolving 0 to the CPU count.
    pub fn worker_count(&self) -> usize {
        match self.workers {
            0 => num_cpus::get(),
            n => n,
        }
    }

    /// Returns the file to persist to, if persistence is enabled.
    pub fn log_path(&self) -> Option<&PathBuf> {
        (!self.no_log_file).then_some(&self.log_file)
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.report_interval == 0 {
            return Err(ConfigError::InvalidInterval);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("report interval must be at least one second")]
    InvalidInterval,
}
