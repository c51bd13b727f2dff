//! Display and persistence of the winning result.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::worker::VanityResult;

/// Default file the result record is appended to.
pub const DEFAULT_LOG_FILE: &str = "add.txt";

/// Failure to persist a record. Never fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Formats the persisted record: address, auxiliary number, attempts and
/// elapsed seconds, one per line, followed by a blank line.
///
/// The private key is never written.
pub fn format_record(result: &VanityResult) -> String {
    format!(
        "{}\n{}\n{}\n{:.2}\n\n",
        result.address,
        result.aux_random,
        result.attempts,
        result.elapsed_secs()
    )
}

/// Appends one record block to `path`, creating the file if needed.
pub fn append_record(path: &Path, result: &VanityResult) -> Result<(), ReportError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| ReportError::Open {
            path: path.to_path_buf(),
            source,
        })?;

    file.write_all(format_record(result).as_bytes())
        .map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes the human-readable summary of a run.
pub fn write_summary<W: Write>(out: &mut W, result: &VanityResult) -> io::Result<()> {
    let elapsed = result.elapsed_secs();
    let rate = if elapsed > 0.0 {
        result.attempts as f64 / elapsed
    } else {
        0.0
    };

    writeln!(out, "Time elapsed: {:.2}s", elapsed)?;
    writeln!(out, "Attempts:     {}", result.attempts)?;
    writeln!(out, "Speed:        {:.2} addresses/s", rate)?;
    writeln!(out, "Address:      {}", result.address)?;
    writeln!(out, "Private Key:  {}", result.private_key)?;
    writeln!(out, "Random:       {}", result.aux_random)?;
    writeln!(out, "Worker:       {}", result.worker_id)
}

/// Formats large counts for progress lines (e.g. `1.50M`).
pub fn format_number(n: u64) -> String {
    if n >= 1_000_000_000 {
        format!("{:.2}B", n as f64 / 1_000_000_000.0)
    } else if n >= 1_000_000 {
        format!("{:.2}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.2}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::time::Duration;

    use super::*;

    fn sample() -> VanityResult {
        VanityResult {
            address: "0x00aa000000000000000000000000000000000000".into(),
            private_key: "11".repeat(32),
            aux_random: "beef".into(),
            attempts: 1234,
            elapsed: Duration::from_millis(1500),
            worker_id: 2,
        }
    }

    #[test]
    fn test_record_format() {
        assert_eq!(
            format_record(&sample()),
            "0x00aa000000000000000000000000000000000000\nbeef\n1234\n1.50\n\n"
        );
    }

    #[test]
    fn test_append_keeps_previous_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("add.txt");

        append_record(&path, &sample()).unwrap();
        append_record(&path, &sample()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, format_record(&sample()).repeat(2));
        assert!(!content.contains(&sample().private_key));
    }

    #[test]
    fn test_open_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("add.txt");

        let err = append_record(&path, &sample()).unwrap_err();
        assert!(matches!(err, ReportError::Open { .. }));
    }

    #[test]
    fn test_summary_lists_every_field() {
        let mut out = Vec::new();
        write_summary(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("Time elapsed: 1.50s"));
        assert!(text.contains("Attempts:     1234"));
        assert!(text.contains(&sample().private_key));
        assert!(text.contains("Random:       beef"));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1_500), "1.50K");
        assert_eq!(format_number(2_000_000), "2.00M");
        assert_eq!(format_number(3_250_000_000), "3.25B");
    }
}
