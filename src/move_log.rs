//! The plain-text record of an executing run.
//!
//! Each completed move becomes one line of `<target>/logs/organizer.log`:
//!
//! ```text
//! 2026-10-19T14:03:11.482+02:00 MOVED a.pdf -> PDFs/a.pdf
//! ```
//!
//! The whole file is written once, after every move succeeded, and replaces
//! the log of any previous run.

use crate::file_organizer::{OrganizeError, OrganizeResult};
use chrono::{DateTime, Local, SecondsFormat};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the reserved subdirectory holding the log.
pub const LOG_DIR_NAME: &str = "logs";

/// File name of the log inside [`LOG_DIR_NAME`].
pub const LOG_FILE_NAME: &str = "organizer.log";

/// One completed move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    /// File name of the moved file before the move.
    pub source_name: String,
    /// Destination relative to the target folder, `/`-separated.
    pub destination: String,
}

impl LogEntry {
    /// Creates an entry stamped with the current local time.
    pub fn now(source_name: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            source_name: source_name.into(),
            destination: destination.into(),
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} MOVED {} -> {}",
            self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, false),
            self.source_name,
            self.destination
        )
    }
}

/// Entries accumulated during one executing run.
#[derive(Debug, Clone, Default)]
pub struct MoveLog {
    entries: Vec<LogEntry>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `<target>/logs/organizer.log`.
    pub fn log_file_path(target: &Path) -> PathBuf {
        target.join(LOG_DIR_NAME).join(LOG_FILE_NAME)
    }

    /// Renders all entries, one per line.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{}\n", entry))
            .collect()
    }

    /// Writes the log under `target`, creating the `logs` directory if needed
    /// and overwriting any previous log. Returns the path written.
    pub fn write(&self, target: &Path) -> OrganizeResult<PathBuf> {
        let log_dir = target.join(LOG_DIR_NAME);
        fs::create_dir_all(&log_dir).map_err(|e| OrganizeError::DirectoryCreationFailed {
            path: log_dir.clone(),
            source: e,
        })?;

        let log_path = Self::log_file_path(target);
        fs::write(&log_path, self.render()).map_err(|e| OrganizeError::LogWriteFailed {
            path: log_path.clone(),
            source: e,
        })?;

        Ok(log_path)
    }
}
