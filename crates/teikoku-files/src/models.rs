//! Data models shared by the staging components

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a [`FileRecord`](crate::record::FileRecord)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordState {
    /// No file has been bound yet
    Unbound,
    /// A path is set but nothing has been loaded
    Bound,
    /// The buffer holds the result of a load
    Loaded,
}

/// Field of a record that an observer can be told about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordField {
    /// The file path (and its formatted form)
    Path,
    /// Number of bytes read on the last load
    LoadedBytes,
    /// Size of the loaded buffer
    SizeBytes,
    /// Display string for the size
    FormattedSize,
    /// The in-memory buffer
    Buffer,
}

/// Notification that a field of a record changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordChange {
    /// Path of the record, `None` while unbound
    pub path: Option<PathBuf>,
    /// Which field changed
    pub field: RecordField,
}

/// Informational conditions that do not fail an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagingNotice {
    /// The source stream was zero bytes long; the record holds an empty buffer
    EmptyStream,
}

/// Result of a write-back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteOutcome {
    /// Nothing was loaded, the target was not opened
    Skipped,
    /// The whole buffer was written at offset 0
    Written {
        /// Number of bytes written
        bytes: u64,
    },
}

/// Value produced by a staging operation together with its wall-clock time
#[derive(Debug)]
pub struct Staged<T> {
    /// The operation's result
    pub value: T,
    /// Time spent between opening and closing the stream
    pub elapsed: Duration,
    /// Non-fatal condition raised by the operation
    pub notice: Option<StagingNotice>,
}

impl<T> Staged<T> {
    /// Discards timing information and returns the value
    pub fn into_value(self) -> T {
        self.value
    }
}

/// Metadata reported by a file handle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HandleMetadata {
    /// Size of the file in bytes
    pub size: u64,
    /// Creation time, when the platform records it
    pub created: Option<DateTime<Utc>>,
    /// Last modification time
    pub modified: Option<DateTime<Utc>>,
}

/// Display strings for a staged record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDetails {
    /// `"File Location: <path>"`
    pub location: String,
    /// `"File Size: <formatted size>"`
    pub size: String,
    /// Creation time of the file, if known
    pub created: Option<DateTime<Utc>>,
}

impl fmt::Display for FileDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.location)?;
        write!(f, "{}", self.size)?;
        if let Some(created) = self.created {
            write!(f, "\nFile Created: {}", created.to_rfc3339())?;
        }
        Ok(())
    }
}
