//! In-memory record of one staged file

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::format::format_unsigned;
use crate::handle::FileHandle;
use crate::models::{FileDetails, HandleMetadata, RecordChange, RecordField, RecordState};

const LOCATION_PREFIX: &str = "File Location: ";
const SIZE_PREFIX: &str = "File Size: ";

/// Receives field change notifications from a [`FileRecord`]
pub trait ChangeObserver: Send + Sync {
    /// Called after `change.field` was updated
    fn on_change(&self, change: &RecordChange);
}

impl<F> ChangeObserver for F
where
    F: Fn(&RecordChange) + Send + Sync,
{
    fn on_change(&self, change: &RecordChange) {
        self(change)
    }
}

/// Metadata and owned byte buffer of one staged file
///
/// `size_bytes` and `formatted_size` are derived from `loaded_bytes` and only
/// change through [`FileRecord::set_loaded_bytes`].
#[derive(Clone)]
pub struct FileRecord {
    path: Option<PathBuf>,
    formatted_path: String,
    handle: Option<Arc<dyn FileHandle>>,
    loaded_bytes: u64,
    size_bytes: u64,
    formatted_size: String,
    buffer: Vec<u8>,
    created_at: Option<DateTime<Utc>>,
    modified_at: Option<DateTime<Utc>>,
    loaded_at: Option<DateTime<Utc>>,
    observers: Vec<Arc<dyn ChangeObserver>>,
}

impl FileRecord {
    /// Creates an unbound record with an empty buffer
    pub fn new() -> Self {
        FileRecord {
            path: None,
            formatted_path: LOCATION_PREFIX.to_string(),
            handle: None,
            loaded_bytes: 0,
            size_bytes: 0,
            formatted_size: format_unsigned(0),
            buffer: Vec::new(),
            created_at: None,
            modified_at: None,
            loaded_at: None,
            observers: Vec::new(),
        }
    }

    /// Creates an unbound record that reports to the given observers
    pub(crate) fn with_observers(observers: Vec<Arc<dyn ChangeObserver>>) -> Self {
        FileRecord {
            observers,
            ..FileRecord::new()
        }
    }

    /// Binds the record to a file handle and takes over its path
    pub fn bind(&mut self, handle: Arc<dyn FileHandle>) {
        let path = handle.path().to_path_buf();
        self.handle = Some(handle);
        self.set_path(path);
    }

    /// Sets the file path
    ///
    /// A bound handle pointing elsewhere is released; operations on the record
    /// then address the new path on the local filesystem.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if self
            .handle
            .as_ref()
            .is_some_and(|handle| handle.path() != path)
        {
            self.handle = None;
        }
        self.formatted_path = format!("{}{}", LOCATION_PREFIX, path.display());
        self.path = Some(path);
        self.notify(RecordField::Path);
    }

    /// Records how many bytes the last load read
    ///
    /// Updates the size and its display string in the same call, so no
    /// observer ever sees them disagree.
    pub fn set_loaded_bytes(&mut self, loaded_bytes: u64) {
        self.loaded_bytes = loaded_bytes;
        self.size_bytes = loaded_bytes;
        self.formatted_size = format_unsigned(loaded_bytes);

        self.notify(RecordField::LoadedBytes);
        self.notify(RecordField::SizeBytes);
        self.notify(RecordField::FormattedSize);
    }

    /// Replaces the buffer wholesale; size fields are left alone
    pub fn set_buffer(&mut self, buffer: Vec<u8>) {
        self.buffer = buffer;
        debug!("Buffer set with byte length of: {}", self.buffer.len());
        self.notify(RecordField::Buffer);
    }

    /// Registers an observer for field changes
    pub fn subscribe(&mut self, observer: impl ChangeObserver + 'static) {
        self.observers.push(Arc::new(observer));
    }

    pub(crate) fn observers(&self) -> Vec<Arc<dyn ChangeObserver>> {
        self.observers.clone()
    }

    pub(crate) fn mark_loaded(&mut self, metadata: Option<HandleMetadata>) {
        if let Some(meta) = metadata {
            self.created_at = meta.created;
            self.modified_at = meta.modified;
        }
        self.loaded_at = Some(Utc::now());
    }

    /// Path of the staged file, `None` while unbound
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// `"File Location: <path>"`
    pub fn formatted_path(&self) -> &str {
        &self.formatted_path
    }

    /// Handle the record was bound with, if any
    pub fn handle(&self) -> Option<&Arc<dyn FileHandle>> {
        self.handle.as_ref()
    }

    /// Bytes read by the most recent load
    pub fn loaded_bytes(&self) -> u64 {
        self.loaded_bytes
    }

    /// Size of the loaded buffer in bytes
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Human-readable size, e.g. `"2.5KB"`
    pub fn formatted_size(&self) -> &str {
        &self.formatted_size
    }

    /// The staged bytes
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    /// Creation time of the file when it was loaded
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Modification time of the file when it was loaded
    pub fn modified_at(&self) -> Option<DateTime<Utc>> {
        self.modified_at
    }

    /// When the buffer was last filled
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Current lifecycle state
    pub fn state(&self) -> RecordState {
        if self.loaded_at.is_some() {
            RecordState::Loaded
        } else if self.path.is_some() {
            RecordState::Bound
        } else {
            RecordState::Unbound
        }
    }

    /// Display strings for a details view
    pub fn details(&self) -> FileDetails {
        FileDetails {
            location: self.formatted_path.clone(),
            size: format!("{}{}", SIZE_PREFIX, self.formatted_size),
            created: self.created_at,
        }
    }

    fn notify(&self, field: RecordField) {
        debug!(?field, path = ?self.path, "Record field changed");
        if self.observers.is_empty() {
            return;
        }
        let change = RecordChange {
            path: self.path.clone(),
            field,
        };
        for observer in &self.observers {
            observer.on_change(&change);
        }
    }
}

impl Default for FileRecord {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FileRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileRecord")
            .field("path", &self.path)
            .field("loaded_bytes", &self.loaded_bytes)
            .field("formatted_size", &self.formatted_size)
            .field("buffer_len", &self.buffer.len())
            .field("loaded_at", &self.loaded_at)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::handle::LocalFileHandle;

    fn recorder() -> (Arc<Mutex<Vec<RecordField>>>, impl ChangeObserver + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let observer = move |change: &RecordChange| sink.lock().unwrap().push(change.field);
        (seen, observer)
    }

    #[test]
    fn test_new_record_is_unbound() {
        let record = FileRecord::new();
        assert_eq!(record.state(), RecordState::Unbound);
        assert_eq!(record.path(), None);
        assert_eq!(record.formatted_size(), "0B");
        assert!(record.buffer().is_empty());
    }

    #[test]
    fn test_bind_sets_path_and_handle() {
        let mut record = FileRecord::new();
        record.bind(Arc::new(LocalFileHandle::new("/data/report.xml")));

        assert_eq!(record.state(), RecordState::Bound);
        assert_eq!(record.path(), Some(Path::new("/data/report.xml")));
        assert_eq!(record.formatted_path(), "File Location: /data/report.xml");
        assert!(record.handle().is_some());
    }

    #[test]
    fn test_set_path_to_other_file_releases_handle() {
        let mut record = FileRecord::new();
        record.bind(Arc::new(LocalFileHandle::new("/data/a.txt")));
        record.set_path("/data/b.txt");

        assert!(record.handle().is_none());
        assert_eq!(record.path(), Some(Path::new("/data/b.txt")));
    }

    #[test]
    fn test_set_loaded_bytes_updates_derived_fields() {
        let mut record = FileRecord::new();
        record.set_loaded_bytes(2560);

        assert_eq!(record.loaded_bytes(), 2560);
        assert_eq!(record.size_bytes(), 2560);
        assert_eq!(record.formatted_size(), "2.5KB");

        record.set_loaded_bytes(0);
        assert_eq!(record.size_bytes(), 0);
        assert_eq!(record.formatted_size(), "0B");
    }

    #[test]
    fn test_set_buffer_leaves_size_alone() {
        let mut record = FileRecord::new();
        record.set_buffer(vec![1, 2, 3]);

        assert_eq!(record.buffer(), &[1, 2, 3]);
        assert_eq!(record.loaded_bytes(), 0);
        assert_eq!(record.formatted_size(), "0B");
    }

    #[test]
    fn test_observer_sees_each_field_change() {
        let (seen, observer) = recorder();
        let mut record = FileRecord::new();
        record.subscribe(observer);

        record.set_path("/data/a.txt");
        record.set_loaded_bytes(10);
        record.set_buffer(vec![0; 10]);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                RecordField::Path,
                RecordField::LoadedBytes,
                RecordField::SizeBytes,
                RecordField::FormattedSize,
                RecordField::Buffer,
            ]
        );
        assert_eq!(record.size_bytes(), 10);
        assert_eq!(record.formatted_size(), "10B");
    }

    #[test]
    fn test_details_and_state_after_mark_loaded() {
        let mut record = FileRecord::new();
        record.set_path("/data/a.txt");
        record.set_loaded_bytes(2560);
        record.mark_loaded(None);

        assert_eq!(record.state(), RecordState::Loaded);
        let details = record.details();
        assert_eq!(details.location, "File Location: /data/a.txt");
        assert_eq!(details.size, "File Size: 2.5KB");
        assert_eq!(details.created, None);
    }

    #[test]
    fn test_with_observers_carries_subscriptions() {
        let (seen, observer) = recorder();
        let mut record = FileRecord::new();
        record.subscribe(observer);

        let mut fresh = FileRecord::with_observers(record.observers());
        fresh.set_path("/data/b.txt");
        assert_eq!(*seen.lock().unwrap(), vec![RecordField::Path]);
    }
}
