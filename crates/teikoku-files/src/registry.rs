//! Ordered collection of staged records, unique by path

use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Result, StagingError};
use crate::record::FileRecord;

/// Staged records in insertion order
///
/// Lookups are linear scans; a registry holds the handful of files a user
/// picked, not a directory tree.
#[derive(Debug, Default)]
pub struct FileRegistry {
    records: Vec<FileRecord>,
}

impl FileRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` unless one with the same path is already held
    ///
    /// A duplicate path leaves the existing record in place and drops the new
    /// one, even if its content is fresher. Unbound records are rejected.
    ///
    /// # Returns
    ///
    /// `true` if the record was appended
    pub fn insert(&mut self, record: FileRecord) -> bool {
        let Some(path) = record.path() else {
            warn!("Rejected insert of a record with no path");
            return false;
        };

        if self.position(path).is_some() {
            debug!("Record already staged, keeping existing: {}", path.display());
            return false;
        }

        debug!("Staged record: {}", path.display());
        self.records.push(record);
        true
    }

    /// Replaces the record staged for `path`, keeping its position
    ///
    /// # Returns
    ///
    /// The record that was replaced
    pub fn replace_at(&mut self, path: &Path, record: FileRecord) -> Result<FileRecord> {
        let index = self
            .position(path)
            .ok_or_else(|| StagingError::NotRegistered(path.to_path_buf()))?;

        match record.path() {
            Some(found) if found == path => {}
            found => {
                return Err(StagingError::PathMismatch {
                    expected: path.to_path_buf(),
                    found: found.map(Path::to_path_buf).unwrap_or_default(),
                })
            }
        }

        debug!("Replaced record at index {}: {}", index, path.display());
        Ok(std::mem::replace(&mut self.records[index], record))
    }

    /// Looks up the record staged for `path`
    pub fn find_by_path(&self, path: &Path) -> Option<&FileRecord> {
        self.records.iter().find(|r| r.path() == Some(path))
    }

    /// Mutable lookup of the record staged for `path`
    pub fn find_by_path_mut(&mut self, path: &Path) -> Option<&mut FileRecord> {
        self.records.iter_mut().find(|r| r.path() == Some(path))
    }

    /// Removes and returns the record staged for `path`
    pub fn remove(&mut self, path: &Path) -> Option<FileRecord> {
        let index = self.position(path)?;
        debug!("Removed record: {}", path.display());
        Some(self.records.remove(index))
    }

    /// Index of the record staged for `path`
    pub fn position(&self, path: &Path) -> Option<usize> {
        self.records.iter().position(|r| r.path() == Some(path))
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> {
        self.records.iter()
    }

    /// Paths in insertion order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.records.iter().filter_map(FileRecord::path)
    }

    /// Number of staged records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing is staged
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a FileRegistry {
    type Item = &'a FileRecord;
    type IntoIter = std::slice::Iter<'a, FileRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
