//! File handles: the capability to open streams to one file
//!
//! A handle is what a picker hands to the staging core. The core never opens
//! paths on its own; every stream it reads or writes comes from a handle, so
//! alternative backends (or failing ones in tests) plug in here.

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncRead, AsyncSeek, AsyncWrite};
use tracing::debug;

use crate::error::{Result, StagingError};
use crate::models::HandleMetadata;

/// Seekable read stream returned by [`FileHandle::open_read`]
pub trait ReadStream: AsyncRead + AsyncSeek + Unpin + Send {}

impl<T> ReadStream for T where T: AsyncRead + AsyncSeek + Unpin + Send {}

/// Seekable read-write stream returned by [`FileHandle::open_read_write`]
pub trait ReadWriteStream: AsyncRead + AsyncWrite + AsyncSeek + Unpin + Send {}

impl<T> ReadWriteStream for T where T: AsyncRead + AsyncWrite + AsyncSeek + Unpin + Send {}

/// External handle identifying a file and able to open streams to it
#[async_trait]
pub trait FileHandle: Send + Sync + Debug {
    /// Absolute path of the file
    fn path(&self) -> &Path;

    /// Opens a read-only stream positioned at the start of the file
    async fn open_read(&self) -> Result<Box<dyn ReadStream>>;

    /// Opens a read-write stream without truncating the file
    async fn open_read_write(&self) -> Result<Box<dyn ReadWriteStream>>;

    /// Current size and timestamps of the file
    async fn metadata(&self) -> Result<HandleMetadata>;

    /// Truncates or extends the file to `len` bytes
    async fn truncate(&self, len: u64) -> Result<()>;

    /// Size of the file if it can be determined without opening a stream
    async fn size_hint(&self) -> Option<u64> {
        self.metadata().await.ok().map(|meta| meta.size)
    }
}

/// Handle to a file on the local filesystem
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalFileHandle {
    path: PathBuf,
}

impl LocalFileHandle {
    /// Wraps a path as-is
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Resolves `path` to its canonical absolute form
    ///
    /// Fails with an IO error when the file does not exist, which is what a
    /// picker selecting a missing file should report.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let resolved = fs::canonicalize(path)
            .await
            .map_err(|e| StagingError::io(path, e))?;
        Ok(Self::new(resolved))
    }
}

#[async_trait]
impl FileHandle for LocalFileHandle {
    fn path(&self) -> &Path {
        &self.path
    }

    async fn open_read(&self) -> Result<Box<dyn ReadStream>> {
        let file = fs::File::open(&self.path)
            .await
            .map_err(|e| StagingError::io(&self.path, e))?;
        debug!("Opened read stream: {}", self.path.display());
        Ok(Box::new(file))
    }

    async fn open_read_write(&self) -> Result<Box<dyn ReadWriteStream>> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&self.path)
            .await
            .map_err(|e| StagingError::io(&self.path, e))?;
        debug!("Opened read-write stream: {}", self.path.display());
        Ok(Box::new(file))
    }

    async fn metadata(&self) -> Result<HandleMetadata> {
        let meta = fs::metadata(&self.path)
            .await
            .map_err(|e| StagingError::io(&self.path, e))?;

        Ok(HandleMetadata {
            size: meta.len(),
            created: meta.created().ok().map(chrono::DateTime::from),
            modified: meta.modified().ok().map(chrono::DateTime::from),
        })
    }

    async fn truncate(&self, len: u64) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .await
            .map_err(|e| StagingError::io(&self.path, e))?;
        file.set_len(len)
            .await
            .map_err(|e| StagingError::io(&self.path, e))
    }
}
