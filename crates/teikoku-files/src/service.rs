//! Load, reload and write-back of staged files
//!
//! The StagingService turns file handles into [`FileRecord`]s and flushes
//! their buffers back. A record is only ever produced whole: loads build a new
//! record and hand it out after the stream is closed, so a failed or dropped
//! operation leaves whatever the caller held untouched.

use std::io::SeekFrom;
use std::sync::Arc;
use std::time::Instant;

use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tracing::{debug, info};

use crate::config::StagingConfig;
use crate::error::{Result, StagingError};
use crate::handle::{FileHandle, LocalFileHandle};
use crate::models::{HandleMetadata, RecordState, Staged, StagingNotice, WriteOutcome};
use crate::record::FileRecord;

/// Orchestrates stream IO against file handles
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use teikoku_files::{FileRegistry, LocalFileHandle, StagingService};
///
/// let service = StagingService::new();
/// let handle = LocalFileHandle::open("notes.txt").await?;
/// let staged = service.load(Arc::new(handle)).await?;
/// let mut registry = FileRegistry::new();
/// registry.insert(staged.value);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StagingService {
    truncate_on_write_back: bool,
}

impl StagingService {
    /// Creates a service that writes back without truncating
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a service honouring the write-back settings of `config`
    pub fn with_config(config: &StagingConfig) -> Self {
        Self {
            truncate_on_write_back: config.truncate_on_write_back,
        }
    }

    /// Reads the whole file behind `handle` into a new record
    ///
    /// # Returns
    ///
    /// A loaded record with `loaded_bytes` equal to the stream size. A
    /// zero-length file still loads, flagged with [`StagingNotice::EmptyStream`].
    pub async fn load(&self, handle: Arc<dyn FileHandle>) -> Result<Staged<FileRecord>> {
        self.load_into(FileRecord::new(), handle).await
    }

    /// Reads the file behind `record` again
    ///
    /// The returned record replaces `record`, which is left as it was; observers
    /// subscribed to `record` carry over.
    pub async fn reload(&self, record: &FileRecord) -> Result<Staged<FileRecord>> {
        let handle = Self::handle_for(record)?;
        self.load_into(FileRecord::with_observers(record.observers()), handle)
            .await
    }

    /// Writes the buffer of `record` back to the file it was loaded from
    ///
    /// Does nothing when no bytes were loaded, so an empty record can never
    /// truncate its source.
    pub async fn write_back(&self, record: &FileRecord) -> Result<Staged<WriteOutcome>> {
        let handle = Self::handle_for(record)?;
        self.write_back_to(record, handle.as_ref()).await
    }

    /// Writes the buffer of `record` to `target` starting at offset 0
    pub async fn write_back_to(
        &self,
        record: &FileRecord,
        target: &dyn FileHandle,
    ) -> Result<Staged<WriteOutcome>> {
        let started = Instant::now();
        let path = target.path();

        if record.loaded_bytes() == 0 {
            debug!("Nothing loaded, skipping write-back: {}", path.display());
            return Ok(Staged {
                value: WriteOutcome::Skipped,
                elapsed: started.elapsed(),
                notice: None,
            });
        }

        let buffer = record.buffer();
        let io_err = |e| StagingError::io(path, e);

        let mut stream = target.open_read_write().await?;
        stream.seek(SeekFrom::Start(0)).await.map_err(io_err)?;
        stream.write_all(buffer).await.map_err(io_err)?;
        stream.flush().await.map_err(io_err)?;
        stream.shutdown().await.map_err(io_err)?;
        drop(stream);
        debug!("Closed read-write stream: {}", path.display());

        if self.truncate_on_write_back {
            target.truncate(buffer.len() as u64).await?;
        }

        let elapsed = started.elapsed();
        info!(
            "Write operations completed in: {:?} ({} bytes to {})",
            elapsed,
            buffer.len(),
            path.display()
        );

        Ok(Staged {
            value: WriteOutcome::Written {
                bytes: buffer.len() as u64,
            },
            elapsed,
            notice: None,
        })
    }

    /// Whether the file changed on disk since `record` was loaded
    ///
    /// Compares the current size and modification time with those captured
    /// before the last load read the file. A bound record that was never
    /// loaded is always stale, and one whose load lost its modification time
    /// is stale whenever the handle reports one. An unbound record is an
    /// error.
    pub async fn is_stale(&self, record: &FileRecord) -> Result<bool> {
        let handle = Self::handle_for(record)?;
        if record.state() != RecordState::Loaded {
            return Ok(true);
        }

        let meta = handle.metadata().await?;
        let resized = meta.size != record.loaded_bytes();
        let touched = meta.modified.is_some() && meta.modified != record.modified_at();
        Ok(resized || touched)
    }

    async fn load_into(
        &self,
        mut record: FileRecord,
        handle: Arc<dyn FileHandle>,
    ) -> Result<Staged<FileRecord>> {
        let started = Instant::now();
        debug!(
            "Beginning file load and read operations: {}",
            handle.path().display()
        );

        // Captured before reading so an edit racing the read shows up as stale
        let metadata = handle.metadata().await.ok();
        let buffer = read_whole(handle.as_ref()).await?;
        let metadata = metadata.map(|meta| settle_metadata(meta, buffer.len() as u64));

        record.bind(handle);
        record.set_loaded_bytes(buffer.len() as u64);
        record.set_buffer(buffer);
        record.mark_loaded(metadata);

        let elapsed = started.elapsed();
        let notice = (record.loaded_bytes() == 0).then_some(StagingNotice::EmptyStream);
        if notice.is_some() {
            debug!("Source stream is empty, staged an empty buffer");
        }
        info!(
            "Read operations completed in: {:?} ({} from {})",
            elapsed,
            record.formatted_size(),
            record.formatted_path()
        );

        Ok(Staged {
            value: record,
            elapsed,
            notice,
        })
    }

    fn handle_for(record: &FileRecord) -> Result<Arc<dyn FileHandle>> {
        if let Some(handle) = record.handle() {
            return Ok(Arc::clone(handle));
        }
        record
            .path()
            .map(|path| Arc::new(LocalFileHandle::new(path)) as Arc<dyn FileHandle>)
            .ok_or(StagingError::Unbound)
    }
}

/// Forgets the modification time when the size moved between the metadata
/// snapshot and the read
fn settle_metadata(meta: HandleMetadata, read: u64) -> HandleMetadata {
    if meta.size == read {
        return meta;
    }
    debug!(
        "File size moved from {} to {} bytes during load, modification time unknown",
        meta.size, read
    );
    HandleMetadata {
        size: read,
        modified: None,
        ..meta
    }
}

/// Reads exactly as many bytes as the stream reports; a short read is an error
async fn read_whole(handle: &dyn FileHandle) -> Result<Vec<u8>> {
    let path = handle.path();
    let io_err = |e| StagingError::io(path, e);

    let mut stream = handle.open_read().await?;
    let size = stream.seek(SeekFrom::End(0)).await.map_err(io_err)?;
    stream.seek(SeekFrom::Start(0)).await.map_err(io_err)?;

    let len = usize::try_from(size).map_err(|_| {
        io_err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("stream of {size} bytes does not fit in memory"),
        ))
    })?;

    let mut buffer = vec![0u8; len];
    stream.read_exact(&mut buffer).await.map_err(io_err)?;
    drop(stream);
    debug!("Closed read stream: {}", path.display());

    Ok(buffer)
}
