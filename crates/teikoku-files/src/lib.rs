#![warn(missing_docs)]

//! In-memory file staging for teikoku
//!
//! Loads whole files into owned buffers, keeps them in a path-deduplicated
//! registry and flushes them back to where they came from on demand.

pub mod config;
pub mod error;
pub mod format;
pub mod handle;
pub mod models;
pub mod record;
pub mod registry;
pub mod service;

// Re-export public API
pub use self::config::{ConfigLoader, StagingConfig};
pub use error::{ConfigError, Result, StagingError};
pub use format::format_byte_count;
pub use handle::{FileHandle, LocalFileHandle, ReadStream, ReadWriteStream};
pub use models::{
    FileDetails, HandleMetadata, RecordChange, RecordField, RecordState, Staged, StagingNotice,
    WriteOutcome,
};
pub use record::{ChangeObserver, FileRecord};
pub use registry::FileRegistry;
pub use service::StagingService;
