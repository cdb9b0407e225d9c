// Interactive staging session: registry plus the focused record

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use teikoku_files::{
    FileDetails, FileRecord, FileRegistry, LocalFileHandle, Result, StagingConfig, StagingError,
    StagingNotice, StagingService, WriteOutcome,
};
use tracing::{debug, info};

/// What happened to a selected file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Loaded and added to the registry
    Staged {
        path: PathBuf,
        elapsed: Duration,
        notice: Option<StagingNotice>,
    },
    /// A record for this path was already staged and was kept
    AlreadyStaged { path: PathBuf },
    /// The extension filter does not offer this file
    Filtered { path: PathBuf },
}

/// Owns the registry and tracks which record the user is looking at
pub struct Session {
    service: StagingService,
    registry: FileRegistry,
    config: StagingConfig,
    focus: Option<PathBuf>,
}

impl Session {
    pub fn new(config: StagingConfig) -> Self {
        Self {
            service: StagingService::with_config(&config),
            registry: FileRegistry::new(),
            config,
            focus: None,
        }
    }

    /// Selects a file: loads it and stages it unless already staged
    ///
    /// The selected file receives focus either way.
    pub async fn select(&mut self, path: &Path) -> Result<Selection> {
        if !self.config.accepts(path) {
            debug!("Filtered out by extension: {}", path.display());
            return Ok(Selection::Filtered {
                path: path.to_path_buf(),
            });
        }

        let handle = LocalFileHandle::open(path).await?;
        let staged = self.service.load(Arc::new(handle)).await?;
        let path = staged
            .value
            .path()
            .map(Path::to_path_buf)
            .ok_or(StagingError::Unbound)?;

        self.focus = Some(path.clone());
        if self.registry.insert(staged.value) {
            Ok(Selection::Staged {
                path,
                elapsed: staged.elapsed,
                notice: staged.notice,
            })
        } else {
            Ok(Selection::AlreadyStaged { path })
        }
    }

    /// Moves focus to a staged record, returns `false` if none matches
    pub fn focus(&mut self, path: &Path) -> bool {
        let found = self.registry.find_by_path(path).is_some();
        if found {
            self.focus = Some(path.to_path_buf());
        }
        found
    }

    /// The focused record
    pub fn focused(&self) -> Option<&FileRecord> {
        self.focus
            .as_deref()
            .and_then(|path| self.registry.find_by_path(path))
    }

    /// Details of the focused record
    pub fn details(&self) -> Option<FileDetails> {
        self.focused().map(FileRecord::details)
    }

    /// Reloads the focused record and swaps it in at the same position
    pub async fn reload_focused(&mut self) -> Result<Option<Duration>> {
        let Some(record) = self.focused() else {
            return Ok(None);
        };

        let staged = self.service.reload(record).await?;
        let path = record
            .path()
            .map(Path::to_path_buf)
            .ok_or(StagingError::Unbound)?;
        self.registry.replace_at(&path, staged.value)?;
        info!("Reloaded {} in {:?}", path.display(), staged.elapsed);
        Ok(Some(staged.elapsed))
    }

    /// Flushes the focused record's buffer to its file
    pub async fn write_back_focused(&self) -> Result<Option<WriteOutcome>> {
        match self.focused() {
            Some(record) => Ok(Some(self.service.write_back(record).await?.value)),
            None => Ok(None),
        }
    }

    pub fn registry(&self) -> &FileRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;
    use tokio::fs;

    use super::*;

    #[tokio::test]
    async fn test_select_stages_and_focuses() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, vec![b'x'; 2560]).await.unwrap();

        let mut session = Session::new(StagingConfig::default());
        let selection = session.select(&path).await.unwrap();
        assert!(matches!(selection, Selection::Staged { notice: None, .. }));

        let details = session.details().unwrap();
        assert_eq!(details.size, "File Size: 2.5KB");
        assert!(details.location.ends_with("notes.txt"));
    }

    #[tokio::test]
    async fn test_select_twice_keeps_first() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        fs::write(&path, b"first").await.unwrap();

        let mut session = Session::new(StagingConfig::default());
        session.select(&path).await.unwrap();
        fs::write(&path, b"second version").await.unwrap();

        let selection = session.select(&path).await.unwrap();
        assert!(matches!(selection, Selection::AlreadyStaged { .. }));
        assert_eq!(session.registry().len(), 1);
        assert_eq!(session.focused().unwrap().buffer(), b"first");
    }

    #[tokio::test]
    async fn test_select_filtered_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("image.png");
        fs::write(&path, b"png").await.unwrap();

        let mut session = Session::new(StagingConfig {
            extension_filter: vec![".xml".to_string(), ".txt".to_string()],
            ..StagingConfig::default()
        });
        let selection = session.select(&path).await.unwrap();
        assert!(matches!(selection, Selection::Filtered { .. }));
        assert!(session.registry().is_empty());
        assert!(session.focused().is_none());
    }

    #[tokio::test]
    async fn test_select_missing_file_stages_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut session = Session::new(StagingConfig::default());

        let result = session.select(&temp_dir.path().join("missing.txt")).await;
        assert!(result.is_err());
        assert!(session.registry().is_empty());
    }

    #[tokio::test]
    async fn test_reload_focused_replaces_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let first = temp_dir.path().join("a.txt");
        let second = temp_dir.path().join("b.txt");
        fs::write(&first, b"aaa").await.unwrap();
        fs::write(&second, b"bbb").await.unwrap();

        let mut session = Session::new(StagingConfig::default());
        session.select(&first).await.unwrap();
        session.select(&second).await.unwrap();
        let first = session.registry().paths().next().unwrap().to_path_buf();
        assert!(session.focus(&first));

        fs::write(&first, b"changed on disk").await.unwrap();
        assert!(session.reload_focused().await.unwrap().is_some());

        assert_eq!(session.registry().position(&first), Some(0));
        assert_eq!(session.focused().unwrap().buffer(), b"changed on disk");
    }

    #[tokio::test]
    async fn test_write_back_focused() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.txt");
        fs::write(&path, b"original").await.unwrap();

        let mut session = Session::new(StagingConfig::default());
        session.select(&path).await.unwrap();
        fs::write(&path, b"clobbered").await.unwrap();

        let outcome = session.write_back_focused().await.unwrap();
        assert_eq!(outcome, Some(WriteOutcome::Written { bytes: 8 }));
        // No truncation by default: the extra trailing byte survives
        assert_eq!(fs::read(&path).await.unwrap(), b"originald");
    }

    #[tokio::test]
    async fn test_no_focus_means_nothing_to_do() {
        let mut session = Session::new(StagingConfig::default());
        assert!(!session.focus(Path::new("/not/staged")));
        assert_eq!(session.reload_focused().await.unwrap(), None);
        assert_eq!(session.write_back_focused().await.unwrap(), None);
        assert!(session.details().is_none());
    }
}
