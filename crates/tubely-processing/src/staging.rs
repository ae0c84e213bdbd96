//! Request-scoped local files.
//!
//! [`StagedUpload`] holds an incoming upload on disk while it is probed and remuxed.
//! [`ScratchFile`] owns a derived file such as the remux output. Both remove their file
//! when dropped, so every exit path of a request cleans up, including unwinding.

use std::io::SeekFrom;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncSeekExt, AsyncWriteExt};

const STAGING_PREFIX: &str = "tubely-upload";

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("failed to create staging file: {0}")]
    Create(#[source] std::io::Error),

    #[error("failed to write staging file: {0}")]
    Write(#[source] std::io::Error),

    #[error("staging file already finished")]
    Finished,
}

/// An upload staged to a private temporary file.
pub struct StagedUpload {
    // Dropped before `file`, so the handle is closed before the path is removed.
    handle: Option<File>,
    file: NamedTempFile,
    size: u64,
}

impl StagedUpload {
    /// Create an empty staging file in `dir`, or the system temp dir when `None`.
    pub fn create(dir: Option<&Path>, suffix: &str) -> Result<Self, StagingError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX).suffix(suffix);
        let file = match dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(StagingError::Create)?;

        let handle = file.reopen().map_err(StagingError::Create)?;

        tracing::debug!(path = %file.path().display(), "Staging file created");

        Ok(StagedUpload {
            handle: Some(File::from_std(handle)),
            file,
            size: 0,
        })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Bytes written so far.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), StagingError> {
        let handle = self.handle.as_mut().ok_or(StagingError::Finished)?;
        handle.write_all(chunk).await.map_err(StagingError::Write)?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    /// Flush everything to disk and rewind to byte 0 so the file can be re-read.
    pub async fn finish(&mut self) -> Result<(), StagingError> {
        let handle = self.handle.as_mut().ok_or(StagingError::Finished)?;
        handle.flush().await.map_err(StagingError::Write)?;
        handle.sync_all().await.map_err(StagingError::Write)?;
        handle
            .seek(SeekFrom::Start(0))
            .await
            .map_err(StagingError::Write)?;
        tracing::debug!(path = %self.path().display(), size_bytes = self.size, "Upload staged");
        Ok(())
    }
}

impl Drop for StagedUpload {
    fn drop(&mut self) {
        drop(self.handle.take());
        tracing::debug!(path = %self.file.path().display(), "Removing staging file");
    }
}

/// Removes the file at `path`, if any, when dropped.
#[derive(Debug)]
pub struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Scratch file removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "Failed to remove scratch file")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entries(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    #[tokio::test]
    async fn test_staged_upload_write_and_finish() {
        let dir = TempDir::new().unwrap();
        let mut staged = StagedUpload::create(Some(dir.path()), ".mp4").unwrap();

        staged.write_chunk(b"hello ").await.unwrap();
        staged.write_chunk(b"world").await.unwrap();
        staged.finish().await.unwrap();

        assert_eq!(staged.size(), 11);
        let name = staged.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("tubely-upload"));
        assert!(name.ends_with(".mp4"));
        assert_eq!(tokio::fs::read(staged.path()).await.unwrap(), b"hello world");
    }

    #[tokio::test]
    async fn test_staged_upload_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let staged = StagedUpload::create(Some(dir.path()), ".mp4").unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);

        assert!(!path.exists());
        assert_eq!(entries(&dir), 0);
    }

    #[tokio::test]
    async fn test_staged_upload_removed_on_panic() {
        let dir = TempDir::new().unwrap();
        let dir_path = dir.path().to_path_buf();

        let result = tokio::spawn(async move {
            let mut staged = StagedUpload::create(Some(&dir_path), ".mp4").unwrap();
            staged.write_chunk(b"partial").await.unwrap();
            panic!("handler blew up");
        })
        .await;

        assert!(result.is_err());
        assert_eq!(entries(&dir), 0);
    }

    #[tokio::test]
    async fn test_write_after_drop_of_handle_fails() {
        let dir = TempDir::new().unwrap();
        let mut staged = StagedUpload::create(Some(dir.path()), ".mp4").unwrap();
        staged.handle.take();
        assert!(matches!(
            staged.write_chunk(b"x").await,
            Err(StagingError::Finished)
        ));
    }

    #[test]
    fn test_scratch_file_removed_on_drop() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("upload.mp4.processing");
        std::fs::write(&path, b"remuxed").unwrap();

        drop(ScratchFile::new(&path));

        assert!(!path.exists());
    }

    #[test]
    fn test_scratch_file_missing_is_fine() {
        let dir = TempDir::new().unwrap();
        let scratch = ScratchFile::new(dir.path().join("never-created"));
        assert!(!scratch.path().exists());
        drop(scratch);
    }
}
