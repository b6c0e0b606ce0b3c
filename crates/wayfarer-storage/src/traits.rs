//! Media store abstraction
//!
//! This module defines the `MediaStore` trait that media backends implement, plus the
//! transient upload handle the ingestor consumes.

use crate::root::MediaRoot;
use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use std::path::PathBuf;
use std::pin::Pin;
use tempfile::TempPath;
use thiserror::Error;
use wayfarer_core::AppError;

/// Media store operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for media store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Write-path mapping. Read paths map their own failures to `NotFound` before this.
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => AppError::NotFound(msg),
            StorageError::InvalidKey(msg) => AppError::InvalidInput(msg),
            StorageError::WriteFailed(msg) => AppError::StorageWrite(msg),
            StorageError::IoError(e) => AppError::StorageWrite(e.to_string()),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        }
    }
}

/// An uploaded file parked in temporary storage for the duration of one request.
///
/// The temporary file is removed when the handle is dropped, so a file that is never
/// ingested does not outlive its request.
#[derive(Debug)]
pub struct TransientFile {
    pub path: TempPath,
    /// Name the client gave the file
    pub original_name: String,
    /// Multipart field the file arrived in
    pub field_name: String,
}

impl TransientFile {
    pub fn new(
        path: TempPath,
        original_name: impl Into<String>,
        field_name: impl Into<String>,
    ) -> Self {
        TransientFile {
            path,
            original_name: original_name.into(),
            field_name: field_name.into(),
        }
    }
}

/// Byte stream of a stored file
pub type MediaStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// A resolved file, ready to be streamed to a client.
pub struct MediaFile {
    pub file_name: String,
    pub content_type: String,
    pub content_length: u64,
    pub stream: MediaStream,
}

impl std::fmt::Debug for MediaFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaFile")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Media store abstraction
///
/// All operations are scoped to one [`MediaRoot`]; a segment sanitized for one root is
/// never looked up against another. Segments passed in must already be sanitized with
/// [`MediaRoot::sanitize`]; implementations re-check them and reject anything that could
/// leave the root.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Ensure `{root}/{segment}` exists and return its absolute path.
    ///
    /// Idempotent: concurrent calls for the same folder all succeed.
    async fn ensure(&self, root: MediaRoot, segment: &str) -> StorageResult<PathBuf>;

    /// Move transient files into `{root}/{segment}` and return their stored paths,
    /// in input order.
    ///
    /// Generated names are unique within the folder even when two ingests race.
    /// On failure, files moved earlier in the same call stay in place.
    async fn ingest(
        &self,
        root: MediaRoot,
        segment: &str,
        files: Vec<TransientFile>,
    ) -> StorageResult<Vec<String>>;

    /// Open `{root}/{sanitize(key)}/{file_name}` for streaming.
    ///
    /// Returns `NotFound` when the key or file name is blank, cannot be sanitized,
    /// names something outside the folder, or the file does not exist.
    async fn resolve(&self, root: MediaRoot, key: &str, file_name: &str)
        -> StorageResult<MediaFile>;

    /// Remove previously stored files. Best effort: returns how many were removed and
    /// logs the rest.
    async fn discard(&self, root: MediaRoot, stored_paths: &[String]) -> usize;

    /// Remove `{root}/{segment}` recursively. A missing folder is not an error.
    async fn remove_folder(&self, root: MediaRoot, segment: &str) -> StorageResult<()>;
}
