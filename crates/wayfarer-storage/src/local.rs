use crate::naming::candidate_name;
use crate::root::{MediaRoot, NamingPolicy};
use crate::sanitize::{validate_file_name, validate_segment};
use crate::traits::{MediaFile, MediaStore, StorageError, StorageResult, TransientFile};
use async_trait::async_trait;
use futures::StreamExt;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::fs;

/// Upper bound on `-n` suffixes tried for one upload before giving up.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Local filesystem media store
///
/// Layout: `{base_path}/{root}/{segment}/{file_name}`.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    base_path: PathBuf,
}

impl LocalMediaStore {
    /// Create a new LocalMediaStore, creating the base directory and every media root.
    ///
    /// # Arguments
    /// * `base_path` - Directory holding all media roots (e.g., "./uploads")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        for root in MediaRoot::ALL {
            let dir = base_path.join(root.dir_name());
            fs::create_dir_all(&dir).await.map_err(|e| {
                StorageError::ConfigError(format!(
                    "Failed to create media directory {}: {}",
                    dir.display(),
                    e
                ))
            })?;
        }

        Ok(LocalMediaStore { base_path })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Absolute directory of a media root
    pub fn root_dir(&self, root: MediaRoot) -> PathBuf {
        self.base_path.join(root.dir_name())
    }

    fn folder_path(&self, root: MediaRoot, segment: &str) -> StorageResult<PathBuf> {
        validate_segment(segment)?;
        Ok(self.root_dir(root).join(segment))
    }

    /// Claim a free name in `folder` by creating it exclusively.
    ///
    /// The empty placeholder is replaced by the moved upload.
    async fn reserve(
        folder: &Path,
        policy: NamingPolicy,
        file: &TransientFile,
    ) -> StorageResult<(String, PathBuf)> {
        let millis = chrono::Utc::now().timestamp_millis();

        for seq in 0..MAX_NAME_ATTEMPTS {
            let name = candidate_name(policy, &file.field_name, &file.original_name, millis, seq);
            let dest = folder.join(&name);
            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&dest)
                .await
            {
                Ok(_) => return Ok((name, dest)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(StorageError::WriteFailed(format!(
                        "Failed to create file {}: {}",
                        dest.display(),
                        e
                    )))
                }
            }
        }

        Err(StorageError::WriteFailed(format!(
            "No free file name for {} in {}",
            file.original_name,
            folder.display()
        )))
    }

    /// Move a transient file over its reserved destination.
    ///
    /// Rename first; across filesystems fall back to copy and remove.
    async fn move_into(temp: TempPath, dest: &Path) -> StorageResult<()> {
        let target = dest.to_path_buf();
        let persisted = tokio::task::spawn_blocking(move || temp.persist(&target))
            .await
            .map_err(|e| StorageError::WriteFailed(format!("Move task failed: {}", e)))?;

        let err = match persisted {
            Ok(()) => return Ok(()),
            Err(err) => err,
        };

        tracing::debug!(
            dest = %dest.display(),
            error = %err.error,
            "Rename failed, copying upload instead"
        );

        let source = err.path;
        fs::copy(&source, dest).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to copy {} to {}: {}",
                source.display(),
                dest.display(),
                e
            ))
        })?;

        if let Err(e) = source.close() {
            tracing::warn!(error = %e, "Failed to remove transient file after copy");
        }

        Ok(())
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn ensure(&self, root: MediaRoot, segment: &str) -> StorageResult<PathBuf> {
        let path = self.folder_path(root, segment)?;

        fs::create_dir_all(&path).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to create folder {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::debug!(root = %root, segment = %segment, "Media folder ready");

        Ok(path)
    }

    async fn ingest(
        &self,
        root: MediaRoot,
        segment: &str,
        files: Vec<TransientFile>,
    ) -> StorageResult<Vec<String>> {
        let folder = self.ensure(root, segment).await?;
        let start = std::time::Instant::now();
        let file_count = files.len();
        let mut stored = Vec::with_capacity(file_count);

        for file in files {
            let (name, dest) = Self::reserve(&folder, root.naming_policy(), &file).await?;

            if let Err(e) = Self::move_into(file.path, &dest).await {
                // Drop the empty placeholder; earlier files in this call stay.
                let _ = fs::remove_file(&dest).await;
                tracing::error!(
                    root = %root,
                    segment = %segment,
                    file_name = %name,
                    moved = stored.len(),
                    error = %e,
                    "Media ingest failed"
                );
                return Err(e);
            }

            stored.push(format!("{}/{}", segment, name));
        }

        tracing::info!(
            root = %root,
            segment = %segment,
            file_count = file_count,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Media ingest successful"
        );

        Ok(stored)
    }

    async fn resolve(
        &self,
        root: MediaRoot,
        key: &str,
        file_name: &str,
    ) -> StorageResult<MediaFile> {
        let file_name = file_name.trim();
        let not_found = || StorageError::NotFound(format!("{}/{}/{}", root, key, file_name));

        let segment = root.sanitize(key).map_err(|_| not_found())?;
        validate_file_name(file_name).map_err(|_| not_found())?;

        let root_dir = self.root_dir(root);
        let path = root_dir.join(&segment).join(file_name);

        let metadata = match fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => return Err(not_found()),
        };

        let base_canonical = fs::canonicalize(&root_dir).await.map_err(|e| {
            StorageError::ConfigError(format!("Failed to canonicalize media root: {}", e))
        })?;
        let canonical = fs::canonicalize(&path).await.map_err(|_| not_found())?;
        if canonical.strip_prefix(&base_canonical).is_err() {
            tracing::warn!(
                root = %root,
                segment = %segment,
                file_name = %file_name,
                "Media path resolves outside its root"
            );
            return Err(not_found());
        }

        let file = fs::File::open(&canonical).await.map_err(|_| not_found())?;
        let stream = tokio_util::io::ReaderStream::new(file).map(|chunk| chunk.map_err(StorageError::from));

        let content_type = mime_guess::from_path(&canonical)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        tracing::debug!(
            root = %root,
            segment = %segment,
            file_name = %file_name,
            size_bytes = metadata.len(),
            "Media file resolved"
        );

        Ok(MediaFile {
            file_name: file_name.to_string(),
            content_type,
            content_length: metadata.len(),
            stream: Box::pin(stream),
        })
    }

    async fn discard(&self, root: MediaRoot, stored_paths: &[String]) -> usize {
        let mut removed = 0;

        for stored in stored_paths {
            let (segment, file_name) = match root.split_stored_path(stored) {
                Ok(parts) => parts,
                Err(e) => {
                    tracing::warn!(root = %root, stored = %stored, error = %e, "Skipping malformed stored path");
                    continue;
                }
            };

            let path = self.root_dir(root).join(segment).join(file_name);
            match fs::remove_file(&path).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "Failed to discard media file");
                }
            }
        }

        if removed > 0 {
            tracing::info!(root = %root, removed = removed, "Discarded replaced media files");
        }

        removed
    }

    async fn remove_folder(&self, root: MediaRoot, segment: &str) -> StorageResult<()> {
        let path = self.folder_path(root, segment)?;
        let start = std::time::Instant::now();

        match fs::remove_dir_all(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(StorageError::WriteFailed(format!(
                    "Failed to remove folder {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        tracing::info!(
            root = %root,
            segment = %segment,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Media folder removed"
        );

        Ok(())
    }
}
