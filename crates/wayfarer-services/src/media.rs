//! Entity media orchestration shared by the content services.

use std::future::Future;
use std::sync::Arc;
use wayfarer_core::AppError;
use wayfarer_db::{Condition, Filter};
use wayfarer_storage::{
    reap, ImageUpdatePolicy, MediaFile, MediaRoot, MediaStore, ReapOutcome, SegmentPolicy,
    StorageError, TransientFile,
};

/// Field holding stored image paths on every media-owning record
pub const IMAGES_FIELD: &str = "images";

/// Records of one type that still keep `segment` alive: a key that sanitizes to the
/// segment, or an image stored under the folder.
///
/// Stored keys are already trimmed, so verbatim roots compare the key exactly.
pub fn folder_users(root: MediaRoot, key_field: &str, segment: &str) -> Filter {
    let same_key = match root.segment_policy() {
        SegmentPolicy::Underscore => {
            Condition::EqUnderscored(key_field.to_string(), segment.to_string())
        }
        SegmentPolicy::Verbatim => Condition::Eq(key_field.to_string(), segment.into()),
    };
    Filter::new().any(vec![
        same_key,
        Condition::ElementPrefix(IMAGES_FIELD.to_string(), format!("{}/", segment)),
    ])
}

/// Merge newly stored images into a record's list according to the root's policy.
/// Returns the paths that are no longer referenced.
pub fn merge_images(root: MediaRoot, current: &mut Vec<String>, added: Vec<String>) -> Vec<String> {
    if added.is_empty() {
        return Vec::new();
    }
    match root.update_policy() {
        ImageUpdatePolicy::Append => {
            current.extend(added);
            Vec::new()
        }
        ImageUpdatePolicy::Replace => std::mem::replace(current, added),
    }
}

#[derive(Clone)]
pub struct MediaService {
    store: Arc<dyn MediaStore>,
}

impl MediaService {
    pub fn new(store: Arc<dyn MediaStore>) -> Self {
        Self { store }
    }

    /// Folder segment for a raw entity key. Unusable keys are a validation error.
    pub fn segment(&self, root: MediaRoot, raw_key: &str) -> Result<String, AppError> {
        root.sanitize(raw_key)
            .map_err(|e| AppError::InvalidInput(format!("Invalid {} key: {}", root, e)))
    }

    /// Sanitize the key and make sure its folder exists.
    pub async fn provision(&self, root: MediaRoot, raw_key: &str) -> Result<String, AppError> {
        let segment = self.segment(root, raw_key)?;
        self.store.ensure(root, &segment).await?;
        Ok(segment)
    }

    pub async fn ingest(
        &self,
        root: MediaRoot,
        segment: &str,
        files: Vec<TransientFile>,
    ) -> Result<Vec<String>, AppError> {
        if files.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.store.ingest(root, segment, files).await?)
    }

    /// Provision the folder for `raw_key` and ingest `files` into it.
    pub async fn store_images(
        &self,
        root: MediaRoot,
        raw_key: &str,
        files: Vec<TransientFile>,
    ) -> Result<Vec<String>, AppError> {
        let segment = self.provision(root, raw_key).await?;
        self.ingest(root, &segment, files).await
    }

    pub async fn resolve(
        &self,
        root: MediaRoot,
        key: &str,
        file_name: &str,
    ) -> Result<MediaFile, AppError> {
        self.store
            .resolve(root, key, file_name)
            .await
            .map_err(|e| match e {
                StorageError::NotFound(_) | StorageError::InvalidKey(_) => {
                    AppError::NotFound("Image not found".to_string())
                }
                other => other.into(),
            })
    }

    /// Best effort removal of images a record no longer references.
    pub async fn discard(&self, root: MediaRoot, stored_paths: &[String]) {
        if !stored_paths.is_empty() {
            self.store.discard(root, stored_paths).await;
        }
    }

    /// Every folder a record occupies: its key's folder first, then each distinct folder
    /// its images live in. Images can outlive a key rename.
    pub fn occupied_segments(
        &self,
        root: MediaRoot,
        raw_key: &str,
        images: &[String],
    ) -> Vec<String> {
        let mut segments = Vec::new();
        match root.sanitize(raw_key) {
            Ok(segment) => segments.push(segment),
            Err(e) => {
                tracing::warn!(root = %root, key = %raw_key, error = %e, "Unusable key has no folder");
            }
        }
        for path in images {
            match root.split_stored_path(path) {
                Ok((segment, _)) if !segments.iter().any(|s| s == segment) => {
                    segments.push(segment.to_string());
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(root = %root, path = %path, error = %e, "Ignoring malformed stored path");
                }
            }
        }
        segments
    }

    /// Reap each of `segments` whose folder nobody uses any more.
    ///
    /// Called after the record change is committed. Failures are logged and swallowed:
    /// the record change has already succeeded.
    pub async fn release<P, Fut>(&self, root: MediaRoot, segments: Vec<String>, still_in_use: P)
    where
        P: Fn(String) -> Fut,
        Fut: Future<Output = Result<bool, AppError>>,
    {
        for segment in segments {
            let outcome =
                reap(self.store.as_ref(), root, &segment, || still_in_use(segment.clone())).await;
            match outcome {
                Ok(ReapOutcome::Removed) => {
                    tracing::info!(root = %root, segment = %segment, "Reaped unused media folder");
                }
                Ok(ReapOutcome::Retained) => {}
                Err(e) => {
                    tracing::warn!(root = %root, segment = %segment, error = %e, "Failed to reap media folder");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use uuid::Uuid;

    #[test]
    fn test_merge_images_policies() {
        let mut images = vec!["KL01/a.jpg".to_string()];
        let dropped = merge_images(MediaRoot::TourPlans, &mut images, vec!["KL01/b.jpg".to_string()]);
        assert!(dropped.is_empty());
        assert_eq!(images, vec!["KL01/a.jpg", "KL01/b.jpg"]);

        let mut images = vec!["Goa/a.jpg".to_string()];
        let dropped = merge_images(MediaRoot::Addresses, &mut images, vec!["Goa/b.jpg".to_string()]);
        assert_eq!(dropped, vec!["Goa/a.jpg"]);
        assert_eq!(images, vec!["Goa/b.jpg"]);

        let dropped = merge_images(MediaRoot::Addresses, &mut images, Vec::new());
        assert!(dropped.is_empty());
        assert_eq!(images, vec!["Goa/b.jpg"]);
    }

    #[test]
    fn test_folder_users_matches_key_or_image() {
        let users = folder_users(MediaRoot::Addresses, "state", "Tamil_Nadu");
        let id = Uuid::new_v4();
        assert!(users.matches(id, &json!({"state": "Tamil Nadu", "images": []})));
        assert!(users.matches(id, &json!({"state": "Tamil  Nadu", "images": []})));
        assert!(users.matches(id, &json!({"state": "Kerala", "images": ["Tamil_Nadu/x.jpg"]})));
        assert!(!users.matches(id, &json!({"state": "Kerala", "images": ["Kerala/x.jpg"]})));

        let users = folder_users(MediaRoot::TourPlans, "tourCode", "KL01");
        assert!(users.matches(id, &json!({"tourCode": "KL01", "images": []})));
        assert!(!users.matches(id, &json!({"tourCode": "KL02", "images": ["KL010/x.jpg"]})));
    }

    #[tokio::test]
    async fn test_occupied_segments_include_image_folders() {
        let dir = tempfile::TempDir::new().unwrap();
        let store = wayfarer_storage::LocalMediaStore::new(dir.path().join("media"))
            .await
            .unwrap();
        let media = MediaService::new(Arc::new(store));
        let images = vec![
            "KL01/images-1.jpg".to_string(),
            "KL02/images-2.jpg".to_string(),
            "KL01/images-3.jpg".to_string(),
            "not-a-path".to_string(),
        ];

        assert_eq!(
            media.occupied_segments(MediaRoot::TourPlans, "KL02", &images),
            vec!["KL02", "KL01"]
        );
        assert_eq!(
            media.occupied_segments(MediaRoot::Addresses, "   ", &["Goa/a.jpg".to_string()]),
            vec!["Goa"]
        );
    }
}
