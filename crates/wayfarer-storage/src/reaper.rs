//! Folder reaping on entity deletion or rekeying.

use crate::root::MediaRoot;
use crate::traits::{MediaStore, StorageError};
use std::future::Future;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReapOutcome {
    /// Another record still uses the folder
    Retained,
    Removed,
}

/// Remove `{root}/{segment}` unless `still_in_use` reports a remaining owner.
///
/// The probe is awaited only here, after the caller has committed its record change,
/// so it observes committed data.
pub async fn reap<S, P, Fut, E>(
    store: &S,
    root: MediaRoot,
    segment: &str,
    still_in_use: P,
) -> Result<ReapOutcome, E>
where
    S: MediaStore + ?Sized,
    P: FnOnce() -> Fut,
    Fut: Future<Output = Result<bool, E>>,
    E: From<StorageError>,
{
    if still_in_use().await? {
        tracing::debug!(root = %root, segment = %segment, "Media folder still in use, keeping it");
        return Ok(ReapOutcome::Retained);
    }

    store.remove_folder(root, segment).await?;
    Ok(ReapOutcome::Removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalMediaStore;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_reap_respects_probe() {
        let dir = tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path()).await.unwrap();
        store.ensure(MediaRoot::Addresses, "Goa").await.unwrap();
        let folder = store.root_dir(MediaRoot::Addresses).join("Goa");

        let outcome = reap(&store, MediaRoot::Addresses, "Goa", || async {
            Ok::<_, StorageError>(true)
        })
        .await
        .unwrap();
        assert_eq!(outcome, ReapOutcome::Retained);
        assert!(folder.is_dir());

        let outcome = reap(&store, MediaRoot::Addresses, "Goa", || async {
            Ok::<_, StorageError>(false)
        })
        .await
        .unwrap();
        assert_eq!(outcome, ReapOutcome::Removed);
        assert!(!folder.exists());
    }

    #[tokio::test]
    async fn test_probe_failure_keeps_folder() {
        let dir = tempdir().unwrap();
        let store = LocalMediaStore::new(dir.path()).await.unwrap();
        store.ensure(MediaRoot::Places, "Munnar").await.unwrap();

        let result = reap(&store, MediaRoot::Places, "Munnar", || async {
            Err::<bool, _>(StorageError::ConfigError("probe unavailable".to_string()))
        })
        .await;

        assert!(result.is_err());
        assert!(store.root_dir(MediaRoot::Places).join("Munnar").is_dir());
    }
}
