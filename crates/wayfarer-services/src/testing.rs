//! Shared fixtures for service tests: an in-memory document store and a temp media root.

use async_trait::async_trait;
use futures::TryStreamExt;
use serde_json::Value;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::{NamedTempFile, TempDir};
use uuid::Uuid;
use wayfarer_core::models::{CreateAddressRequest, CreateTourPlanRequest, TourPlan};
use wayfarer_core::AppError;
use wayfarer_db::{Collection, DocumentStore, Filter, FindOptions, MemoryDocumentStore};
use wayfarer_storage::{LocalMediaStore, MediaFile, MediaRoot, TransientFile};

use crate::Services;

pub(crate) struct Fixture {
    pub dir: TempDir,
    pub media_store: Arc<LocalMediaStore>,
    pub services: Services,
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_store(Arc::new(MemoryDocumentStore::new())).await
    }

    pub async fn with_store(store: Arc<dyn DocumentStore>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("incoming")).unwrap();
        let media_store = Arc::new(LocalMediaStore::new(dir.path().join("media")).await.unwrap());
        let services = Services::new(
            store,
            media_store.clone(),
            vec!["Rajasthan".to_string(), "Andaman".to_string()],
        );
        Fixture {
            dir,
            media_store,
            services,
        }
    }

    pub fn folder(&self, root: MediaRoot, segment: &str) -> PathBuf {
        self.media_store.root_dir(root).join(segment)
    }

    pub async fn read(&self, file: MediaFile) -> Vec<u8> {
        let chunks: Vec<bytes::Bytes> = file.stream.try_collect().await.unwrap();
        chunks.iter().flat_map(|c| c.iter().copied()).collect()
    }
}

/// A transient upload holding `contents`, as the multipart intake would produce it.
pub(crate) fn upload(fx: &Fixture, field: &str, name: &str, contents: &[u8]) -> TransientFile {
    let mut file = NamedTempFile::new_in(fx.dir.path().join("incoming")).unwrap();
    file.write_all(contents).unwrap();
    TransientFile::new(file.into_temp_path(), name, field)
}

/// A transient upload whose temporary file is already gone.
pub(crate) fn vanished_upload(fx: &Fixture, field: &str, name: &str) -> TransientFile {
    let file = upload(fx, field, name, b"lost");
    std::fs::remove_file(&file.path).unwrap();
    file
}

pub(crate) async fn sample_tour_plan(fx: &Fixture, code: &str) -> TourPlan {
    let address = fx
        .services
        .addresses
        .create(
            CreateAddressRequest {
                country: "India".to_string(),
                state: "Goa".to_string(),
                city: "Panaji".to_string(),
                ..Default::default()
            },
            vec![],
        )
        .await
        .unwrap();
    fx.services
        .tour_plans
        .create(
            CreateTourPlanRequest {
                tour_code: code.to_string(),
                title: format!("Tour {}", code),
                address_id: address.id,
                ..Default::default()
            },
            vec![],
        )
        .await
        .unwrap()
}

/// In-memory store whose `pull` always fails, as a dropped connection would.
#[derive(Default)]
pub(crate) struct BrokenPullStore {
    inner: MemoryDocumentStore,
}

#[async_trait]
impl DocumentStore for BrokenPullStore {
    async fn insert(&self, collection: Collection, id: Uuid, body: Value) -> Result<(), AppError> {
        self.inner.insert(collection, id, body).await
    }

    async fn find_by_id(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, AppError> {
        self.inner.find_by_id(collection, id).await
    }

    async fn find_by_ids(&self, collection: Collection, ids: &[Uuid]) -> Result<Vec<Value>, AppError> {
        self.inner.find_by_ids(collection, ids).await
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<Value>, AppError> {
        self.inner.find(collection, filter, options).await
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, AppError> {
        self.inner.count(collection, filter).await
    }

    async fn replace(&self, collection: Collection, id: Uuid, body: Value) -> Result<bool, AppError> {
        self.inner.replace(collection, id, body).await
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, AppError> {
        self.inner.delete(collection, id).await
    }

    async fn add_to_set(
        &self,
        collection: Collection,
        id: Uuid,
        field: &str,
        value: Value,
    ) -> Result<bool, AppError> {
        self.inner.add_to_set(collection, id, field, value).await
    }

    async fn pull(&self, _: Collection, _: Uuid, _: &str, _: Value) -> Result<bool, AppError> {
        Err(AppError::Persistence("connection reset".to_string()))
    }
}
