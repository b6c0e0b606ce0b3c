//! Typed repositories over the document store

use crate::document::{Collection, DocumentStore, Filter, FindOptions};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;
use wayfarer_core::models::{Address, Booking, Place, Quote, Review, Theme, TourPlan};
use wayfarer_core::AppError;

/// A record type stored in its own collection.
pub trait Document: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: Collection;

    fn id(&self) -> Uuid;
}

macro_rules! document {
    ($ty:ty, $collection:expr) => {
        impl Document for $ty {
            const COLLECTION: Collection = $collection;

            fn id(&self) -> Uuid {
                self.id
            }
        }
    };
}

document!(Address, Collection::Addresses);
document!(Place, Collection::Places);
document!(Theme, Collection::Themes);
document!(TourPlan, Collection::TourPlans);
document!(Booking, Collection::Bookings);
document!(Review, Collection::Reviews);
document!(Quote, Collection::Quotes);

/// Repository for one record type
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Repository {
            store: self.store.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T: Document> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Repository {
            store,
            _marker: PhantomData,
        }
    }

    fn encode(record: &T) -> Result<Value, AppError> {
        serde_json::to_value(record).map_err(|e| {
            AppError::Persistence(format!("Failed to encode {} document: {}", T::COLLECTION, e))
        })
    }

    fn decode(body: Value) -> Result<T, AppError> {
        serde_json::from_value(body).map_err(|e| {
            AppError::Persistence(format!("Corrupt {} document: {}", T::COLLECTION, e))
        })
    }

    fn decode_all(bodies: Vec<Value>) -> Result<Vec<T>, AppError> {
        bodies.into_iter().map(Self::decode).collect()
    }

    pub async fn insert(&self, record: &T) -> Result<(), AppError> {
        self.store
            .insert(T::COLLECTION, record.id(), Self::encode(record)?)
            .await
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<T>, AppError> {
        self.store
            .find_by_id(T::COLLECTION, id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    pub async fn get_many(&self, ids: &[Uuid]) -> Result<Vec<T>, AppError> {
        Self::decode_all(self.store.find_by_ids(T::COLLECTION, ids).await?)
    }

    pub async fn find(&self, filter: &Filter) -> Result<Vec<T>, AppError> {
        self.find_with(filter, FindOptions::default()).await
    }

    pub async fn find_with(&self, filter: &Filter, options: FindOptions) -> Result<Vec<T>, AppError> {
        Self::decode_all(self.store.find(T::COLLECTION, filter, options).await?)
    }

    pub async fn all(&self) -> Result<Vec<T>, AppError> {
        self.find(&Filter::new()).await
    }

    pub async fn count(&self, filter: &Filter) -> Result<u64, AppError> {
        self.store.count(T::COLLECTION, filter).await
    }

    pub async fn exists(&self, filter: &Filter) -> Result<bool, AppError> {
        let found = self
            .store
            .find(T::COLLECTION, filter, FindOptions::default().page(0, 1))
            .await?;
        Ok(!found.is_empty())
    }

    pub async fn replace(&self, record: &T) -> Result<bool, AppError> {
        self.store
            .replace(T::COLLECTION, record.id(), Self::encode(record)?)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<Option<T>, AppError> {
        self.store
            .delete(T::COLLECTION, id)
            .await?
            .map(Self::decode)
            .transpose()
    }

    pub async fn add_to_set(&self, id: Uuid, field: &str, value: Uuid) -> Result<bool, AppError> {
        self.store
            .add_to_set(T::COLLECTION, id, field, Value::String(value.to_string()))
            .await
    }

    pub async fn pull(&self, id: Uuid, field: &str, value: Uuid) -> Result<bool, AppError> {
        self.store
            .pull(T::COLLECTION, id, field, Value::String(value.to_string()))
            .await
    }
}
