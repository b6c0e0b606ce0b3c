//! In-memory document store
//!
//! Used by tests and by `DOCUMENT_STORE=memory` for local runs without Postgres.

use super::filter::{validate_field, Filter, FindOptions, SortOrder};
use super::{Collection, DocumentStore};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;
use wayfarer_core::AppError;

#[derive(Debug, Clone)]
struct Entry {
    id: Uuid,
    body: Value,
}

/// Collections keep insertion order, which stands in for `created_at`.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<Collection, Vec<Entry>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn array_field<'a>(
    collection: Collection,
    body: &'a mut Value,
    field: &str,
) -> Result<&'a mut Vec<Value>, AppError> {
    let object = body.as_object_mut().ok_or_else(|| {
        AppError::Persistence(format!("{} document is not an object", collection))
    })?;
    let slot = object
        .entry(field.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    if slot.is_null() {
        *slot = Value::Array(Vec::new());
    }
    slot.as_array_mut().ok_or_else(|| {
        AppError::Persistence(format!("{}.{} is not an array", collection, field))
    })
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, collection: Collection, id: Uuid, body: Value) -> Result<(), AppError> {
        let mut collections = self.collections.write().await;
        let entries = collections.entry(collection).or_default();
        if entries.iter().any(|e| e.id == id) {
            return Err(AppError::Persistence(format!(
                "{} {} already exists",
                collection, id
            )));
        }
        entries.push(Entry { id, body });
        Ok(())
    }

    async fn find_by_id(
        &self,
        collection: Collection,
        id: Uuid,
    ) -> Result<Option<Value>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .and_then(|entries| entries.iter().find(|e| e.id == id))
            .map(|e| e.body.clone()))
    }

    async fn find_by_ids(
        &self,
        collection: Collection,
        ids: &[Uuid],
    ) -> Result<Vec<Value>, AppError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| ids.contains(&e.id))
                    .map(|e| e.body.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<Value>, AppError> {
        filter.validate()?;
        let collections = self.collections.read().await;
        let Some(entries) = collections.get(&collection) else {
            return Ok(Vec::new());
        };

        let mut matching: Vec<&Entry> = entries
            .iter()
            .filter(|e| filter.matches(e.id, &e.body))
            .collect();
        if options.order == SortOrder::Newest {
            matching.reverse();
        }
        let limit = options.limit.map_or(usize::MAX, |l| l as usize);

        Ok(matching
            .into_iter()
            .skip(options.offset as usize)
            .take(limit)
            .map(|e| e.body.clone())
            .collect())
    }

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, AppError> {
        filter.validate()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(&collection)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| filter.matches(e.id, &e.body))
                    .count() as u64
            })
            .unwrap_or(0))
    }

    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        body: Value,
    ) -> Result<bool, AppError> {
        let mut collections = self.collections.write().await;
        match collections
            .get_mut(&collection)
            .and_then(|entries| entries.iter_mut().find(|e| e.id == id))
        {
            Some(entry) => {
                entry.body = body;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, AppError> {
        let mut collections = self.collections.write().await;
        let Some(entries) = collections.get_mut(&collection) else {
            return Ok(None);
        };
        Ok(entries
            .iter()
            .position(|e| e.id == id)
            .map(|index| entries.remove(index).body))
    }

    async fn add_to_set(
        &self,
        collection: Collection,
        id: Uuid,
        field: &str,
        value: Value,
    ) -> Result<bool, AppError> {
        validate_field(field)?;
        let mut collections = self.collections.write().await;
        let Some(entry) = collections
            .get_mut(&collection)
            .and_then(|entries| entries.iter_mut().find(|e| e.id == id))
        else {
            return Ok(false);
        };

        let items = array_field(collection, &mut entry.body, field)?;
        if !items.contains(&value) {
            items.push(value);
        }
        Ok(true)
    }

    async fn pull(
        &self,
        collection: Collection,
        id: Uuid,
        field: &str,
        value: Value,
    ) -> Result<bool, AppError> {
        validate_field(field)?;
        let mut collections = self.collections.write().await;
        let Some(entry) = collections
            .get_mut(&collection)
            .and_then(|entries| entries.iter_mut().find(|e| e.id == id))
        else {
            return Ok(false);
        };

        let items = array_field(collection, &mut entry.body, field)?;
        items.retain(|item| item != &value);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_crud_round() {
        let store = MemoryDocumentStore::new();
        let id = Uuid::new_v4();
        store
            .insert(Collection::Themes, id, json!({"id": id, "name": "BEACH"}))
            .await
            .unwrap();
        assert!(store
            .insert(Collection::Themes, id, json!({"id": id}))
            .await
            .is_err());

        let found = store.find_by_id(Collection::Themes, id).await.unwrap().unwrap();
        assert_eq!(found["name"], "BEACH");
        assert!(store.find_by_id(Collection::Places, id).await.unwrap().is_none());

        assert!(store
            .replace(Collection::Themes, id, json!({"id": id, "name": "HERITAGE"}))
            .await
            .unwrap());
        assert!(!store
            .replace(Collection::Themes, Uuid::new_v4(), json!({}))
            .await
            .unwrap());

        let removed = store.delete(Collection::Themes, id).await.unwrap().unwrap();
        assert_eq!(removed["name"], "HERITAGE");
        assert!(store.delete(Collection::Themes, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_to_set_and_pull() {
        let store = MemoryDocumentStore::new();
        let id = Uuid::new_v4();
        store
            .insert(Collection::Places, id, json!({"id": id}))
            .await
            .unwrap();

        let child = json!(Uuid::new_v4());
        for _ in 0..3 {
            assert!(store
                .add_to_set(Collection::Places, id, "subPlaces", child.clone())
                .await
                .unwrap());
        }
        let doc = store.find_by_id(Collection::Places, id).await.unwrap().unwrap();
        assert_eq!(doc["subPlaces"], json!([child.clone()]));

        store
            .pull(Collection::Places, id, "subPlaces", child.clone())
            .await
            .unwrap();
        let doc = store.find_by_id(Collection::Places, id).await.unwrap().unwrap();
        assert_eq!(doc["subPlaces"], json!([]));

        assert!(!store
            .add_to_set(Collection::Places, Uuid::new_v4(), "subPlaces", child)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_find_order_and_paging() {
        let store = MemoryDocumentStore::new();
        for n in 0..5 {
            let id = Uuid::new_v4();
            store
                .insert(Collection::Reviews, id, json!({"id": id, "n": n, "kind": "x"}))
                .await
                .unwrap();
        }

        let filter = Filter::new().eq("kind", "x");
        let newest = store
            .find(Collection::Reviews, &filter, FindOptions::newest_first().page(1, 2))
            .await
            .unwrap();
        let ns: Vec<_> = newest.iter().map(|d| d["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![3, 2]);

        assert_eq!(store.count(Collection::Reviews, &filter).await.unwrap(), 5);
        assert_eq!(
            store
                .count(Collection::Reviews, &Filter::new().eq("kind", "y"))
                .await
                .unwrap(),
            0
        );
    }
}
