//! Document store abstraction
//!
//! Records are stored as JSON documents, one collection per entity type. The store offers
//! the primitives the entity services need: CRUD by id, filtered finds, and atomic set
//! mutation of array fields (`add_to_set` / `pull`).

pub mod filter;
pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use uuid::Uuid;
use wayfarer_core::AppError;

pub use filter::{Condition, Filter, FindOptions, SortOrder};
pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Collections, each backed by its own table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Addresses,
    Places,
    Themes,
    TourPlans,
    Bookings,
    Reviews,
    Quotes,
}

impl Collection {
    pub fn table_name(self) -> &'static str {
        match self {
            Collection::Addresses => "addresses",
            Collection::Places => "places",
            Collection::Themes => "themes",
            Collection::TourPlans => "tour_plans",
            Collection::Bookings => "bookings",
            Collection::Reviews => "reviews",
            Collection::Quotes => "quotes",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

/// Document store abstraction
///
/// Every mutation is visible to subsequent reads as soon as it returns.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, collection: Collection, id: Uuid, body: Value) -> Result<(), AppError>;

    async fn find_by_id(&self, collection: Collection, id: Uuid)
        -> Result<Option<Value>, AppError>;

    /// Documents with any of the ids, oldest first. Unknown ids are skipped.
    async fn find_by_ids(
        &self,
        collection: Collection,
        ids: &[Uuid],
    ) -> Result<Vec<Value>, AppError>;

    async fn find(
        &self,
        collection: Collection,
        filter: &Filter,
        options: FindOptions,
    ) -> Result<Vec<Value>, AppError>;

    async fn count(&self, collection: Collection, filter: &Filter) -> Result<u64, AppError>;

    /// Replace a whole document. Returns false when it does not exist.
    async fn replace(&self, collection: Collection, id: Uuid, body: Value)
        -> Result<bool, AppError>;

    /// Delete a document and return it.
    async fn delete(&self, collection: Collection, id: Uuid) -> Result<Option<Value>, AppError>;

    /// Append `value` to the array `field` unless already present. Atomic per document.
    /// Returns false when the document does not exist.
    async fn add_to_set(
        &self,
        collection: Collection,
        id: Uuid,
        field: &str,
        value: Value,
    ) -> Result<bool, AppError>;

    /// Remove every occurrence of `value` from the array `field`. Atomic per document.
    /// Returns false when the document does not exist.
    async fn pull(
        &self,
        collection: Collection,
        id: Uuid,
        field: &str,
        value: Value,
    ) -> Result<bool, AppError>;
}
