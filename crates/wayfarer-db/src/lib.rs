//! Wayfarer persistence
//!
//! The document store collaborator (Postgres JSONB or in-memory) and typed repositories
//! for every record type.

pub mod document;
pub mod repository;

pub use document::{
    Collection, Condition, DocumentStore, Filter, FindOptions, MemoryDocumentStore,
    PgDocumentStore, SortOrder,
};
pub use repository::{Document, Repository};
