//! Wayfarer Storage Library
//!
//! Entity-scoped media storage. Every entity type owns a media root (`addresses`,
//! `places`, `themes`, `tourPlans`) and every entity key (a state, a place name, a theme
//! name, a tour code) owns one folder below it. Entities sharing a key share the folder.
//!
//! # Stored path format
//!
//! Images are persisted on their records as `{segment}/{file_name}`, relative to the
//! media root. `segment` is the sanitized entity key (see [`MediaRoot::sanitize`]) and
//! `file_name` is generated by the ingestor so that two uploads never share a name.

pub mod local;
pub(crate) mod naming;
pub mod reaper;
pub mod root;
pub mod sanitize;
pub mod traits;

// Re-export commonly used types
pub use local::LocalMediaStore;
pub use reaper::{reap, ReapOutcome};
pub use root::{ImageUpdatePolicy, MediaRoot, NamingPolicy, SegmentPolicy};
pub use traits::{MediaFile, MediaStore, StorageError, StorageResult, TransientFile};
