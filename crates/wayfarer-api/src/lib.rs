//! Wayfarer API Library
//!
//! HTTP handlers, multipart intake and application setup for the travel marketplace backend.

mod api_doc;
pub mod constants;
mod handlers;
pub mod setup;
mod telemetry;
mod utils;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::{AppState, UploadLimits};
