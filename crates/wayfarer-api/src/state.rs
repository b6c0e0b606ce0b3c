//! Application state shared by every handler.

use std::path::PathBuf;
use std::sync::Arc;
use wayfarer_core::Config;
use wayfarer_db::DocumentStore;
use wayfarer_services::Services;

/// Limits applied while a multipart request is read.
#[derive(Clone, Debug)]
pub struct UploadLimits {
    /// Directory transient upload files are written to
    pub temp_dir: PathBuf,
    pub max_file_size_bytes: usize,
    pub max_files_per_request: usize,
    pub allowed_content_types: Vec<String>,
}

impl UploadLimits {
    pub fn from_config(config: &Config) -> Self {
        UploadLimits {
            temp_dir: config.upload_temp_dir.clone(),
            max_file_size_bytes: config.max_file_size_bytes,
            max_files_per_request: config.max_files_per_request,
            allowed_content_types: config.allowed_content_types.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Kept for health checks
    pub store: Arc<dyn DocumentStore>,
    pub media_root: PathBuf,
    pub uploads: UploadLimits,
    pub config: Config,
}
