//! API constants
//!
//! Every domain route is mounted under [`API_PREFIX`]; health and documentation routes are not.

/// API base path prefix (version-independent)
pub const API_BASE: &str = "/api";

/// Current API version
pub const API_VERSION: &str = "v1";

/// Versioned prefix for domain routes
pub const API_PREFIX: &str = "/api/v1";

/// Path of the served OpenAPI document
pub const OPENAPI_PATH: &str = "/api/openapi.json";
