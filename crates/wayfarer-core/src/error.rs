//! Error types module
//!
//! Every failure in the backend is an `AppError`. The four classes clients can observe are
//! validation (400), not found (404), storage write failure (500) and persistence failure
//! (500). Oversized uploads (413) and internal errors round it out. How each class is
//! rendered and logged lives in one [`Profile`] per class, exposed through
//! [`ErrorMetadata`].
//!
//! The `Database` variant carries the driver error only with the `sqlx` feature.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Caller mistakes
    Debug,
    Warn,
    /// Server-side failures
    Error,
}

/// Presentation of an error to HTTP clients and to the log.
pub trait ErrorMetadata {
    fn http_status_code(&self) -> u16;

    /// Stable machine-readable code, e.g. `STORAGE_WRITE_FAILURE`
    fn error_code(&self) -> &'static str;

    /// Whether retrying the same request may succeed
    fn is_recoverable(&self) -> bool;

    fn suggested_action(&self) -> Option<&'static str>;

    /// Message safe to show to clients
    fn client_message(&self) -> String;

    /// Internal details must not leave the server
    fn is_sensitive(&self) -> bool;

    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Driver-level failure talking to the document store.
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    /// A record could not be encoded, decoded or written.
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Provisioning a folder or ingesting a file failed.
    #[error("Storage write failure: {0}")]
    StorageWrite(String),

    #[error("Validation failed: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Upload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error: {message}")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, Clone, Copy)]
struct Profile {
    status: u16,
    code: &'static str,
    recoverable: bool,
    action: Option<&'static str>,
    sensitive: bool,
    level: LogLevel,
}

const PERSISTENCE: Profile = Profile {
    status: 500,
    code: "PERSISTENCE_FAILURE",
    recoverable: true,
    action: Some("Retry after a short delay"),
    sensitive: true,
    level: LogLevel::Error,
};

const STORAGE_WRITE: Profile = Profile {
    status: 500,
    code: "STORAGE_WRITE_FAILURE",
    recoverable: true,
    action: Some("Retry the upload after a short delay"),
    sensitive: true,
    level: LogLevel::Error,
};

const VALIDATION: Profile = Profile {
    status: 400,
    code: "VALIDATION_ERROR",
    recoverable: false,
    action: Some("Fix the highlighted fields and resubmit"),
    sensitive: false,
    level: LogLevel::Debug,
};

const MISSING: Profile = Profile {
    status: 404,
    code: "NOT_FOUND",
    recoverable: false,
    action: Some("Check the id, key or file name"),
    sensitive: false,
    level: LogLevel::Debug,
};

const TOO_LARGE: Profile = Profile {
    status: 413,
    code: "PAYLOAD_TOO_LARGE",
    recoverable: false,
    action: Some("Upload fewer or smaller images"),
    sensitive: false,
    level: LogLevel::Warn,
};

const INTERNAL: Profile = Profile {
    status: 500,
    code: "INTERNAL_ERROR",
    recoverable: true,
    action: Some("Retry after a short delay"),
    sensitive: true,
    level: LogLevel::Error,
};

/// Longest cause chain rendered by [`AppError::detailed_message`].
const MAX_CAUSES: usize = 5;

impl AppError {
    fn profile(&self) -> &'static Profile {
        match self {
            AppError::Database(_) | AppError::Persistence(_) => &PERSISTENCE,
            AppError::StorageWrite(_) => &STORAGE_WRITE,
            AppError::InvalidInput(_) => &VALIDATION,
            AppError::NotFound(_) => &MISSING,
            AppError::PayloadTooLarge(_) => &TOO_LARGE,
            AppError::Internal(_) | AppError::InternalWithSource { .. } => &INTERNAL,
        }
    }

    /// Variant name, reported in non-production error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Database(_) => "Database",
            AppError::Persistence(_) => "Persistence",
            AppError::StorageWrite(_) => "StorageWrite",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Display text followed by up to five `Caused by:` lines.
    pub fn detailed_message(&self) -> String {
        let causes: Vec<String> =
            std::iter::successors(std::error::Error::source(self), |err| err.source())
                .map(|err| err.to_string())
                .collect();

        let mut details = self.to_string();
        for cause in causes.iter().take(MAX_CAUSES) {
            details.push_str("\n  Caused by: ");
            details.push_str(cause);
        }
        if causes.len() > MAX_CAUSES {
            details.push_str("\n  ...");
        }
        details
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        AppError::NotFound(format!("{} {} not found", entity, id))
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        self.profile().status
    }

    fn error_code(&self) -> &'static str {
        self.profile().code
    }

    fn is_recoverable(&self) -> bool {
        self.profile().recoverable
    }

    fn suggested_action(&self) -> Option<&'static str> {
        self.profile().action
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) | AppError::NotFound(msg) | AppError::PayloadTooLarge(msg) => {
                msg.clone()
            }
            AppError::Database(_) | AppError::Persistence(_) => {
                "The record store is unavailable".to_string()
            }
            AppError::StorageWrite(_) => "Uploaded images could not be saved".to_string(),
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }

    fn is_sensitive(&self) -> bool {
        self.profile().sensitive
    }

    fn log_level(&self) -> LogLevel {
        self.profile().level
    }
}

#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        if matches!(err, SqlxError::RowNotFound) {
            return AppError::NotFound("Record not found".to_string());
        }
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(source: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: source.to_string(),
            source,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("I/O failure: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("Malformed JSON: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("Malformed id: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_driver_errors_are_persistence_failures() {
        let err = AppError::from(sqlx::Error::PoolClosed);
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "PERSISTENCE_FAILURE");
        assert!(err.is_recoverable());
        assert!(err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Error);

        assert_eq!(
            AppError::from(sqlx::Error::RowNotFound).http_status_code(),
            404
        );
    }

    #[test]
    fn test_not_found_is_shown_verbatim() {
        let err = AppError::not_found("Address", "abc");
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Address abc not found");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_storage_write_hides_cause() {
        let err = AppError::StorageWrite("disk full".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "STORAGE_WRITE_FAILURE");
        assert!(err.is_sensitive());
        assert!(!err.client_message().contains("disk full"));
    }

    #[test]
    fn test_validation_errors_become_invalid_input() {
        let err = AppError::from(validator::ValidationErrors::new());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
        assert_eq!(err.kind(), "InvalidInput");
    }

    #[test]
    fn test_detailed_message_lists_causes() {
        let err = AppError::from(anyhow::anyhow!("disk gone").context("ingest failed"));
        let details = err.detailed_message();
        assert!(details.starts_with("Internal error: ingest failed"));
        assert!(details.contains("Caused by: disk gone"));
    }
}
