//! HTTP rendering of `AppError`
//!
//! Handlers return `Result<_, HttpAppError>` and use `?` on anything that converts into
//! `AppError`. The status, body and log level all come from the error's `ErrorMetadata`.

use axum::{
    extract::rejection::JsonRejection,
    extract::{FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use utoipa::ToSchema;
use wayfarer_core::{AppError, ErrorMetadata, LogLevel};

/// Body of every non-2xx response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Client-safe message
    pub error: String,
    /// Cause chain, outside production and only for non-sensitive errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// e.g. `VALIDATION_ERROR`, `NOT_FOUND`, `STORAGE_WRITE_FAILURE`
    pub code: String,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

impl ErrorResponse {
    fn new(error: &AppError, show_details: bool) -> Self {
        Self {
            error: error.client_message(),
            details: show_details.then(|| error.detailed_message()),
            error_type: show_details.then(|| error.kind().to_string()),
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(str::to_string),
        }
    }
}

#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl<E: Into<AppError>> From<E> for HttpAppError {
    fn from(err: E) -> Self {
        HttpAppError(err.into())
    }
}

/// `Json<T>` whose rejections render as a 400 [`ErrorResponse`] instead of plain text.
#[derive(Debug, Clone, Copy)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidatedJson(value)),
            Err(rejection) => Err(HttpAppError(AppError::InvalidInput(format!(
                "Invalid request body: {}",
                rejection.body_text()
            )))),
        }
    }
}

fn is_production_env() -> bool {
    ["ENVIRONMENT", "APP_ENV"]
        .iter()
        .find_map(|key| std::env::var(key).ok())
        .is_some_and(|env| matches!(env.to_lowercase().as_str(), "production" | "prod"))
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let error = &self.0;
        let kind = error.kind();
        match error.log_level() {
            LogLevel::Debug => tracing::debug!(error = %error, kind, "Request failed"),
            LogLevel::Warn => tracing::warn!(error = %error, kind, "Request failed"),
            LogLevel::Error => tracing::error!(error = %error, kind, "Request failed"),
        }

        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let show_details = !error.is_sensitive() && !is_production_env();
        (status, Json(ErrorResponse::new(error, show_details))).into_response()
    }
}
