//! HTTP handlers, one module per record type.

pub mod addresses;
pub mod bookings;
pub mod health;
pub mod places;
pub mod quotes;
pub mod reviews;
pub mod themes;
pub mod tour_plans;

use crate::error::HttpAppError;
use axum::{
    body::Body,
    http::{header, StatusCode},
    response::Response,
};
use futures::TryStreamExt;
use wayfarer_core::AppError;
use wayfarer_storage::MediaFile;

/// Inline, cacheable response streaming a resolved image.
pub(crate) fn media_response(file: MediaFile) -> Result<Response, HttpAppError> {
    let MediaFile {
        file_name,
        content_type,
        content_length,
        stream,
    } = file;
    let body = Body::from_stream(stream.map_err(std::io::Error::other));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, content_length)
        .header(
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", file_name),
        )
        .header(header::CACHE_CONTROL, "public, max-age=86400")
        .body(body)
        .map_err(|e| HttpAppError(AppError::Internal(format!("Image response: {}", e))))
}
