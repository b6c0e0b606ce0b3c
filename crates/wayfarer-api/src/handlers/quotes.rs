use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use wayfarer_core::models::{CreateQuoteRequest, DeleteResponse, Quote, UpdateQuoteStatusRequest};

#[utoipa::path(
    post,
    path = "/api/v1/quotes",
    tag = "quotes",
    request_body = CreateQuoteRequest,
    responses(
        (status = 201, description = "Quote requested", body = Quote),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, req))]
pub async fn create_quote(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateQuoteRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let quote = state.services.quotes.create(req).await?;
    Ok((StatusCode::CREATED, Json(quote)))
}

#[utoipa::path(
    get,
    path = "/api/v1/quotes",
    tag = "quotes",
    responses((status = 200, description = "Quotes, newest first", body = Vec<Quote>))
)]
pub async fn list_quotes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Quote>>, HttpAppError> {
    Ok(Json(state.services.quotes.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/quotes/{id}",
    tag = "quotes",
    params(("id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote", body = Quote),
        (status = 404, description = "Quote not found", body = ErrorResponse)
    )
)]
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Quote>, HttpAppError> {
    Ok(Json(state.services.quotes.get(id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/v1/quotes/{id}/status",
    tag = "quotes",
    params(("id" = Uuid, Path, description = "Quote ID")),
    request_body = UpdateQuoteStatusRequest,
    responses(
        (status = 200, description = "Quote status updated", body = Quote),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 404, description = "Quote not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, req))]
pub async fn update_quote_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateQuoteStatusRequest>,
) -> Result<Json<Quote>, HttpAppError> {
    Ok(Json(
        state.services.quotes.update_status(id, req.status).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/quotes/{id}",
    tag = "quotes",
    params(("id" = Uuid, Path, description = "Quote ID")),
    responses(
        (status = 200, description = "Quote deleted", body = DeleteResponse),
        (status = 404, description = "Quote not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_quote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let quote = state.services.quotes.delete(id).await?;
    Ok(Json(DeleteResponse::new(quote.id, "Quote")))
}
