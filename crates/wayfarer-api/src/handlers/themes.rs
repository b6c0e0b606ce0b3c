use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::media_response;
use crate::state::AppState;
use crate::utils::lookup_param;
use crate::utils::upload::read_multipart;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::IntoParams;
use uuid::Uuid;
use wayfarer_core::models::{CreateThemeRequest, DeleteResponse, Theme, UpdateThemeRequest};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ThemeImageQuery {
    pub theme_name: Option<String>,
    pub file_name: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/themes",
    tag = "themes",
    request_body(content_type = "multipart/form-data", description = "Theme name, description and images"),
    responses(
        (status = 201, description = "Theme created", body = Theme),
        (status = 400, description = "Unknown or duplicate theme name", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn create_theme(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_multipart(multipart, &state.uploads).await?;
    let req: CreateThemeRequest = form.decode()?;
    let theme = state.services.themes.create(req, form.files).await?;
    Ok((StatusCode::CREATED, Json(theme)))
}

#[utoipa::path(
    get,
    path = "/api/v1/themes",
    tag = "themes",
    responses((status = 200, description = "Themes", body = Vec<Theme>))
)]
pub async fn list_themes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Theme>>, HttpAppError> {
    Ok(Json(state.services.themes.list().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/themes/{id}",
    tag = "themes",
    params(("id" = Uuid, Path, description = "Theme ID")),
    responses(
        (status = 200, description = "Theme", body = Theme),
        (status = 404, description = "Theme not found", body = ErrorResponse)
    )
)]
pub async fn get_theme(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Theme>, HttpAppError> {
    Ok(Json(state.services.themes.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/themes/{id}",
    tag = "themes",
    params(("id" = Uuid, Path, description = "Theme ID")),
    request_body(content_type = "multipart/form-data", description = "Changed fields plus replacement images"),
    responses(
        (status = 200, description = "Theme updated", body = Theme),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Theme not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn update_theme(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Theme>, HttpAppError> {
    let form = read_multipart(multipart, &state.uploads).await?;
    let req: UpdateThemeRequest = form.decode()?;
    Ok(Json(state.services.themes.update(id, req, form.files).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/themes/{id}",
    tag = "themes",
    params(("id" = Uuid, Path, description = "Theme ID")),
    responses(
        (status = 200, description = "Theme deleted", body = DeleteResponse),
        (status = 404, description = "Theme not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_theme(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let theme = state.services.themes.delete(id).await?;
    Ok(Json(DeleteResponse::new(theme.id, "Theme")))
}

#[utoipa::path(
    get,
    path = "/api/v1/themes/images",
    tag = "themes",
    params(ThemeImageQuery),
    responses(
        (status = 200, description = "Image file", content_type = "application/octet-stream"),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_theme_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ThemeImageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let key = lookup_param(query.theme_name.as_deref(), "themeName")?;
    let file_name = lookup_param(query.file_name.as_deref(), "fileName")?;
    let file = state.services.themes.image(&key, &file_name).await?;
    media_response(file)
}
