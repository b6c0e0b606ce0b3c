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
use wayfarer_core::models::{
    CityView, CreatePlaceRequest, DeleteResponse, Place, PlaceQuery, UpdatePlaceRequest,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PlaceImageQuery {
    pub place_name: Option<String>,
    pub file_name: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/places",
    tag = "places",
    request_body(content_type = "multipart/form-data", description = "Place fields plus image files"),
    responses(
        (status = 201, description = "Place created", body = Place),
        (status = 400, description = "Invalid input or unknown state/parent", body = ErrorResponse),
        (status = 500, description = "Storage or database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn create_place(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_multipart(multipart, &state.uploads).await?;
    let req: CreatePlaceRequest = form.decode()?;
    let place = state.services.places.create(req, form.files).await?;
    Ok((StatusCode::CREATED, Json(place)))
}

#[utoipa::path(
    get,
    path = "/api/v1/places",
    tag = "places",
    params(PlaceQuery),
    responses((status = 200, description = "Places", body = Vec<Place>))
)]
#[tracing::instrument(skip(state))]
pub async fn list_places(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlaceQuery>,
) -> Result<Json<Vec<Place>>, HttpAppError> {
    Ok(Json(state.services.places.list(query).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/places/cities",
    tag = "places",
    responses((status = 200, description = "Cities with their state address", body = Vec<CityView>))
)]
pub async fn list_cities(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CityView>>, HttpAppError> {
    Ok(Json(state.services.places.cities().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/places/{id}",
    tag = "places",
    params(("id" = Uuid, Path, description = "Place ID")),
    responses(
        (status = 200, description = "Place", body = Place),
        (status = 404, description = "Place not found", body = ErrorResponse)
    )
)]
pub async fn get_place(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Place>, HttpAppError> {
    Ok(Json(state.services.places.get(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/places/{id}/sub-places",
    tag = "places",
    params(("id" = Uuid, Path, description = "City ID")),
    responses(
        (status = 200, description = "Sub-places of the city", body = Vec<Place>),
        (status = 404, description = "City not found", body = ErrorResponse)
    )
)]
pub async fn get_sub_places(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Place>>, HttpAppError> {
    Ok(Json(state.services.places.sub_places(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/places/{id}",
    tag = "places",
    params(("id" = Uuid, Path, description = "Place ID")),
    request_body(content_type = "multipart/form-data", description = "Changed fields plus replacement images"),
    responses(
        (status = 200, description = "Place updated", body = Place),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Place not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn update_place(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Place>, HttpAppError> {
    let form = read_multipart(multipart, &state.uploads).await?;
    let req: UpdatePlaceRequest = form.decode()?;
    Ok(Json(state.services.places.update(id, req, form.files).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/places/{id}",
    tag = "places",
    params(("id" = Uuid, Path, description = "Place ID")),
    responses(
        (status = 200, description = "Place deleted", body = DeleteResponse),
        (status = 404, description = "Place not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_place(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let place = state.services.places.delete(id).await?;
    Ok(Json(DeleteResponse::new(place.id, "Place")))
}

#[utoipa::path(
    get,
    path = "/api/v1/places/images",
    tag = "places",
    params(PlaceImageQuery),
    responses(
        (status = 200, description = "Image file", content_type = "application/octet-stream"),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_place_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlaceImageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let key = lookup_param(query.place_name.as_deref(), "placeName")?;
    let file_name = lookup_param(query.file_name.as_deref(), "fileName")?;
    let file = state.services.places.image(&key, &file_name).await?;
    media_response(file)
}
