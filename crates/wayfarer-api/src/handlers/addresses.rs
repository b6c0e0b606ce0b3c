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
    Address, AddressPin, AddressQuery, AddressWithTourPlans, AddressesByTourType,
    CreateAddressRequest, DeleteResponse, UpdateAddressRequest,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AddressImageQuery {
    /// State name the image was uploaded under
    pub state: Option<String>,
    pub file_name: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/addresses",
    tag = "addresses",
    request_body(content_type = "multipart/form-data", description = "Address fields plus image files"),
    responses(
        (status = 201, description = "Address created", body = Address),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Storage or database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn create_address(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_multipart(multipart, &state.uploads).await?;
    let req: CreateAddressRequest = form.decode()?;
    let address = state.services.addresses.create(req, form.files).await?;
    Ok((StatusCode::CREATED, Json(address)))
}

#[utoipa::path(
    get,
    path = "/api/v1/addresses",
    tag = "addresses",
    params(AddressQuery),
    responses((status = 200, description = "Addresses", body = Vec<Address>))
)]
#[tracing::instrument(skip(state))]
pub async fn list_addresses(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AddressQuery>,
) -> Result<Json<Vec<Address>>, HttpAppError> {
    Ok(Json(state.services.addresses.list(query).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/addresses/summaries",
    tag = "addresses",
    responses((status = 200, description = "Map pins for addresses with coordinates and a starting price", body = Vec<AddressPin>))
)]
pub async fn address_summaries(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AddressPin>>, HttpAppError> {
    Ok(Json(state.services.addresses.summaries().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/addresses/by-tour-type",
    tag = "addresses",
    responses((status = 200, description = "Addresses grouped by linked tour type", body = AddressesByTourType))
)]
pub async fn addresses_by_tour_type(
    State(state): State<Arc<AppState>>,
) -> Result<Json<AddressesByTourType>, HttpAppError> {
    Ok(Json(state.services.addresses.by_tour_type().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/addresses/with-tour-plans",
    tag = "addresses",
    responses((status = 200, description = "Addresses with their tour plans", body = Vec<AddressWithTourPlans>))
)]
pub async fn addresses_with_tour_plans(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AddressWithTourPlans>>, HttpAppError> {
    Ok(Json(state.services.addresses.with_tour_plans().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/addresses/{id}",
    tag = "addresses",
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address", body = Address),
        (status = 404, description = "Address not found", body = ErrorResponse)
    )
)]
pub async fn get_address(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Address>, HttpAppError> {
    Ok(Json(state.services.addresses.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/addresses/{id}",
    tag = "addresses",
    params(("id" = Uuid, Path, description = "Address ID")),
    request_body(content_type = "multipart/form-data", description = "Changed fields plus replacement images"),
    responses(
        (status = 200, description = "Address updated", body = Address),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Address not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn update_address(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<Address>, HttpAppError> {
    let form = read_multipart(multipart, &state.uploads).await?;
    let req: UpdateAddressRequest = form.decode()?;
    Ok(Json(
        state.services.addresses.update(id, req, form.files).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/addresses/{id}",
    tag = "addresses",
    params(("id" = Uuid, Path, description = "Address ID")),
    responses(
        (status = 200, description = "Address deleted", body = DeleteResponse),
        (status = 404, description = "Address not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_address(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let address = state.services.addresses.delete(id).await?;
    Ok(Json(DeleteResponse::new(address.id, "Address")))
}

#[utoipa::path(
    get,
    path = "/api/v1/addresses/images",
    tag = "addresses",
    params(AddressImageQuery),
    responses(
        (status = 200, description = "Image file", content_type = "application/octet-stream"),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_address_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AddressImageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let key = lookup_param(query.state.as_deref(), "state")?;
    let file_name = lookup_param(query.file_name.as_deref(), "fileName")?;
    let file = state.services.addresses.image(&key, &file_name).await?;
    media_response(file)
}
