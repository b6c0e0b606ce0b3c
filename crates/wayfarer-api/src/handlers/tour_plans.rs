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
    CreateTourPlanRequest, DeleteResponse, TourCatalog, TourPlan, TourPlanQuery, TourPlanView,
    UpdateTourPlanRequest,
};

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TourPlanImageQuery {
    pub tour_code: Option<String>,
    pub file_name: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/tour-plans",
    tag = "tour-plans",
    request_body(content_type = "multipart/form-data", description = "Tour plan fields plus image files"),
    responses(
        (status = 201, description = "Tour plan created", body = TourPlan),
        (status = 400, description = "Invalid input or unknown reference", body = ErrorResponse),
        (status = 500, description = "Storage or database failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn create_tour_plan(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<impl IntoResponse, HttpAppError> {
    let form = read_multipart(multipart, &state.uploads).await?;
    let req: CreateTourPlanRequest = form.decode()?;
    let plan = state.services.tour_plans.create(req, form.files).await?;
    Ok((StatusCode::CREATED, Json(plan)))
}

#[utoipa::path(
    get,
    path = "/api/v1/tour-plans",
    tag = "tour-plans",
    params(TourPlanQuery),
    responses((status = 200, description = "Tour plans with joined records", body = Vec<TourPlanView>))
)]
#[tracing::instrument(skip(state))]
pub async fn list_tour_plans(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TourPlanQuery>,
) -> Result<Json<Vec<TourPlanView>>, HttpAppError> {
    Ok(Json(state.services.tour_plans.list(query).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/tour-plans/catalog",
    tag = "tour-plans",
    responses((status = 200, description = "Trending states and category groups", body = TourCatalog))
)]
#[tracing::instrument(skip(state))]
pub async fn tour_catalog(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TourCatalog>, HttpAppError> {
    Ok(Json(state.services.tour_plans.catalog().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/tour-plans/state/{state}",
    tag = "tour-plans",
    params(("state" = String, Path, description = "State name, case-insensitive")),
    responses(
        (status = 200, description = "Tour plans in the state", body = Vec<TourPlanView>),
        (status = 404, description = "No address or tour plan for the state", body = ErrorResponse)
    )
)]
pub async fn tour_plans_by_state(
    State(state): State<Arc<AppState>>,
    Path(state_name): Path<String>,
) -> Result<Json<Vec<TourPlanView>>, HttpAppError> {
    Ok(Json(state.services.tour_plans.by_state(&state_name).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/tour-plans/tour-code/{code}",
    tag = "tour-plans",
    params(("code" = String, Path, description = "Tour code, case-insensitive")),
    responses(
        (status = 200, description = "Tour plan", body = TourPlanView),
        (status = 404, description = "Tour plan not found", body = ErrorResponse)
    )
)]
pub async fn tour_plan_by_code(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> Result<Json<TourPlanView>, HttpAppError> {
    Ok(Json(state.services.tour_plans.by_tour_code(&code).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/tour-plans/{id}",
    tag = "tour-plans",
    params(("id" = Uuid, Path, description = "Tour plan ID")),
    responses(
        (status = 200, description = "Tour plan with joined records", body = TourPlanView),
        (status = 404, description = "Tour plan not found", body = ErrorResponse)
    )
)]
pub async fn get_tour_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<TourPlanView>, HttpAppError> {
    Ok(Json(state.services.tour_plans.get_view(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/tour-plans/{id}",
    tag = "tour-plans",
    params(("id" = Uuid, Path, description = "Tour plan ID")),
    request_body(content_type = "multipart/form-data", description = "Changed fields plus additional images"),
    responses(
        (status = 200, description = "Tour plan updated", body = TourPlan),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Tour plan not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart))]
pub async fn update_tour_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<TourPlan>, HttpAppError> {
    let form = read_multipart(multipart, &state.uploads).await?;
    let req: UpdateTourPlanRequest = form.decode()?;
    Ok(Json(
        state.services.tour_plans.update(id, req, form.files).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/tour-plans/{id}",
    tag = "tour-plans",
    params(("id" = Uuid, Path, description = "Tour plan ID")),
    responses(
        (status = 200, description = "Tour plan deleted", body = DeleteResponse),
        (status = 404, description = "Tour plan not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_tour_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let plan = state.services.tour_plans.delete(id).await?;
    Ok(Json(DeleteResponse::new(plan.id, "Tour plan")))
}

#[utoipa::path(
    get,
    path = "/api/v1/tour-plans/images",
    tag = "tour-plans",
    params(TourPlanImageQuery),
    responses(
        (status = 200, description = "Image file", content_type = "application/octet-stream"),
        (status = 404, description = "Image not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_tour_plan_image(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TourPlanImageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let key = lookup_param(query.tour_code.as_deref(), "tourCode")?;
    let file_name = lookup_param(query.file_name.as_deref(), "fileName")?;
    let file = state.services.tour_plans.image(&key, &file_name).await?;
    media_response(file)
}
