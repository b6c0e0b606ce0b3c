use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use wayfarer_core::models::{
    CreateReviewRequest, DeleteResponse, PageQuery, Review, ReviewPage, UpdateReviewRequest,
};

#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    tag = "reviews",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = Review),
        (status = 400, description = "Invalid input or unknown package/booking", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, req))]
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<CreateReviewRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let review = state.services.reviews.create(req).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews",
    tag = "reviews",
    params(PageQuery),
    responses((status = 200, description = "One page of reviews, newest first", body = ReviewPage))
)]
#[tracing::instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ReviewPage>, HttpAppError> {
    Ok(Json(state.services.reviews.list(query).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/tour-plan/{id}",
    tag = "reviews",
    params(("id" = Uuid, Path, description = "Tour plan ID")),
    responses(
        (status = 200, description = "Reviews of the tour plan", body = Vec<Review>),
        (status = 404, description = "Tour plan not found", body = ErrorResponse)
    )
)]
pub async fn reviews_by_tour_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Review>>, HttpAppError> {
    Ok(Json(state.services.reviews.by_tour_plan(id).await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/reviews/{id}",
    tag = "reviews",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review", body = Review),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
pub async fn get_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Review>, HttpAppError> {
    Ok(Json(state.services.reviews.get(id).await?))
}

#[utoipa::path(
    put,
    path = "/api/v1/reviews/{id}",
    tag = "reviews",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Review updated", body = Review),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, req))]
pub async fn update_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    ValidatedJson(req): ValidatedJson<UpdateReviewRequest>,
) -> Result<Json<Review>, HttpAppError> {
    Ok(Json(state.services.reviews.update(id, req).await?))
}

#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    tag = "reviews",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review deleted", body = DeleteResponse),
        (status = 404, description = "Review not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteResponse>, HttpAppError> {
    let review = state.services.reviews.delete(id).await?;
    Ok(Json(DeleteResponse::new(review.id, "Review")))
}
