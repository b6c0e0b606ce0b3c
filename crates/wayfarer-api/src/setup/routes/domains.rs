//! Domain route groups (addresses, places, themes, tour plans, bookings, reviews, quotes).
//!
//! Static segments (`/images`, `/cities`, `/catalog`, ...) are matched before `{id}`.

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, patch};
use axum::Router;
use std::sync::Arc;

fn path(suffix: &str) -> String {
    format!("{}{}", API_PREFIX, suffix)
}

pub fn address_routes() -> Router<Arc<AppState>> {
    use handlers::addresses::*;
    Router::new()
        .route(&path("/addresses"), get(list_addresses).post(create_address))
        .route(&path("/addresses/summaries"), get(address_summaries))
        .route(&path("/addresses/by-tour-type"), get(addresses_by_tour_type))
        .route(&path("/addresses/with-tour-plans"), get(addresses_with_tour_plans))
        .route(&path("/addresses/images"), get(get_address_image))
        .route(
            &path("/addresses/{id}"),
            get(get_address).put(update_address).delete(delete_address),
        )
}

pub fn place_routes() -> Router<Arc<AppState>> {
    use handlers::places::*;
    Router::new()
        .route(&path("/places"), get(list_places).post(create_place))
        .route(&path("/places/cities"), get(list_cities))
        .route(&path("/places/images"), get(get_place_image))
        .route(
            &path("/places/{id}"),
            get(get_place).put(update_place).delete(delete_place),
        )
        .route(&path("/places/{id}/sub-places"), get(get_sub_places))
}

pub fn theme_routes() -> Router<Arc<AppState>> {
    use handlers::themes::*;
    Router::new()
        .route(&path("/themes"), get(list_themes).post(create_theme))
        .route(&path("/themes/images"), get(get_theme_image))
        .route(
            &path("/themes/{id}"),
            get(get_theme).put(update_theme).delete(delete_theme),
        )
}

pub fn tour_plan_routes() -> Router<Arc<AppState>> {
    use handlers::tour_plans::*;
    Router::new()
        .route(&path("/tour-plans"), get(list_tour_plans).post(create_tour_plan))
        .route(&path("/tour-plans/catalog"), get(tour_catalog))
        .route(&path("/tour-plans/images"), get(get_tour_plan_image))
        .route(&path("/tour-plans/state/{state}"), get(tour_plans_by_state))
        .route(&path("/tour-plans/tour-code/{code}"), get(tour_plan_by_code))
        .route(
            &path("/tour-plans/{id}"),
            get(get_tour_plan)
                .put(update_tour_plan)
                .delete(delete_tour_plan),
        )
}

pub fn booking_routes() -> Router<Arc<AppState>> {
    use handlers::bookings::*;
    Router::new()
        .route(&path("/bookings"), get(list_bookings).post(create_booking))
        .route(
            &path("/bookings/{id}"),
            get(get_booking).put(update_booking).delete(delete_booking),
        )
}

pub fn review_routes() -> Router<Arc<AppState>> {
    use handlers::reviews::*;
    Router::new()
        .route(&path("/reviews"), get(list_reviews).post(create_review))
        .route(&path("/reviews/tour-plan/{id}"), get(reviews_by_tour_plan))
        .route(
            &path("/reviews/{id}"),
            get(get_review).put(update_review).delete(delete_review),
        )
}

pub fn quote_routes() -> Router<Arc<AppState>> {
    use handlers::quotes::*;
    Router::new()
        .route(&path("/quotes"), get(list_quotes).post(create_quote))
        .route(
            &path("/quotes/{id}"),
            get(get_quote).delete(delete_quote),
        )
        .route(&path("/quotes/{id}/status"), patch(update_quote_status))
}
