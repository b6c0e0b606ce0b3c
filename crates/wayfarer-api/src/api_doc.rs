//! OpenAPI documentation, served at `/api/openapi.json` and browsable at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use wayfarer_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Wayfarer API",
        version = "0.1.0",
        description = "Travel marketplace backend: destinations, places, themes and tour plans with entity-scoped image storage, plus bookings, reviews and quote requests. All endpoints are versioned under /api/v1/."
    ),
    paths(
        handlers::health::version,
        // Addresses
        handlers::addresses::create_address,
        handlers::addresses::list_addresses,
        handlers::addresses::address_summaries,
        handlers::addresses::addresses_by_tour_type,
        handlers::addresses::addresses_with_tour_plans,
        handlers::addresses::get_address,
        handlers::addresses::update_address,
        handlers::addresses::delete_address,
        handlers::addresses::get_address_image,
        // Places
        handlers::places::create_place,
        handlers::places::list_places,
        handlers::places::list_cities,
        handlers::places::get_place,
        handlers::places::get_sub_places,
        handlers::places::update_place,
        handlers::places::delete_place,
        handlers::places::get_place_image,
        // Themes
        handlers::themes::create_theme,
        handlers::themes::list_themes,
        handlers::themes::get_theme,
        handlers::themes::update_theme,
        handlers::themes::delete_theme,
        handlers::themes::get_theme_image,
        // Tour plans
        handlers::tour_plans::create_tour_plan,
        handlers::tour_plans::list_tour_plans,
        handlers::tour_plans::tour_catalog,
        handlers::tour_plans::tour_plans_by_state,
        handlers::tour_plans::tour_plan_by_code,
        handlers::tour_plans::get_tour_plan,
        handlers::tour_plans::update_tour_plan,
        handlers::tour_plans::delete_tour_plan,
        handlers::tour_plans::get_tour_plan_image,
        // Bookings
        handlers::bookings::create_booking,
        handlers::bookings::list_bookings,
        handlers::bookings::get_booking,
        handlers::bookings::update_booking,
        handlers::bookings::delete_booking,
        // Reviews
        handlers::reviews::create_review,
        handlers::reviews::list_reviews,
        handlers::reviews::reviews_by_tour_plan,
        handlers::reviews::get_review,
        handlers::reviews::update_review,
        handlers::reviews::delete_review,
        // Quotes
        handlers::quotes::create_quote,
        handlers::quotes::list_quotes,
        handlers::quotes::get_quote,
        handlers::quotes::update_quote_status,
        handlers::quotes::delete_quote,
    ),
    components(
        schemas(
            models::CreateAddressRequest,
            models::UpdateAddressRequest,
            models::CreatePlaceRequest,
            models::UpdatePlaceRequest,
            models::CreateThemeRequest,
            models::UpdateThemeRequest,
            models::CreateTourPlanRequest,
            models::UpdateTourPlanRequest,
            models::TourCategory,
            models::QuoteStatus,
            models::Flag,
            error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Service version"),
        (name = "addresses", description = "Destinations (country/state/city) and their images"),
        (name = "places", description = "Cities and sub-places and their images"),
        (name = "themes", description = "Travel themes and their images"),
        (name = "tour-plans", description = "Tour packages, catalog and images"),
        (name = "bookings", description = "Tour bookings"),
        (name = "reviews", description = "Traveller reviews"),
        (name = "quotes", description = "Custom trip quote requests")
    )
)]
pub struct ApiDoc;
