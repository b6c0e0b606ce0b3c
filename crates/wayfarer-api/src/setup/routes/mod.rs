//! Router assembly: probes, the versioned API, and the OpenAPI document with its viewer.

mod domains;
mod health;

use crate::constants::{API_PREFIX, OPENAPI_PATH};
use crate::state::AppState;
use anyhow::Context;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use utoipa_rapidoc::RapiDoc;
use wayfarer_core::Config;

const DOCS_PATH: &str = "/docs";

pub fn setup_routes(config: &Config, state: Arc<AppState>) -> anyhow::Result<Router> {
    let body_limit = config.max_request_body_bytes();

    let api = [
        domains::address_routes,
        domains::place_routes,
        domains::theme_routes,
        domains::tour_plan_routes,
        domains::booking_routes,
        domains::review_routes,
        domains::quote_routes,
    ]
    .into_iter()
    .fold(Router::new(), |router, routes| router.merge(routes()));

    let app = Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::liveness_check))
        .route(API_PREFIX, get(crate::handlers::health::version))
        .merge(api)
        .route(OPENAPI_PATH, get(|| async { Json(crate::api_doc::get_openapi_spec()) }))
        .merge(RapiDoc::new(OPENAPI_PATH).path(DOCS_PATH))
        // Multipart bodies are capped here; per-file limits apply while streaming.
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors_layer(config)?)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    tracing::info!(body_limit, docs = DOCS_PATH, "Routes configured");
    Ok(app)
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origin = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS allows any origin");
        AllowOrigin::any()
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>()
                    .with_context(|| format!("Invalid CORS origin '{}'", o))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any))
}
