//! # API REST
//!
//! REST API for diversity records.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (header parsing, status codes, CORS)
//!
//! All business rules live in `diversity-core`; handlers translate between HTTP and
//! [`DiversityService`].

#![warn(rust_2018_idioms)]

mod error;
mod handlers;

pub use error::ApiError;

use axum::{routing::get, Router};
use diversity_core::{Diversity, DiversityPatch, DiversityService, ValidationFailure};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Header carrying the caller's touchpoint id.
pub const TOUCHPOINT_HEADER: &str = "TouchpointId";
/// Header carrying the base URL used for links in change events.
pub const API_URL_HEADER: &str = "apimurl";
/// Header carrying the caller's correlation id.
pub const CORRELATION_HEADER: &str = "DssCorrelationId";

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<DiversityService>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_diversity,
        handlers::get_diversity,
        handlers::create_diversity,
        handlers::patch_diversity,
    ),
    components(schemas(Diversity, DiversityPatch, ValidationFailure, handlers::HealthRes))
)]
pub struct ApiDoc;

/// Builds the router with Swagger UI and permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/customers/:customer_id/diversitydetails",
            get(handlers::list_diversity).post(handlers::create_diversity),
        )
        .route(
            "/customers/:customer_id/diversitydetails/:diversity_id",
            get(handlers::get_diversity).patch(handlers::patch_diversity),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
