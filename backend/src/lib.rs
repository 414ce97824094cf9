//! Companion API
//!
//! One endpoint, `POST /analyze`, that answers a user's message through a
//! hosted chat-completion model and, for Malayalam (optionally English),
//! returns synthesized speech alongside the reply.

use std::sync::Arc;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

rust_i18n::i18n!("locales", fallback = "en");

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

#[cfg(test)]
mod tests;

use crate::config::CorsConfig;
use crate::services::AssistantService;

/// Shared state handed to every handler
pub struct AppState {
    pub assistant: AssistantService,
}

#[derive(OpenApi)]
#[openapi(
    paths(handlers::analyze::analyze, handlers::health::health),
    components(schemas(
        models::AnalyzeRequest,
        models::AnalyzeResponse,
        models::AudioFormat,
        handlers::health::HealthResponse,
    )),
    tags(
        (name = "Assistant", description = "Emotional-support replies with optional speech"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;

pub fn build_router(state: Arc<AppState>, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/analyze", post(handlers::analyze::analyze))
        .route("/health", get(handlers::health::health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum::middleware::from_fn(middleware::locale_middleware))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin when none are configured, otherwise exactly the listed ones
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.allowed_origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            },
        })
        .collect();

    tracing::info!("CORS restricted to {} origin(s)", origins.len());
    cors.allow_origin(origins)
}
