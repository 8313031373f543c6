use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

pub mod config;
pub mod handlers;
pub mod models;
pub mod state;
pub mod telemetry;
pub mod upload;

pub use config::Settings;
pub use state::AppState;

/// Build the application router.
///
/// CORS mirrors the caller's origin, method and headers and allows
/// credentials, i.e. any browser client may call the service.
pub fn app(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/read-file/", post(handlers::read_file::read_file))
        .route("/read-file", post(handlers::read_file::read_file))
        .route("/health", get(handlers::health::health))
        .layer(body_limit)
        .layer(trace_layer)
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
