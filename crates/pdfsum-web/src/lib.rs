use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;
pub mod template;
pub mod upload;

pub use state::AppState;

/// Build the application router.
pub fn router(state: Arc<AppState>) -> axum::Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    axum::Router::new()
        .route("/", get(handlers::index::index))
        .route("/health", get(handlers::index::health))
        .route("/extract", post(handlers::extract::extract))
        .route("/summarize", post(handlers::summarize::summarize))
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
