pub mod health;
pub mod upload;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::comparison::handlers::handle_compare;
use crate::extraction::handlers::{handle_extract, handle_extract_text};
use crate::render::handlers::handle_generate_markdown;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Extraction API
        .route("/api/v1/extract", post(handle_extract))
        .route("/api/v1/extract-text", post(handle_extract_text))
        // Ranking API
        .route("/api/v1/compare", post(handle_compare))
        // Rendering API
        .route("/api/v1/generate-markdown", post(handle_generate_markdown))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}
