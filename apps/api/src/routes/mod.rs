pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::candidates::handlers;
use crate::search::handlers::handle_search;
use crate::state::AppState;

/// Upper bound for an uploaded resume.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Search
        .route("/api/search", get(handle_search))
        // Resume ingest
        .route("/api/resume/upload", post(handlers::handle_upload))
        .route("/api/resume/parse", post(handlers::handle_parse))
        .route("/api/resume/process", post(handlers::handle_process))
        // Candidates
        .route("/api/candidates/reembed", post(handlers::handle_reembed))
        .route("/api/candidates/summary", post(handlers::handle_summary))
        .route("/api/candidates/:id", get(handlers::handle_get_candidate))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}
