pub mod health;

use axum::{extract::DefaultBodyLimit, routing::get, routing::post, Router};

use crate::analysis::handlers;
use crate::catalog::handlers as catalog;
use crate::state::AppState;

/// Multipart framing and the text fields around the uploaded file.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.analyzer.limits().max_document_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Role catalogue
        .route("/api/v1/roles", get(catalog::handle_list_roles))
        .route(
            "/api/v1/roles/:category/:role",
            get(catalog::handle_get_role),
        )
        // Analyses
        .route("/api/v1/analyses", post(handlers::handle_create_analysis))
        .route("/api/v1/analyses/:id", get(handlers::handle_get_analysis))
        .route(
            "/api/v1/analyses/:id/download",
            get(handlers::handle_download_analysis),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
