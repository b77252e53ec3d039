//! API routes for the RAG server

pub mod ingest;
pub mod query;

use axum::{extract::DefaultBodyLimit, routing::post, Router};

use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Ingestion, with a larger body limit for file uploads
        .route(
            "/ingest",
            post(ingest::ingest_document).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Query
        .route("/query", post(query::query_rag))
}
