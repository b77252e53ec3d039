//! Query endpoint

use axum::extract::State;
use axum::Json;

use crate::server::state::AppState;
use crate::types::{QueryRequest, QueryResponse};

/// POST /api/query - Ask a question over the ingested documents.
///
/// Degraded-mode answers from the orchestrator come back as 200; only
/// unhandled failures become 500.
pub async fn query_rag(
    State(state): State<AppState>,
    Json(request): Json<QueryRequest>,
) -> Json<QueryResponse> {
    tracing::info!("query: \"{}\"", request.query);

    let response = state.service().ask(&request.query, request.top_k).await;
    Json(response)
}
