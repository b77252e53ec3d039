//! Error taxonomy for the RAG pipeline

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Result alias used across the crate
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Pipeline errors
///
/// The ingest path re-raises these to the gateway as `500 {"detail": ...}`;
/// the query path converts them into soft answer payloads instead (see
/// `RagService::ask`).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// File could not be read or decoded
    #[error("failed to load document: {0}")]
    Load(String),

    /// Text splitting failure
    #[error("failed to split document: {0}")]
    Chunk(String),

    /// Vector store uninitialized or persistence failure
    #[error("vector store error: {0}")]
    Store(String),

    /// LLM backend unreachable or returned an invalid response
    #[error("generation error: {0}")]
    Generation(String),

    /// The backend does not have the requested model
    #[error("model \"{0}\" is not loaded")]
    ModelNotLoaded(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "detail": self.to_string() }));
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
