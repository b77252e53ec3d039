//! Response types for the HTTP API

use serde::{Deserialize, Serialize};

/// Response from a RAG query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Generated answer, or a degraded-mode explanation
    pub response: String,
    /// Distinct source filenames in retrieval order
    pub sources: Vec<String>,
    /// Reserved for future scoring; always null
    pub confidence: Option<f32>,
}

impl QueryResponse {
    /// Create a query response
    pub fn new(response: String, sources: Vec<String>) -> Self {
        Self {
            response,
            sources,
            confidence: None,
        }
    }

    /// Canned answer returned before any document has been ingested
    pub fn no_documents() -> Self {
        Self::new(
            "No documents have been ingested yet. Please upload documents first.".to_string(),
            Vec::new(),
        )
    }

    /// Soft error payload for the query path (stays HTTP 200)
    pub fn soft_error(message: String) -> Self {
        Self::new(message, Vec::new())
    }
}

/// Response from the ingest endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestResponse {
    pub status: String,
    pub message: String,
    pub chunks: usize,
    pub filename: String,
}

impl IngestResponse {
    /// Successful ingest of a single file
    pub fn success(filename: String, chunks: usize) -> Self {
        Self {
            status: "success".to_string(),
            message: format!("File \"{}\" uploaded and processed successfully", filename),
            chunks,
            filename,
        }
    }
}
