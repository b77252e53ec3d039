//! Query request types

use serde::{Deserialize, Serialize};

/// Query request for the RAG endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    /// The question to answer
    pub query: String,

    /// Number of chunks to retrieve (default: 5)
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

fn default_top_k() -> usize {
    5
}

impl QueryRequest {
    /// Create a new query with the default retrieval breadth
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            top_k: default_top_k(),
        }
    }

    /// Set the number of chunks to retrieve
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }
}
