//! ragserve: self-hosted retrieval-augmented generation service
//!
//! Accepts document uploads, indexes them for semantic search, and answers
//! natural-language queries by retrieving relevant passages and handing them
//! to a locally hosted LLM for answer synthesis. Embeddings, vector storage,
//! and generation sit behind provider traits so backends stay swappable.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod service;
pub mod types;

pub use config::RagConfig;
pub use error::{Error, Result};
pub use service::RagService;
pub use types::{
    document::{Chunk, ChunkSource, FileType},
    query::QueryRequest,
    response::{IngestResponse, QueryResponse},
};
