//! Vector store provider trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::Chunk;

/// Search result from the vector store
#[derive(Debug, Clone)]
pub struct VectorSearchResult {
    /// The matched chunk
    pub chunk: Chunk,
    /// Cosine similarity (higher is more similar)
    pub similarity: f32,
}

/// Trait for vector storage and similarity retrieval
///
/// The store owns embeddings end to end: `add` embeds each chunk before
/// persisting it and `retrieve` embeds the query text internally, so callers
/// never handle raw vectors.
#[async_trait]
pub trait VectorStoreProvider: Send + Sync {
    /// Embed and append chunks; returns the number stored
    async fn add(&self, chunks: &[Chunk]) -> Result<usize>;

    /// Retrieve the `k` chunks most similar to the query text, ordered by
    /// descending similarity
    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<VectorSearchResult>>;

    /// Total number of stored records
    async fn len(&self) -> Result<usize>;

    /// Check if the store is empty
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Check if the provider is healthy
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;
}
