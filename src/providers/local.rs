//! Local JSON-persisted vector store with flat cosine retrieval

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::types::Chunk;

use super::embedding::EmbeddingProvider;
use super::vector_store::{VectorSearchResult, VectorStoreProvider};

/// A persisted (embedding, chunk) pair. Embeddings never leave the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VectorRecord {
    embedding: Vec<f32>,
    chunk: Chunk,
}

/// Vector store persisting records as JSON under a storage directory.
/// The whole collection is held in memory and scanned on retrieval.
pub struct LocalVectorStore {
    embedder: Arc<dyn EmbeddingProvider>,
    records: RwLock<Vec<VectorRecord>>,
    collection_path: PathBuf,
}

impl LocalVectorStore {
    /// Open (or create) the collection under `dir`. A missing or corrupt
    /// collection file starts an empty collection under the same identifier
    /// instead of failing startup.
    pub fn open(
        dir: &Path,
        collection: &str,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self> {
        std::fs::create_dir_all(dir)
            .map_err(|e| Error::Store(format!("cannot create {}: {}", dir.display(), e)))?;

        let collection_path = dir.join(format!("{}.json", collection));
        let records = Self::load_records(&collection_path);
        tracing::info!(
            "vector store opened with {} records at {}",
            records.len(),
            collection_path.display()
        );

        Ok(Self {
            embedder,
            records: RwLock::new(records),
            collection_path,
        })
    }

    fn load_records(path: &Path) -> Vec<VectorRecord> {
        if !path.exists() {
            return Vec::new();
        }
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(
                        "corrupt collection file {}, starting empty: {}",
                        path.display(),
                        e
                    );
                    Vec::new()
                }
            },
            Err(e) => {
                tracing::warn!(
                    "cannot read collection file {}, starting empty: {}",
                    path.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    fn persist(&self, records: &[VectorRecord]) -> Result<()> {
        let content = serde_json::to_string(records)
            .map_err(|e| Error::Store(format!("cannot serialize collection: {}", e)))?;
        std::fs::write(&self.collection_path, content)
            .map_err(|e| Error::Store(format!("cannot persist collection: {}", e)))
    }
}

#[async_trait]
impl VectorStoreProvider for LocalVectorStore {
    async fn add(&self, chunks: &[Chunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        let mut records = self.records.write();
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            records.push(VectorRecord {
                embedding,
                chunk: chunk.clone(),
            });
        }
        self.persist(&records)?;
        Ok(chunks.len())
    }

    async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<VectorSearchResult>> {
        let query_embedding = self.embedder.embed(query).await?;

        let records = self.records.read();
        let mut scored: Vec<VectorSearchResult> = records
            .iter()
            .filter_map(|record| {
                cosine_similarity(&query_embedding, &record.embedding).map(|similarity| {
                    VectorSearchResult {
                        chunk: record.chunk.clone(),
                        similarity,
                    }
                })
            })
            .collect();

        scored.sort_by(|a, b| {
            b.similarity
                .partial_cmp(&a.similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(self
            .collection_path
            .parent()
            .map_or(false, Path::exists))
    }

    fn name(&self) -> &str {
        "local-json"
    }
}

/// Cosine similarity; `None` on dimension mismatch or zero-length vectors
fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    if a.len() != b.len() || a.is_empty() {
        return None;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (&x, &y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a.sqrt() * norm_b.sqrt()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ChunkSource;

    /// Deterministic embedder: letter frequency vector
    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            let mut v = vec![0.0f32; 26];
            for c in text.chars().filter(|c| c.is_ascii_alphabetic()) {
                v[(c.to_ascii_lowercase() as u8 - b'a') as usize] += 1.0;
            }
            Ok(v)
        }

        fn dimensions(&self) -> usize {
            26
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn chunk(content: &str, filename: &str, index: u32) -> Chunk {
        Chunk::new(
            content.to_string(),
            ChunkSource::text(filename.to_string()),
            index,
        )
    }

    #[tokio::test]
    async fn add_then_retrieve_orders_by_similarity() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            LocalVectorStore::open(dir.path(), "rag_documents", Arc::new(StubEmbedder)).unwrap();

        store
            .add(&[
                chunk("zebra zoo zigzag", "animals.txt", 0),
                chunk("aaa abacus", "letters.txt", 1),
            ])
            .await
            .unwrap();

        let results = store.retrieve("zebra", 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.source.filename, "animals.txt");
        assert!(results[0].similarity >= results[1].similarity);
    }

    #[tokio::test]
    async fn k_bounds_the_result_count() {
        let dir = tempfile::tempdir().unwrap();
        let store =
            LocalVectorStore::open(dir.path(), "rag_documents", Arc::new(StubEmbedder)).unwrap();

        store
            .add(&[
                chunk("one", "a.txt", 0),
                chunk("two", "a.txt", 1),
                chunk("three", "a.txt", 2),
            ])
            .await
            .unwrap();

        let results = store.retrieve("one two three", 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store =
                LocalVectorStore::open(dir.path(), "rag_documents", Arc::new(StubEmbedder))
                    .unwrap();
            store
                .add(&[chunk("persistent data", "keep.txt", 0)])
                .await
                .unwrap();
        }

        let store =
            LocalVectorStore::open(dir.path(), "rag_documents", Arc::new(StubEmbedder)).unwrap();
        assert_eq!(store.len().await.unwrap(), 1);

        let results = store.retrieve("persistent", 1).await.unwrap();
        assert_eq!(results[0].chunk.source.filename, "keep.txt");
    }

    #[tokio::test]
    async fn corrupt_collection_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rag_documents.json"), "{not json").unwrap();

        let store =
            LocalVectorStore::open(dir.path(), "rag_documents", Arc::new(StubEmbedder)).unwrap();
        assert!(store.is_empty().await.unwrap());
    }

    #[test]
    fn cosine_similarity_basics() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), Some(0.0));
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]), Some(1.0));
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), None);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), None);
    }
}
