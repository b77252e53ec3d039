//! RAG orchestrator: owns the collaborators and the ingest/ask operations

use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::ingestion::{DocumentLoader, TextSplitter};
use crate::providers::{
    EmbeddingProvider, LlmProvider, LocalVectorStore, OllamaClient, OllamaEmbedder, OllamaLlm,
    VectorStoreProvider,
};
use crate::retrieval::QaPipeline;
use crate::types::QueryResponse;

/// Orchestrates loading, chunking, embedding, storage, and generation.
///
/// Collaborator construction failures degrade the service instead of
/// aborting startup: with no embedder or store, queries get the canned
/// no-documents answer and ingestion is rejected as uninitialized.
pub struct RagService {
    config: RagConfig,
    splitter: TextSplitter,
    store: Option<Arc<dyn VectorStoreProvider>>,
    llm: Arc<dyn LlmProvider>,
    pipeline: RwLock<Option<Arc<QaPipeline>>>,
}

impl RagService {
    /// Wire the production collaborators: Ollama embedder and LLM over a
    /// shared client, plus the local persistent vector store.
    pub async fn new(config: RagConfig) -> Self {
        let client = Arc::new(OllamaClient::new(&config.llm));

        let embedder: Option<Arc<dyn EmbeddingProvider>> =
            match OllamaEmbedder::connect(Arc::clone(&client), &config.embeddings).await {
                Ok(embedder) => Some(Arc::new(embedder)),
                Err(e) => {
                    tracing::warn!("embedding backend unavailable, service degraded: {}", e);
                    None
                }
            };

        let store: Option<Arc<dyn VectorStoreProvider>> = embedder.and_then(|embedder| {
            match LocalVectorStore::open(
                &config.storage.vector_store_dir,
                &config.storage.collection_name,
                embedder,
            ) {
                Ok(store) => Some(Arc::new(store) as Arc<dyn VectorStoreProvider>),
                Err(e) => {
                    tracing::warn!("vector store unavailable, service degraded: {}", e);
                    None
                }
            }
        });

        let llm: Arc<dyn LlmProvider> = Arc::new(OllamaLlm::new(client, &config.llm));

        let service = Self::with_providers(config, store, llm);
        // Restarting over a persisted non-empty collection lands directly
        // in the ready state
        service.rebuild_pipeline().await;
        service
    }

    /// Wire explicit collaborators (tests inject in-memory stubs here)
    pub fn with_providers(
        config: RagConfig,
        store: Option<Arc<dyn VectorStoreProvider>>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let splitter = TextSplitter::new(config.chunking.chunk_size, config.chunking.chunk_overlap);
        Self {
            config,
            splitter,
            store,
            llm,
            pipeline: RwLock::new(None),
        }
    }

    /// Service configuration
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Ingest a file: load, split, embed, store, and rebuild the retrieval
    /// pipeline. Returns the number of chunks created.
    pub async fn ingest(&self, path: &Path) -> Result<usize> {
        let store = self
            .store
            .as_ref()
            .ok_or_else(|| Error::Store("vector store not initialized".to_string()))?;

        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::Load(format!("invalid filename: {}", path.display())))?
            .to_string();

        let segments = DocumentLoader::load(path)?;
        let chunks = self.splitter.split_segments(&segments, &filename);

        let stored = store.add(&chunks).await?;
        tracing::info!("ingested \"{}\": {} chunks", filename, stored);

        self.rebuild_pipeline().await;
        Ok(stored)
    }

    /// Answer a query. Never fails: degraded states and backend errors are
    /// rendered as answer payloads so the transport layer stays at 200.
    pub async fn ask(&self, query: &str, top_k: usize) -> QueryResponse {
        let pipeline = self.pipeline.read().clone();
        let Some(pipeline) = pipeline else {
            return QueryResponse::no_documents();
        };

        match pipeline.answer(query, top_k).await {
            Ok(response) => response,
            Err(Error::ModelNotLoaded(model)) => QueryResponse::soft_error(format!(
                "Error: the language model \"{model}\" is not loaded. Pull it with: ollama pull {model}"
            )),
            Err(e) => QueryResponse::soft_error(format!("Error: {}", e)),
        }
    }

    /// Recompute the retrieval pipeline; it exists only while the store
    /// holds at least one chunk.
    async fn rebuild_pipeline(&self) {
        let built = match &self.store {
            Some(store) => match store.len().await {
                Ok(0) => None,
                Ok(_) => Some(Arc::new(QaPipeline::new(
                    Arc::clone(store),
                    Arc::clone(&self.llm),
                ))),
                Err(e) => {
                    tracing::warn!("cannot inspect vector store: {}", e);
                    None
                }
            },
            None => None,
        };
        *self.pipeline.write() = built;
    }
}
