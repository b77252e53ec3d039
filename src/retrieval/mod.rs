//! Retrieval pipeline: search, assemble context, generate

use std::sync::Arc;

use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::{LlmProvider, VectorStoreProvider};
use crate::types::QueryResponse;

/// Question-answering pipeline over the vector store.
///
/// The orchestrator rebuilds this whenever new content is ingested; it only
/// exists while the store holds at least one chunk.
pub struct QaPipeline {
    store: Arc<dyn VectorStoreProvider>,
    llm: Arc<dyn LlmProvider>,
}

impl QaPipeline {
    /// Create a pipeline over the given store and LLM
    pub fn new(store: Arc<dyn VectorStoreProvider>, llm: Arc<dyn LlmProvider>) -> Self {
        Self { store, llm }
    }

    /// Answer a question from the `top_k` most similar chunks.
    ///
    /// `top_k` bounds the number of retrieved chunks, never the number of
    /// distinct sources; sources are de-duplicated in retrieval order.
    pub async fn answer(&self, question: &str, top_k: usize) -> Result<QueryResponse> {
        let results = self.store.retrieve(question, top_k.max(1)).await?;

        let mut sources: Vec<String> = Vec::new();
        for result in &results {
            let filename = &result.chunk.source.filename;
            if !sources.contains(filename) {
                sources.push(filename.clone());
            }
        }

        let context = PromptBuilder::build_context(&results);
        let answer = self.llm.generate_answer(question, &context).await?;

        Ok(QueryResponse::new(answer, sources))
    }
}
