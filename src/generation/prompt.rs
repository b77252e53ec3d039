//! Prompt templates for RAG generation

use crate::providers::vector_store::VectorSearchResult;

/// Prompt builder for RAG queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join retrieved chunks into the context block
    pub fn build_context(results: &[VectorSearchResult]) -> String {
        results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Build the question-answering prompt. The model is instructed to
    /// answer only from the supplied context and to state uncertainty
    /// rather than fabricate.
    pub fn build_qa_prompt(question: &str, context: &str) -> String {
        format!(
            r#"Use the following pieces of context to answer the question at the end.
If you don't know the answer, just say that you don't know, don't try to make up an answer.

Context: {context}

Question: {question}

Answer:"#
        )
    }
}
