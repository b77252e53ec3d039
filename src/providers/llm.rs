//! LLM provider trait for answer generation

use async_trait::async_trait;

use crate::error::Result;

/// Trait for LLM-based answer generation
///
/// Implementations:
/// - `OllamaLlm`: local Ollama server (tinyllama, phi3, ...)
/// - in-memory stubs for tests
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate an answer for a question given the retrieved context.
    /// Single attempt; callers decide how to surface failures.
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model identifier used for generation
    fn model(&self) -> &str;
}
