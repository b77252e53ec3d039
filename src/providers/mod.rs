//! Provider abstractions for embeddings, LLM generation, and vector storage
//!
//! Trait-based seams so the orchestrator never hard-wires a single backend:
//! production wires the Ollama-backed implementations, tests wire in-memory
//! stubs.

pub mod embedding;
pub mod llm;
pub mod local;
pub mod ollama;
pub mod vector_store;

pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use local::LocalVectorStore;
pub use ollama::{OllamaClient, OllamaEmbedder, OllamaLlm};
pub use vector_store::{VectorSearchResult, VectorStoreProvider};
