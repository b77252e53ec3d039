//! Configuration for the RAG service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Embedding configuration
    pub embeddings: EmbeddingConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// On-disk storage configuration
    pub storage: StorageConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
        toml::from_str(&content).map_err(|e| Error::Config(format!("invalid config: {}", e)))
    }

    /// Default configuration with environment overrides applied
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = std::env::var("RAG_HOST") {
            config.server.host = host;
        }
        if let Ok(port) = std::env::var("RAG_PORT") {
            match port.parse() {
                Ok(port) => config.server.port = port,
                Err(_) => tracing::warn!("ignoring invalid RAG_PORT: {}", port),
            }
        }
        if let Ok(url) = std::env::var("OLLAMA_BASE_URL") {
            config.llm.base_url = url;
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            config.llm.generate_model = model;
        }
        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.embeddings.model = model;
        }
        if let Ok(dir) = std::env::var("DOCUMENTS_DIR") {
            config.storage.documents_dir = PathBuf::from(dir);
        }
        if let Ok(dir) = std::env::var("VECTOR_STORE_DIR") {
            config.storage.vector_store_dir = PathBuf::from(dir);
        }

        config
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Model identifier requested from the embedding backend
    pub model: String,
    /// Embedding dimensions (384 for MiniLM)
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            model: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            dimensions: 384,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            generate_model: "tinyllama".to_string(),
            temperature: 0.3,
            timeout_secs: 120,
        }
    }
}

/// On-disk storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding raw uploaded files by original filename
    pub documents_dir: PathBuf,
    /// Directory holding the persisted vector collection
    pub vector_store_dir: PathBuf,
    /// Collection identifier within the vector store directory
    pub collection_name: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let root = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ragserve");

        Self {
            documents_dir: root.join("documents"),
            vector_store_dir: root.join("vector_store"),
            collection_name: "rag_documents".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_pipeline_contract() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.chunk_overlap, 50);
        assert_eq!(config.embeddings.model, "sentence-transformers/all-MiniLM-L6-v2");
        assert_eq!(config.llm.generate_model, "tinyllama");
        assert_eq!(config.storage.collection_name, "rag_documents");
    }

    #[test]
    fn loads_partial_toml_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ragserve.toml");
        std::fs::write(
            &path,
            "[server]\nport = 9999\n\n[llm]\ngenerate_model = \"phi3\"\n",
        )
        .unwrap();

        let config = RagConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.llm.generate_model, "phi3");
        // untouched sections keep their defaults
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.chunking.chunk_size, 500);
    }

    #[test]
    fn rejects_malformed_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        std::fs::write(&path, "[server\nport=").unwrap();

        assert!(matches!(RagConfig::load(&path), Err(Error::Config(_))));
    }
}
