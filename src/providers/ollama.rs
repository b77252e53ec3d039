//! Ollama-backed providers for embeddings and answer generation
//!
//! A single `OllamaClient` is shared between the embedder and the LLM so
//! both talk to the same backend with the same timeout.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::config::{EmbeddingConfig, LlmConfig};
use crate::error::{Error, Result};
use crate::generation::PromptBuilder;

use super::embedding::EmbeddingProvider;
use super::llm::LlmProvider;

/// Thin HTTP client for the Ollama API
pub struct OllamaClient {
    http: reqwest::Client,
    base_url: String,
    temperature: f32,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaClient {
    /// Create a new client from the LLM configuration
    pub fn new(config: &LlmConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            temperature: config.temperature,
        }
    }

    /// GET /api/tags, a cheap reachability probe
    pub async fn health_check(&self) -> Result<bool> {
        let resp = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await;
        Ok(matches!(resp, Ok(r) if r.status().is_success()))
    }

    /// POST /api/embeddings
    pub async fn embed(&self, model: &str, text: &str) -> Result<Vec<f32>> {
        let resp = self
            .http
            .post(format!("{}/api/embeddings", self.base_url))
            .json(&EmbeddingRequest {
                model,
                prompt: text,
            })
            .send()
            .await
            .map_err(|e| Error::Store(format!("embedding backend unreachable: {}", e)))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::ModelNotLoaded(model.to_string()));
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Store(format!(
                "embedding request failed ({}): {}",
                status, body
            )));
        }

        let parsed: EmbeddingResponse = resp
            .json()
            .await
            .map_err(|e| Error::Store(format!("invalid embedding response: {}", e)))?;
        Ok(parsed.embedding)
    }

    /// POST /api/generate, single attempt, no retries
    pub async fn generate(&self, model: &str, prompt: &str) -> Result<String> {
        let resp = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&GenerateRequest {
                model,
                prompt,
                stream: false,
                options: GenerateOptions {
                    temperature: self.temperature,
                },
            })
            .send()
            .await
            .map_err(|e| Error::Generation(format!("LLM backend unreachable: {}", e)))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::ModelNotLoaded(model.to_string()));
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            // Ollama reports a missing model in the error body
            if body.contains("model") {
                return Err(Error::ModelNotLoaded(model.to_string()));
            }
            return Err(Error::Generation(format!(
                "generation request failed ({}): {}",
                status, body
            )));
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| Error::Generation(format!("invalid generation response: {}", e)))?;
        Ok(parsed.response)
    }
}

/// Ollama embedding provider
pub struct OllamaEmbedder {
    client: Arc<OllamaClient>,
    model: String,
    dimensions: usize,
}

impl OllamaEmbedder {
    /// Probe the backend and build the embedder. Fails when the embedding
    /// capability is unavailable so the caller can degrade instead of crash.
    pub async fn connect(client: Arc<OllamaClient>, config: &EmbeddingConfig) -> Result<Self> {
        if !client.health_check().await? {
            return Err(Error::Config(format!(
                "embedding backend not reachable (model {})",
                config.model
            )));
        }
        Ok(Self {
            client,
            model: config.model.clone(),
            dimensions: config.dimensions,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.client.embed(&self.model, text).await
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }
}

/// Ollama LLM provider for answer generation
pub struct OllamaLlm {
    client: Arc<OllamaClient>,
    model: String,
}

impl OllamaLlm {
    /// Create a new Ollama LLM provider
    pub fn new(client: Arc<OllamaClient>, config: &LlmConfig) -> Self {
        Self {
            client,
            model: config.generate_model.clone(),
        }
    }
}

#[async_trait]
impl LlmProvider for OllamaLlm {
    async fn generate_answer(&self, question: &str, context: &str) -> Result<String> {
        let prompt = PromptBuilder::build_qa_prompt(question, context);
        self.client.generate(&self.model, &prompt).await
    }

    async fn health_check(&self) -> Result<bool> {
        self.client.health_check().await
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.model
    }
}
