//! RAG server binary
//!
//! Run with: cargo run --bin ragserve-server

use ragserve::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ragserve=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RagConfig::from_env();

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!(
        "  - Chunk size/overlap: {}/{}",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!(
        "  - Documents dir: {}",
        config.storage.documents_dir.display()
    );

    // Reachability check for the LLM backend
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Start it with: ollama serve");
            tracing::warn!(
                "Then pull the model: ollama pull {}",
                config.llm.generate_model
            );
        }
    }

    let server = RagServer::new(config).await?;

    println!("\nServer starting...");
    println!("  API:    http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/ingest - Upload documents");
    println!("  POST /api/query  - Ask questions");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
