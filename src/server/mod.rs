//! HTTP server for the RAG service

pub mod routes;
pub mod state;

use axum::{routing::get, Json, Router};
use std::net::SocketAddr;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::service::RagService;
use state::AppState;

/// RAG HTTP server
pub struct RagServer {
    config: RagConfig,
    state: AppState,
}

impl RagServer {
    /// Construct the orchestrator from config and wire it into the router
    pub async fn new(config: RagConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.storage.documents_dir)
            .map_err(|e| Error::Config(format!("cannot create documents dir: {}", e)))?;

        let service = RagService::new(config.clone()).await;
        Ok(Self {
            config,
            state: AppState::new(service),
        })
    }

    /// Wire an explicitly constructed orchestrator (tests inject stubs here)
    pub fn with_service(config: RagConfig, service: RagService) -> Self {
        Self {
            config,
            state: AppState::new(service),
        }
    }

    /// Build the router with all routes
    fn build_router(&self) -> Router {
        let mut router = Router::new()
            .route("/health", get(health_check))
            .nest("/api", routes::api_routes(self.config.server.max_upload_size))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.config.server.host, self.config.server.port)
            .parse()
            .map_err(|e| Error::Config(format!("invalid address: {}", e)))?;

        let router = self.build_router();

        tracing::info!("starting RAG server on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("server error: {}", e)))?;

        Ok(())
    }

    /// The configured server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// GET /health - process liveness only, no dependency checks
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::providers::{
        EmbeddingProvider, LlmProvider, LocalVectorStore, VectorStoreProvider,
    };

    struct StubEmbedder;

    #[async_trait]
    impl EmbeddingProvider for StubEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            Ok(vec![1.0, text.len() as f32])
        }

        fn dimensions(&self) -> usize {
            2
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct StubLlm;

    #[async_trait]
    impl LlmProvider for StubLlm {
        async fn generate_answer(&self, _question: &str, _context: &str) -> Result<String> {
            Ok("stub answer".to_string())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "stub"
        }

        fn model(&self) -> &str {
            "stub-model"
        }
    }

    fn test_config(root: &Path) -> RagConfig {
        let mut config = RagConfig::default();
        config.storage.documents_dir = root.join("documents");
        config.storage.vector_store_dir = root.join("vector_store");
        config
    }

    fn test_server(root: &Path, with_store: bool) -> RagServer {
        let config = test_config(root);
        std::fs::create_dir_all(&config.storage.documents_dir).unwrap();

        let store = if with_store {
            let store = LocalVectorStore::open(
                &config.storage.vector_store_dir,
                &config.storage.collection_name,
                Arc::new(StubEmbedder),
            )
            .unwrap();
            Some(Arc::new(store) as Arc<dyn VectorStoreProvider>)
        } else {
            None
        };

        let service = RagService::with_providers(config.clone(), store, Arc::new(StubLlm));
        RagServer::with_service(config, service)
    }

    async fn read_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn multipart_request(filename: &str, content: &str) -> Request<Body> {
        let boundary = "ragserve-test-boundary";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\n\
             Content-Type: text/plain\r\n\r\n\
             {content}\r\n\
             --{boundary}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/api/ingest")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn query_request(json: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/query")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_server(dir.path(), true).build_router();

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            read_json(response).await,
            serde_json::json!({ "status": "healthy" })
        );
    }

    #[tokio::test]
    async fn query_on_empty_store_is_a_soft_200() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_server(dir.path(), true).build_router();

        let response = router
            .oneshot(query_request(r#"{"query":"what is in the document?"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(
            body["response"],
            "No documents have been ingested yet. Please upload documents first."
        );
        assert_eq!(body["sources"], serde_json::json!([]));
        assert_eq!(body["confidence"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn ingest_then_query_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_server(dir.path(), true).build_router();

        let response = router
            .clone()
            .oneshot(multipart_request(
                "notes.txt",
                "tokio is an async runtime for rust",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["filename"], "notes.txt");
        assert_eq!(body["chunks"], 1);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("notes.txt"));

        // raw upload lands in the documents directory under its original name
        assert!(dir.path().join("documents/notes.txt").exists());

        let response = router
            .oneshot(query_request(r#"{"query":"what runtime?","top_k":3}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["response"], "stub answer");
        assert_eq!(body["sources"], serde_json::json!(["notes.txt"]));
    }

    #[tokio::test]
    async fn same_name_upload_overwrites_raw_file() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_server(dir.path(), true).build_router();

        let response = router
            .clone()
            .oneshot(multipart_request("notes.txt", "first version"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router
            .clone()
            .oneshot(multipart_request("notes.txt", "second version"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_json(response).await["chunks"], 1);

        let on_disk = std::fs::read_to_string(dir.path().join("documents/notes.txt")).unwrap();
        assert_eq!(on_disk, "second version");
    }

    #[tokio::test]
    async fn ingest_without_store_is_a_500_with_detail() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_server(dir.path(), false).build_router();

        let response = router
            .oneshot(multipart_request("doc.txt", "content"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = read_json(response).await;
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .contains("not initialized"));
    }

    #[tokio::test]
    async fn upload_filename_is_stripped_to_its_basename() {
        let dir = tempfile::tempdir().unwrap();
        let router = test_server(dir.path(), true).build_router();

        let response = router
            .oneshot(multipart_request("../../etc/evil.txt", "content"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        assert_eq!(body["filename"], "evil.txt");
        assert!(dir.path().join("documents/evil.txt").exists());
    }
}
