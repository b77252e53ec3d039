//! Application state for the RAG server

use std::path::Path;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::service::RagService;

/// Shared application state wrapping the injected orchestrator
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    service: RagService,
}

impl AppState {
    /// Wrap an explicitly constructed orchestrator
    pub fn new(service: RagService) -> Self {
        Self {
            inner: Arc::new(AppStateInner { service }),
        }
    }

    /// The RAG orchestrator
    pub fn service(&self) -> &RagService {
        &self.inner.service
    }

    /// Service configuration
    pub fn config(&self) -> &RagConfig {
        self.inner.service.config()
    }

    /// Directory holding raw uploaded files
    pub fn documents_dir(&self) -> &Path {
        &self.config().storage.documents_dir
    }
}
