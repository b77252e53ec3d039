//! Document ingestion endpoint

use axum::extract::{Multipart, State};
use axum::Json;
use std::path::Path;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::IngestResponse;

/// POST /api/ingest - Upload and index a document.
///
/// The raw file is saved to the documents directory under its original
/// filename (overwriting a same-named file), then handed to the orchestrator.
pub async fn ingest_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<IngestResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Internal(format!("failed to read multipart field: {}", e)))?
    {
        let Some(raw_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        // Strip any path components from the client-supplied name
        let filename = Path::new(&raw_name)
            .file_name()
            .and_then(|n| n.to_str())
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::Internal(format!("invalid upload filename: {}", raw_name)))?
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Internal(format!("failed to read upload: {}", e)))?;

        tracing::info!("upload: {} ({} bytes)", filename, data.len());

        let path = state.documents_dir().join(&filename);
        tokio::fs::write(&path, &data)
            .await
            .map_err(|e| Error::Store(format!("failed to save upload: {}", e)))?;

        let chunks = state.service().ingest(&path).await?;

        return Ok(Json(IngestResponse::success(filename, chunks)));
    }

    Err(Error::Internal(
        "no file field in multipart request".to_string(),
    ))
}
