//! Chunk types with source tracking

use serde::{Deserialize, Serialize};
use std::path::Path;
use uuid::Uuid;

/// Recognized file types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// PDF document, extracted page by page
    Pdf,
    /// Plain text; also the fallback for unrecognized extensions
    Txt,
}

impl FileType {
    /// Detect file type from the path extension
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match ext.as_deref() {
            Some("pdf") => Self::Pdf,
            _ => Self::Txt,
        }
    }
}

/// Source information for a chunk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkSource {
    /// Original filename as uploaded
    pub filename: String,
    /// Page number (1-indexed, paginated formats only)
    pub page_number: Option<u32>,
    /// Total pages in the source document
    pub page_count: Option<u32>,
}

impl ChunkSource {
    /// Source info for a non-paginated text file
    pub fn text(filename: String) -> Self {
        Self {
            filename,
            page_number: None,
            page_count: None,
        }
    }

    /// Source info for a PDF page
    pub fn pdf(filename: String, page: u32, total_pages: u32) -> Self {
        Self {
            filename,
            page_number: Some(page),
            page_count: Some(total_pages),
        }
    }
}

/// A chunk of text from an ingested document, the atomic unit of retrieval.
/// Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique chunk ID
    pub id: Uuid,
    /// Text content
    pub content: String,
    /// Source information
    pub source: ChunkSource,
    /// Chunk index within the document
    pub chunk_index: u32,
}

impl Chunk {
    /// Create a new chunk
    pub fn new(content: String, source: ChunkSource, chunk_index: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            source,
            chunk_index,
        }
    }
}
