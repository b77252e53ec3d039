//! Extension-routed document loading

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::FileType;

/// A raw text segment produced by the loader.
///
/// The loader only tags page positions; the caller attaches the resolved
/// filename when chunking.
#[derive(Debug, Clone)]
pub struct Segment {
    /// Extracted text
    pub content: String,
    /// Page number (1-indexed) for paginated formats
    pub page_number: Option<u32>,
}

/// Loads files into text segments by extension
pub struct DocumentLoader;

impl DocumentLoader {
    /// Load a file. PDFs yield one segment per page; every other extension
    /// is read as UTF-8 text in a single segment.
    pub fn load(path: &Path) -> Result<Vec<Segment>> {
        let data = std::fs::read(path)
            .map_err(|e| Error::Load(format!("cannot read {}: {}", path.display(), e)))?;

        match FileType::from_path(path) {
            FileType::Pdf => Self::load_pdf(&data),
            FileType::Txt => Self::load_text(data),
        }
    }

    fn load_text(data: Vec<u8>) -> Result<Vec<Segment>> {
        let content =
            String::from_utf8(data).map_err(|e| Error::Load(format!("not valid UTF-8: {}", e)))?;
        Ok(vec![Segment {
            content,
            page_number: None,
        }])
    }

    /// Page-wise extraction via lopdf, falling back to pdf-extract's
    /// whole-document extractor for PDFs whose fonts defeat lopdf.
    fn load_pdf(data: &[u8]) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();

        if let Ok(doc) = lopdf::Document::load_mem(data) {
            for page_number in doc.get_pages().keys() {
                match doc.extract_text(&[*page_number]) {
                    Ok(text) => {
                        let text = text.replace('\0', "");
                        if !text.trim().is_empty() {
                            segments.push(Segment {
                                content: text,
                                page_number: Some(*page_number),
                            });
                        }
                    }
                    Err(e) => tracing::debug!("no text on page {}: {}", page_number, e),
                }
            }
        }

        if segments.is_empty() {
            let text = pdf_extract::extract_text_from_mem(data)
                .map_err(|e| Error::Load(format!("PDF extraction failed: {}", e)))?;
            if text.trim().is_empty() {
                return Err(Error::Load(
                    "no text content could be extracted from PDF".to_string(),
                ));
            }
            segments.push(Segment {
                content: text,
                page_number: Some(1),
            });
        }

        Ok(segments)
    }
}
