//! Recursive text splitting with overlap

use std::collections::VecDeque;

use unicode_segmentation::UnicodeSegmentation;

use crate::types::{Chunk, ChunkSource};

use super::loader::Segment;

/// Separator ladder: paragraph, line, word, raw character cut
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Text splitter with configurable size and overlap.
///
/// Splits recursively, preferring paragraph over line over word boundaries
/// before cutting at raw characters, then merges the pieces greedily up to
/// `chunk_size` while carrying at most `chunk_overlap` characters of trailing
/// context into the next chunk. Identical input always yields identical
/// boundaries.
pub struct TextSplitter {
    /// Target chunk size in characters
    chunk_size: usize,
    /// Overlap between consecutive chunks
    chunk_overlap: usize,
}

impl TextSplitter {
    /// Create a new splitter
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    /// Split segments into chunks, attaching the resolved filename and a
    /// document-wide running index. Whitespace-only pieces are dropped.
    pub fn split_segments(&self, segments: &[Segment], filename: &str) -> Vec<Chunk> {
        let page_count = segments.iter().filter_map(|s| s.page_number).max();
        let mut chunks = Vec::new();

        for segment in segments {
            for piece in self.split_text(&segment.content) {
                let source = ChunkSource {
                    filename: filename.to_string(),
                    page_number: segment.page_number,
                    page_count,
                };
                chunks.push(Chunk::new(piece, source, chunks.len() as u32));
            }
        }

        chunks
    }

    /// Split text into overlapping pieces no longer than `chunk_size`,
    /// except when a single unbreakable token exceeds it.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &SEPARATORS)
            .into_iter()
            .filter(|piece| !piece.trim().is_empty())
            .collect()
    }

    fn split_recursive(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let (separator, remaining) = pick_separator(text, separators);

        let splits: Vec<String> = if separator.is_empty() {
            text.graphemes(true).map(str::to_string).collect()
        } else {
            text.split(separator).map(str::to_string).collect()
        };

        let mut chunks = Vec::new();
        let mut good: Vec<String> = Vec::new();

        for split in splits {
            if split.len() < self.chunk_size {
                good.push(split);
            } else {
                if !good.is_empty() {
                    chunks.extend(self.merge_splits(std::mem::take(&mut good), separator));
                }
                if remaining.is_empty() {
                    // Unbreakable oversized token, emit as-is
                    chunks.push(split);
                } else {
                    chunks.extend(self.split_recursive(&split, remaining));
                }
            }
        }

        if !good.is_empty() {
            chunks.extend(self.merge_splits(good, separator));
        }

        chunks
    }

    /// Greedily merge splits up to `chunk_size`, carrying at most
    /// `chunk_overlap` characters of trailing context forward.
    fn merge_splits(&self, splits: Vec<String>, separator: &str) -> Vec<String> {
        let sep_len = separator.len();
        let mut docs = Vec::new();
        let mut current: VecDeque<String> = VecDeque::new();
        let mut total = 0usize;

        for split in splits {
            let len = split.len();
            let sep = if current.is_empty() { 0 } else { sep_len };

            if total + len + sep > self.chunk_size && !current.is_empty() {
                docs.push(join_splits(&current, separator));

                // Drop leading context until what remains fits the overlap
                // budget alongside the incoming split
                while total > self.chunk_overlap
                    || (total + len + if current.is_empty() { 0 } else { sep_len }
                        > self.chunk_size
                        && total > 0)
                {
                    let removed = current.pop_front().expect("loop requires elements");
                    total -= removed.len() + if current.is_empty() { 0 } else { sep_len };
                }
            }

            if !current.is_empty() {
                total += sep_len;
            }
            total += len;
            current.push_back(split);
        }

        if !current.is_empty() {
            docs.push(join_splits(&current, separator));
        }

        docs
    }
}

fn join_splits(parts: &VecDeque<String>, separator: &str) -> String {
    parts
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator)
        .trim()
        .to_string()
}

/// First separator present in the text wins; the empty string always matches
fn pick_separator<'a>(text: &str, separators: &'a [&'a str]) -> (&'a str, &'a [&'a str]) {
    for (i, sep) in separators.iter().enumerate() {
        if sep.is_empty() || text.contains(sep) {
            return (sep, &separators[i + 1..]);
        }
    }
    ("", &[])
}
