//! Document ingestion: loading and chunking

mod chunker;
mod loader;

pub use chunker::TextSplitter;
pub use loader::{DocumentLoader, Segment};
