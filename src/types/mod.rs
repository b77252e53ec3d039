//! Request, response, and chunk types

pub mod document;
pub mod query;
pub mod response;

pub use document::{Chunk, ChunkSource, FileType};
pub use query::QueryRequest;
pub use response::{IngestResponse, QueryResponse};
