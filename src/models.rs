//! Core data types flowing through the seeding pipeline.
//!
//! These are pure values constructed per run from file contents; nothing
//! here is persisted locally. Persistence happens through the remote
//! embedding endpoint.

use serde::Serialize;
use std::sync::Arc;

/// Validated front-matter metadata for one knowledge document.
///
/// All fields are required and non-empty. `source_id` is the stable
/// identity key used to delete-and-replace a document's previously
/// persisted chunks on re-run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentMetadata {
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    pub sport: String,
    pub difficulty: String,
    pub source_id: String,
}

/// One retrievable unit of a document, corresponding to one body section.
#[derive(Debug, Clone)]
pub struct DocumentChunk {
    /// Composite title: `"<document title> > <section title>"`.
    pub title: String,
    /// Trimmed section text. `###`+ sub-headers are preserved verbatim.
    pub content: String,
    /// 0-based position among the chunks actually emitted for the document.
    pub chunk_index: usize,
    /// Shared document metadata.
    pub metadata: Arc<DocumentMetadata>,
}

/// A recoverable failure recorded during a seed run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedError {
    /// Path of the source file, relative to the knowledge root.
    pub file: String,
    /// The failing chunk's index, or [`SeedError::DOCUMENT_LEVEL`] for
    /// document-level failures (parse or delete errors).
    pub chunk_index: i64,
    pub error: String,
}

impl SeedError {
    /// Sentinel `chunk_index` for failures not tied to a single chunk.
    pub const DOCUMENT_LEVEL: i64 = -1;

    pub fn document(file: &str, error: impl std::fmt::Display) -> Self {
        Self {
            file: file.to_string(),
            chunk_index: Self::DOCUMENT_LEVEL,
            error: error.to_string(),
        }
    }

    pub fn chunk(file: &str, chunk_index: usize, error: impl std::fmt::Display) -> Self {
        Self {
            file: file.to_string(),
            chunk_index: chunk_index as i64,
            error: error.to_string(),
        }
    }
}

/// Aggregated outcome of one seed run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedResult {
    /// Eligible files discovered under the root.
    pub documents_found: u64,
    /// Chunks parsed, including ones that later failed to embed.
    pub chunks_generated: u64,
    /// Chunks successfully persisted through the embedding endpoint.
    pub embeddings_created: u64,
    /// All recorded per-file and per-chunk errors, in occurrence order.
    pub errors: Vec<SeedError>,
}
