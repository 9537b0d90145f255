//! Section-level document chunker.
//!
//! Splits a document body into one chunk per `## ` section, plus an
//! optional Introduction chunk for text before the first section header.
//! Section granularity is deliberate: each persisted unit stays topically
//! coherent for retrieval without over-fragmenting documents.
//!
//! Lines are classified into a small set of kinds and folded into
//! sections in a single pass; no regex scanning. `###`+ sub-headers are
//! left verbatim inside their section's content. A `## ` line inside a
//! fenced code block still starts a section; well-formed knowledge
//! documents do not contain one.

use std::sync::Arc;

use crate::frontmatter;
use crate::models::{DocumentChunk, DocumentMetadata};

/// Classification of one body line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    H1,
    H2,
    H3Plus,
    Blank,
    Text,
}

fn classify(line: &str) -> LineKind {
    if line.trim().is_empty() {
        LineKind::Blank
    } else if line.starts_with("## ") {
        LineKind::H2
    } else if line.starts_with("###") {
        LineKind::H3Plus
    } else if line.starts_with("# ") {
        LineKind::H1
    } else {
        LineKind::Text
    }
}

/// Split a document's body into ordered, titled chunks.
///
/// `text` is the raw document including front-matter; the body is
/// everything after the front-matter block. An empty body yields an
/// empty list. `chunk_index` values are contiguous `0..N-1` among the
/// chunks actually emitted; sections with no content are dropped without
/// leaving an index gap.
pub fn chunk_document(metadata: &Arc<DocumentMetadata>, text: &str) -> Vec<DocumentChunk> {
    let body = frontmatter::split(text).map_or(text, |(_, body)| body).trim();
    if body.is_empty() {
        return Vec::new();
    }

    let mut intro_lines: Vec<&str> = Vec::new();
    let mut sections: Vec<(&str, Vec<&str>)> = Vec::new();

    for line in body.lines() {
        if classify(line) == LineKind::H2 {
            sections.push((line[3..].trim(), Vec::new()));
        } else {
            match sections.last_mut() {
                Some((_, content)) => content.push(line),
                None => intro_lines.push(line),
            }
        }
    }

    let mut chunks = Vec::new();

    if let Some(content) = introduction_text(&intro_lines) {
        push_chunk(&mut chunks, metadata, "Introduction", content);
    }

    for (section_title, lines) in sections {
        let content = lines.join("\n").trim().to_string();
        if content.is_empty() {
            continue;
        }
        push_chunk(&mut chunks, metadata, section_title, content);
    }

    chunks
}

/// Content for the Introduction chunk, if any.
///
/// The candidate is everything before the first `## ` header. A bare
/// top-level `# ` title line is stripped; if nothing meaningful remains
/// (including the candidate being exactly that title line), no chunk is
/// emitted.
fn introduction_text(lines: &[&str]) -> Option<String> {
    let rest = match lines {
        [first, rest @ ..] if classify(first) == LineKind::H1 => rest,
        _ => lines,
    };
    let content = rest.join("\n").trim().to_string();
    if content.is_empty() {
        None
    } else {
        Some(content)
    }
}

fn push_chunk(
    chunks: &mut Vec<DocumentChunk>,
    metadata: &Arc<DocumentMetadata>,
    section_title: &str,
    content: String,
) {
    let chunk_index = chunks.len();
    chunks.push(DocumentChunk {
        title: format!("{} > {}", metadata.title, section_title),
        content,
        chunk_index,
        metadata: Arc::clone(metadata),
    });
}
