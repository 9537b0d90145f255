//! Front-matter parsing for knowledge documents.
//!
//! A knowledge document opens with a `---`-delimited header block of
//! `key: value` lines carrying the document's metadata. This module
//! locates that block, parses its values (quoted scalars, JSON arrays,
//! bare scalars), and validates the six required fields into a
//! [`DocumentMetadata`].
//!
//! All failures here are recoverable parse errors; the orchestrator
//! records them per file and moves on.

use anyhow::{anyhow, bail, Result};
use std::collections::HashMap;

use crate::models::DocumentMetadata;

/// Required fields, in the order they are checked (and reported missing).
const REQUIRED_FIELDS: [&str; 6] = [
    "title",
    "category",
    "tags",
    "sport",
    "difficulty",
    "source_id",
];

/// A parsed front-matter value before validation.
#[derive(Debug, Clone)]
enum FieldValue {
    Scalar(String),
    List(Vec<String>),
}

impl FieldValue {
    fn is_present(&self) -> bool {
        match self {
            FieldValue::Scalar(s) => !s.is_empty(),
            FieldValue::List(items) => !items.is_empty(),
        }
    }
}

/// Split a document into its front-matter block and body.
///
/// The block starts with a line containing only `---` at the top of the
/// document and ends at the next such line. Returns `(block, body)` where
/// `block` is the text between the delimiters and `body` is everything
/// after the closing delimiter. Returns `None` when no complete block
/// exists.
pub fn split(text: &str) -> Option<(&str, &str)> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim() != "---" {
        return None;
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if line.trim() == "---" {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }
    None
}

/// Parse and validate a document's front-matter.
pub fn parse(text: &str) -> Result<DocumentMetadata> {
    let (block, _) = split(text).ok_or_else(|| anyhow!("no front-matter found"))?;
    let mut fields = parse_block(block)?;

    for field in REQUIRED_FIELDS {
        if !fields.get(field).is_some_and(FieldValue::is_present) {
            bail!("missing required front-matter field: `{field}`");
        }
    }

    let tags = match fields.remove("tags") {
        Some(FieldValue::List(items)) => items,
        _ => bail!("field `tags` must be an array"),
    };

    Ok(DocumentMetadata {
        title: take_scalar(&mut fields, "title")?,
        category: take_scalar(&mut fields, "category")?,
        tags,
        sport: take_scalar(&mut fields, "sport")?,
        difficulty: take_scalar(&mut fields, "difficulty")?,
        source_id: take_scalar(&mut fields, "source_id")?,
    })
}

/// Parse the lines inside the block into raw field values.
fn parse_block(block: &str) -> Result<HashMap<String, FieldValue>> {
    let mut fields = HashMap::new();

    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();

        let parsed = if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
            // Quotes are stripped literally; no escape processing.
            FieldValue::Scalar(value[1..value.len() - 1].to_string())
        } else if value.starts_with('[') {
            let items: Vec<String> = serde_json::from_str(value)
                .map_err(|_| anyhow!("invalid array value for field `{key}`"))?;
            FieldValue::List(items)
        } else {
            FieldValue::Scalar(value.to_string())
        };

        fields.insert(key.to_string(), parsed);
    }

    Ok(fields)
}

fn take_scalar(fields: &mut HashMap<String, FieldValue>, key: &str) -> Result<String> {
    match fields.remove(key) {
        Some(FieldValue::Scalar(s)) => Ok(s),
        Some(FieldValue::List(_)) => bail!("field `{key}` must be a string"),
        // Presence was validated above.
        None => bail!("missing required front-matter field: `{key}`"),
    }
}
