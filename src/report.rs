//! Seed run progress reporting.
//!
//! Progress is emitted on **stderr** so stdout stays parseable (the
//! final summary, or the `--json` result, goes to stdout). Human and
//! JSON-lines reporters are provided; the default picks human output
//! when stderr is a TTY.

use std::io::Write;

/// A single progress event during a seed run.
#[derive(Clone, Debug)]
pub enum SeedEvent {
    /// Discovery finished; `count` eligible documents were found.
    Discovered { count: usize },
    /// A document's processing began.
    DocumentStarted { file: String },
    /// A document parsed into `chunks` sections.
    DocumentChunked { file: String, chunks: usize },
    /// One chunk was persisted.
    ChunkEmbedded { file: String, chunk_index: usize },
    /// A recoverable failure was recorded. `chunk_index` is `-1` for
    /// document-level failures.
    Failed {
        file: String,
        chunk_index: i64,
        error: String,
    },
}

/// Reports seed progress. Implementations write to stderr.
pub trait SeedReporter: Send + Sync {
    fn report(&self, event: SeedEvent);
}

/// Human-friendly progress lines.
pub struct StderrReporter;

impl SeedReporter for StderrReporter {
    fn report(&self, event: SeedEvent) {
        let line = match &event {
            SeedEvent::Discovered { count } => {
                format!("seed  found {count} documents\n")
            }
            SeedEvent::DocumentStarted { file } => format!("seed  {file}\n"),
            SeedEvent::DocumentChunked { file, chunks } => {
                format!("seed  {file}  {chunks} chunks\n")
            }
            SeedEvent::ChunkEmbedded { file, chunk_index } => {
                format!("seed  {file}  chunk {chunk_index} embedded\n")
            }
            SeedEvent::Failed {
                file,
                chunk_index,
                error,
            } => {
                if *chunk_index < 0 {
                    format!("seed  {file}  failed: {error}\n")
                } else {
                    format!("seed  {file}  chunk {chunk_index} failed: {error}\n")
                }
            }
        };
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(line.as_bytes());
        let _ = stderr.flush();
    }
}

/// Machine-readable progress: one JSON object per line.
pub struct JsonReporter;

impl SeedReporter for JsonReporter {
    fn report(&self, event: SeedEvent) {
        let obj = match &event {
            SeedEvent::Discovered { count } => serde_json::json!({
                "event": "discovered",
                "count": count,
            }),
            SeedEvent::DocumentStarted { file } => serde_json::json!({
                "event": "document_started",
                "file": file,
            }),
            SeedEvent::DocumentChunked { file, chunks } => serde_json::json!({
                "event": "document_chunked",
                "file": file,
                "chunks": chunks,
            }),
            SeedEvent::ChunkEmbedded { file, chunk_index } => serde_json::json!({
                "event": "chunk_embedded",
                "file": file,
                "chunk_index": chunk_index,
            }),
            SeedEvent::Failed {
                file,
                chunk_index,
                error,
            } => serde_json::json!({
                "event": "failed",
                "file": file,
                "chunk_index": chunk_index,
                "error": error,
            }),
        };
        if let Ok(line) = serde_json::to_string(&obj) {
            let mut stderr = std::io::stderr().lock();
            let _ = writeln!(stderr, "{line}");
            let _ = stderr.flush();
        }
    }
}

/// No-op reporter when progress is disabled (and for tests).
pub struct NoReporter;

impl SeedReporter for NoReporter {
    fn report(&self, _event: SeedEvent) {}
}

/// Progress mode for the CLI: off, human (stderr), or JSON (stderr).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProgressMode {
    Off,
    Human,
    Json,
}

impl ProgressMode {
    /// Default: human progress when stderr is a TTY, otherwise off.
    pub fn default_for_tty() -> Self {
        if atty::is(atty::Stream::Stderr) {
            ProgressMode::Human
        } else {
            ProgressMode::Off
        }
    }

    pub fn reporter(&self) -> Box<dyn SeedReporter> {
        match self {
            ProgressMode::Off => Box::new(NoReporter),
            ProgressMode::Human => Box::new(StderrReporter),
            ProgressMode::Json => Box::new(JsonReporter),
        }
    }
}
