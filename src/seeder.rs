//! End-to-end seed orchestration.
//!
//! [`Seeder::run`] drives one pass over the knowledge tree: discover
//! files, parse and chunk each one, delete the document's previously
//! persisted chunks, and embed each chunk through the remote endpoint.
//! Processing is strictly sequential — one file, one chunk, one network
//! call at a time — to respect the service's rate limits and keep log
//! ordering deterministic.
//!
//! Per-file and per-chunk failures never abort the run; they become
//! [`SeedError`] records in the returned [`SeedResult`]. `run` itself
//! fails only when the source directory cannot be enumerated.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::chunker;
use crate::config::SeedConfig;
use crate::discovery;
use crate::embedder::EmbeddingClient;
use crate::frontmatter;
use crate::models::{SeedError, SeedResult};
use crate::ports::{FileSystem, HttpClient, Sleeper};
use crate::report::{SeedEvent, SeedReporter};

pub struct Seeder<'a> {
    config: &'a SeedConfig,
    fs: &'a dyn FileSystem,
    http: &'a dyn HttpClient,
    sleeper: &'a dyn Sleeper,
    reporter: &'a dyn SeedReporter,
}

impl<'a> Seeder<'a> {
    pub fn new(
        config: &'a SeedConfig,
        fs: &'a dyn FileSystem,
        http: &'a dyn HttpClient,
        sleeper: &'a dyn Sleeper,
        reporter: &'a dyn SeedReporter,
    ) -> Self {
        Self {
            config,
            fs,
            http,
            sleeper,
            reporter,
        }
    }

    /// Seed every eligible document under `root`.
    ///
    /// In dry-run mode files are still read, parsed, and chunked, but no
    /// network call is made and no delay is taken.
    pub async fn run(&self, root: &Path, dry_run: bool) -> Result<SeedResult> {
        let files = discovery::discover_documents(self.fs, root)
            .with_context(|| format!("cannot enumerate source directory {}", root.display()))?;
        self.reporter.report(SeedEvent::Discovered { count: files.len() });

        let mut result = SeedResult {
            documents_found: files.len() as u64,
            ..Default::default()
        };
        let embedder = EmbeddingClient::new(self.config, self.http, self.sleeper);

        for relative in &files {
            let file = relative.to_string_lossy().into_owned();
            self.reporter
                .report(SeedEvent::DocumentStarted { file: file.clone() });

            let text = match self.fs.read_to_string(&root.join(relative)) {
                Ok(text) => text,
                Err(e) => {
                    self.record_document_error(&mut result, &file, &e);
                    continue;
                }
            };

            let metadata = match frontmatter::parse(&text) {
                Ok(metadata) => Arc::new(metadata),
                Err(e) => {
                    self.record_document_error(&mut result, &file, &e);
                    continue;
                }
            };

            let chunks = chunker::chunk_document(&metadata, &text);
            result.chunks_generated += chunks.len() as u64;
            self.reporter.report(SeedEvent::DocumentChunked {
                file: file.clone(),
                chunks: chunks.len(),
            });

            if dry_run {
                continue;
            }

            // Idempotent replace: clear the document's prior chunks first.
            // On failure, skip embedding rather than write against
            // possibly-stale state.
            if let Err(e) = embedder.delete_document(&metadata.source_id).await {
                self.record_document_error(&mut result, &file, &e);
                continue;
            }

            for chunk in &chunks {
                match embedder.create_embedding(chunk).await {
                    Ok(_embedding_id) => {
                        result.embeddings_created += 1;
                        self.reporter.report(SeedEvent::ChunkEmbedded {
                            file: file.clone(),
                            chunk_index: chunk.chunk_index,
                        });
                    }
                    Err(e) => {
                        self.reporter.report(SeedEvent::Failed {
                            file: file.clone(),
                            chunk_index: chunk.chunk_index as i64,
                            error: format!("{e:#}"),
                        });
                        result
                            .errors
                            .push(SeedError::chunk(&file, chunk.chunk_index, format!("{e:#}")));
                    }
                }
                // Fixed spacing after every call, success or failure,
                // to bound the request rate.
                self.sleeper.sleep(self.config.request_spacing).await;
            }
        }

        Ok(result)
    }

    fn record_document_error(&self, result: &mut SeedResult, file: &str, error: &anyhow::Error) {
        self.reporter.report(SeedEvent::Failed {
            file: file.to_string(),
            chunk_index: SeedError::DOCUMENT_LEVEL,
            error: format!("{error:#}"),
        });
        result
            .errors
            .push(SeedError::document(file, format!("{error:#}")));
    }
}
