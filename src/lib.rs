//! # kbseed
//!
//! Seeding pipeline for the coaching knowledge base: turns a directory
//! tree of structured markdown documents into persisted, retrievable
//! embedding records via a remote embedding endpoint.
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────┐   ┌──────────────┐   ┌──────────┐   ┌─────────────┐
//! │ discovery │──▶│ front-matter │──▶│ chunker  │──▶│  embedder    │
//! │ *.md walk │   │   metadata   │   │ sections │   │ delete+POST  │
//! └───────────┘   └──────────────┘   └──────────┘   └─────────────┘
//! ```
//!
//! Each document's previously persisted chunks are deleted by
//! `source_id` before its fresh chunks are embedded, so re-runs converge
//! to the same persisted state (idempotent replace). Per-file and
//! per-chunk failures are aggregated into a [`models::SeedResult`]
//! instead of aborting the run.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | Core data types |
//! | [`frontmatter`] | Metadata header parsing and validation |
//! | [`chunker`] | Section-level body chunking |
//! | [`discovery`] | Recursive markdown file enumeration |
//! | [`ports`] | Filesystem / HTTP / sleep collaborator seams |
//! | [`embedder`] | Remote delete and embedding calls with retry |
//! | [`seeder`] | End-to-end run orchestration |
//! | [`config`] | Environment-derived configuration |
//! | [`report`] | Stderr progress reporting |

pub mod chunker;
pub mod config;
pub mod discovery;
pub mod embedder;
pub mod frontmatter;
pub mod models;
pub mod ports;
pub mod report;
pub mod seeder;
