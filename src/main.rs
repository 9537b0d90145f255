//! # kbseed CLI
//!
//! Seeds the coaching knowledge base from a directory of markdown
//! documents.
//!
//! ```bash
//! SUPABASE_URL=... SUPABASE_SERVICE_ROLE_KEY=... kbseed --root ./knowledge
//! kbseed --root ./knowledge --dry-run       # parse and count only
//! kbseed --root ./knowledge --json          # machine-readable summary
//! ```
//!
//! Exit code is 0 only for a clean run: missing environment variables,
//! a missing source directory, or any aggregated per-file/per-chunk
//! error exits 1 (the summary is still printed first).

use anyhow::{bail, Result};
use clap::Parser;
use std::path::PathBuf;

use kbseed::config::SeedConfig;
use kbseed::models::{SeedError, SeedResult};
use kbseed::ports::{OsFileSystem, ReqwestClient, TokioSleeper};
use kbseed::report::ProgressMode;
use kbseed::seeder::Seeder;

/// Seed the coaching knowledge base from structured markdown documents.
///
/// Requires `SUPABASE_URL` and `SUPABASE_SERVICE_ROLE_KEY` in the
/// environment; `SUPABASE_ACCESS_TOKEN` optionally scopes the embedding
/// calls to a user token.
#[derive(Parser)]
#[command(
    name = "kbseed",
    about = "Seed the coaching knowledge base from structured markdown documents",
    version
)]
struct Cli {
    /// Root directory containing the knowledge markdown tree.
    #[arg(long, default_value = "./knowledge")]
    root: PathBuf,

    /// Parse, chunk, and count only — no network calls.
    #[arg(long)]
    dry_run: bool,

    /// Print the final result as JSON on stdout instead of the human summary.
    #[arg(long)]
    json: bool,

    /// Progress output on stderr: auto, human, json, or off.
    #[arg(long, default_value = "auto")]
    progress: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = SeedConfig::from_env()?;

    let fs = OsFileSystem;
    let http = ReqwestClient::new(config.http_timeout)?;
    let sleeper = TokioSleeper;
    let reporter = parse_progress_mode(&cli.progress)?.reporter();

    let seeder = Seeder::new(&config, &fs, &http, &sleeper, reporter.as_ref());
    let result = seeder.run(&cli.root, cli.dry_run).await?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_summary(&cli.root, cli.dry_run, &result);
    }

    if !result.errors.is_empty() {
        std::process::exit(1);
    }
    Ok(())
}

fn parse_progress_mode(mode: &str) -> Result<ProgressMode> {
    match mode {
        "auto" => Ok(ProgressMode::default_for_tty()),
        "human" => Ok(ProgressMode::Human),
        "json" => Ok(ProgressMode::Json),
        "off" => Ok(ProgressMode::Off),
        other => bail!("unknown progress mode '{other}'; expected auto, human, json, or off"),
    }
}

fn print_summary(root: &std::path::Path, dry_run: bool, result: &SeedResult) {
    if dry_run {
        println!("seed {} (dry-run)", root.display());
    } else {
        println!("seed {}", root.display());
    }
    println!("  documents found: {}", result.documents_found);
    println!("  chunks generated: {}", result.chunks_generated);
    println!("  embeddings created: {}", result.embeddings_created);
    println!("  errors: {}", result.errors.len());
    for error in &result.errors {
        if error.chunk_index == SeedError::DOCUMENT_LEVEL {
            println!("  {} [document]: {}", error.file, error.error);
        } else {
            println!("  {} [chunk {}]: {}", error.file, error.chunk_index, error.error);
        }
    }
    if result.errors.is_empty() {
        println!("ok");
    }
}
