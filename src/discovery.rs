//! Source file discovery.
//!
//! Recursively enumerates eligible markdown files under the knowledge
//! root through the [`FileSystem`] port, so tests never touch the real
//! filesystem. Eligibility is glob-based: include `**/*.md`, exclude
//! `**/README.md`. Results are relative to the root and sorted for
//! reproducible processing order and logs.

use anyhow::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};

use crate::ports::FileSystem;

const INCLUDE_GLOBS: [&str; 1] = ["**/*.md"];
const EXCLUDE_GLOBS: [&str; 1] = ["**/README.md"];

/// Enumerate eligible documents under `root`, as sorted relative paths.
///
/// A listing failure at the root (e.g. the directory does not exist) is
/// fatal and propagates to the caller.
pub fn discover_documents(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    let include = build_globset(&INCLUDE_GLOBS)?;
    let exclude = build_globset(&EXCLUDE_GLOBS)?;

    let mut files = Vec::new();
    walk(fs, root, Path::new(""), &include, &exclude, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(
    fs: &dyn FileSystem,
    dir: &Path,
    relative: &Path,
    include: &GlobSet,
    exclude: &GlobSet,
    out: &mut Vec<PathBuf>,
) -> Result<()> {
    for entry in fs.list_dir(dir)? {
        let child = dir.join(&entry.name);
        let child_relative = relative.join(&entry.name);
        if entry.is_dir {
            walk(fs, &child, &child_relative, include, exclude, out)?;
        } else if include.is_match(&child_relative) && !exclude.is_match(&child_relative) {
            out.push(child_relative);
        }
    }
    Ok(())
}

fn build_globset(patterns: &[&str]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}
