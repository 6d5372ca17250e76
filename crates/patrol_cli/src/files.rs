//! File collection for scanning.
//!
//! Walks directories with gitignore support and applies include/exclude
//! globs. Binary detection is left to the scanner so skipped files are
//! counted in the scan summary.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use ignore::WalkBuilder;
use ignore::overrides::{Override, OverrideBuilder};
use patrol_core::config::ALWAYS_EXCLUDED;

/// Walks `paths` and returns the absolute path of every regular file that
/// passes the filters, sorted and deduplicated.
///
/// Explicit file arguments are always kept. Directory entries must match
/// `include` (when given) and none of `excludes`; dependency and report
/// directories are always excluded.
pub fn collect_files(
    paths: &[PathBuf],
    include: Option<&str>,
    excludes: &[String],
    respect_gitignore: bool,
) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let path = std::path::absolute(path).with_context(|| format!("failed to resolve {}", path.display()))?;

        if path.is_file() {
            files.push(path);
            continue;
        }
        if !path.is_dir() {
            continue;
        }

        let overrides = build_overrides(&path, include, excludes)?;
        let walker = WalkBuilder::new(&path)
            .hidden(false)
            .git_ignore(respect_gitignore)
            .git_global(respect_gitignore)
            .git_exclude(respect_gitignore)
            .require_git(false)
            .overrides(overrides)
            .build();

        for entry in walker.flatten() {
            if entry.file_type().is_some_and(|ft| ft.is_file()) {
                files.push(entry.into_path());
            }
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn build_overrides(root: &Path, include: Option<&str>, excludes: &[String]) -> anyhow::Result<Override> {
    let mut builder = OverrideBuilder::new(root);

    if let Some(glob) = include {
        builder
            .add(glob)
            .with_context(|| format!("invalid include pattern: {glob}"))?;
    }

    for pattern in excludes.iter().map(String::as_str).chain(ALWAYS_EXCLUDED.iter().copied()) {
        builder
            .add(&format!("!{pattern}"))
            .with_context(|| format!("invalid exclude pattern: {pattern}"))?;
    }

    builder.build().context("failed to build path filters")
}
