//! Configuration loading and the shared scan pipeline.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context as _;
use patrol_core::prelude::*;

use crate::files::collect_files;
use crate::ui::{create_file_progress, print_warning};
use crate::{CONFIG_FILENAME, SelectionArgs};

/// Message shown when a scan is requested with an empty pattern list.
pub const NO_PATTERNS_MESSAGE: &str =
    "No security patterns configured. Add patterns with `patrol patterns add` first.";

/// Resolves the configuration path, defaulting to `.patrol.toml` in the
/// working directory.
#[must_use]
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit.unwrap_or(Path::new(CONFIG_FILENAME)).to_path_buf()
}

/// Resolves the workspace root that receives `security-reports/`.
///
/// An explicit `--root` wins; otherwise the root is the directory holding the
/// configuration file.
#[must_use]
pub fn workspace_root(selection: &SelectionArgs, explicit: Option<&Path>) -> PathBuf {
    if let Some(root) = explicit {
        return root.to_path_buf();
    }

    let config = config_path(selection.config.as_deref());
    match config.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Loads the configuration at `path`, or defaults when the file is absent.
pub fn load_config(path: &Path) -> anyhow::Result<Config> {
    Config::load(path).context("loading config")
}

/// A completed scan and the data needed to present it.
#[derive(Debug)]
pub struct ScanRun {
    /// Holds the published scan result.
    pub store: FindingStore,
    /// Number of files handed to the scanner.
    pub file_count: usize,
    /// Wall-clock time for collection and scanning.
    pub elapsed: Duration,
}

impl ScanRun {
    /// Returns the published result.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        self.store.snapshot()
    }
}

/// Loads patterns, collects files and scans them.
///
/// The configuration file is never scanned.
/// Returns `None` after printing a warning when no patterns are configured.
pub fn run_scan(selection: &SelectionArgs, show_progress: bool) -> anyhow::Result<Option<ScanRun>> {
    let start = Instant::now();
    let config_file = config_path(selection.config.as_deref());
    let config = load_config(&config_file)?;

    let scanner = match Scanner::from_patterns(&config.patterns) {
        Ok(scanner) => scanner,
        Err(ScanError::NoPatterns) => {
            print_warning(NO_PATTERNS_MESSAGE);
            return Ok(None);
        }
        Err(e) => return Err(e).context("compiling patterns"),
    };

    let include = selection.include.as_deref().or(config.include.as_deref());
    let excludes: Vec<String> = config
        .effective_excludes()
        .into_iter()
        .chain(selection.exclude.iter().cloned())
        .collect();
    let mut files = collect_files(&selection.paths, include, &excludes, !selection.skip_gitignore)?;

    if let Ok(config_file) = std::path::absolute(&config_file) {
        files.retain(|file| *file != config_file);
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(
        files = files.len(),
        patterns = scanner.pattern_count(),
        "starting scan"
    );

    let store = FindingStore::new();
    let permit = store.begin_scan()?;

    let result = if show_progress && !files.is_empty() {
        let pb = create_file_progress(files.len());
        let result = scanner.scan_with_progress(&files, &FsReader, |_| pb.inc(1));
        pb.finish_and_clear();
        result
    } else {
        scanner.scan(&files, &FsReader)
    };

    permit.commit(result);

    Ok(Some(ScanRun {
        store,
        file_count: files.len(),
        elapsed: start.elapsed(),
    }))
}
