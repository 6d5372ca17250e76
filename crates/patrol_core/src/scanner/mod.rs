//! Line-oriented pattern scanning engine.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

#[cfg(feature = "tracing")]
use tracing::{debug, trace, warn};

use crate::binary::{has_binary_extension, is_binary_sample};
use crate::error::{ReadError, ScanError};
use crate::finding::Finding;
use crate::pattern::{CompiledPattern, Pattern};
use crate::text::split_lines;

/// Source of file contents for the scanner and report generator.
pub trait TextReader {
    /// Reads `path` as UTF-8 text.
    fn read_text(&self, path: &Path) -> io::Result<String>;
}

/// A [`TextReader`] that reads from the local file system.
///
/// Files that are not valid UTF-8 fail with [`io::ErrorKind::InvalidData`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReader;

impl TextReader for FsReader {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        let bytes = std::fs::read(path)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }
}

/// Why a candidate file produced no findings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The extension is on the binary denylist; the file was never opened.
    BinaryExtension,
    /// The content sample looked binary.
    BinaryContent,
    /// The file could not be read or decoded.
    Unreadable(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BinaryExtension => write!(f, "binary extension"),
            Self::BinaryContent => write!(f, "binary content"),
            Self::Unreadable(reason) => write!(f, "unreadable: {reason}"),
        }
    }
}

/// A candidate file that was not scanned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// The skipped path.
    pub path: PathBuf,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// Outcome of one complete scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResult {
    /// Findings in file-list order, then pattern order, then line order.
    pub findings: Vec<Finding>,
    /// Files excluded as binary or unreadable.
    pub skipped: Vec<SkippedFile>,
    /// Number of files whose lines were matched.
    pub scanned: usize,
}

impl ScanResult {
    /// Returns the number of skipped files.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Pattern scanning engine.
///
/// Each pattern's regex is compiled once when the scanner is built and reused
/// for every file. Files are processed sequentially in the order given.
pub struct Scanner {
    patterns: Vec<CompiledPattern>,
}

impl fmt::Debug for Scanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scanner")
            .field("patterns", &self.patterns.len())
            .finish_non_exhaustive()
    }
}

impl Scanner {
    /// Creates a scanner from already-compiled patterns.
    ///
    /// Fails with [`ScanError::NoPatterns`] if `patterns` is empty.
    pub fn new(patterns: Vec<CompiledPattern>) -> Result<Self, ScanError> {
        if patterns.is_empty() {
            return Err(ScanError::NoPatterns);
        }
        Ok(Self { patterns })
    }

    /// Compiles `patterns` and creates a scanner.
    ///
    /// Fails on an empty set or on the first pattern whose regex is invalid.
    pub fn from_patterns(patterns: &[Pattern]) -> Result<Self, ScanError> {
        if patterns.is_empty() {
            return Err(ScanError::NoPatterns);
        }
        let compiled = patterns.iter().map(Pattern::compile).collect::<Result<Vec<_>, _>>()?;
        Self::new(compiled)
    }

    /// Returns the number of patterns applied to each line.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Scans `files` in order, reading each through `reader`.
    ///
    /// A file that is binary or unreadable is recorded as skipped and never
    /// aborts the scan.
    #[must_use]
    pub fn scan(&self, files: &[PathBuf], reader: &dyn TextReader) -> ScanResult {
        self.scan_with_progress(files, reader, |_| {})
    }

    /// Like [`Scanner::scan`], calling `on_file` after each file is processed.
    pub fn scan_with_progress<F>(&self, files: &[PathBuf], reader: &dyn TextReader, mut on_file: F) -> ScanResult
    where
        F: FnMut(&Path),
    {
        let mut result = ScanResult::default();

        for path in files {
            match self.scan_file_into(path, reader, &mut result.findings) {
                Ok(()) => result.scanned += 1,
                Err(reason) => result.skipped.push(SkippedFile {
                    path: path.clone(),
                    reason,
                }),
            }
            on_file(path);
        }

        #[cfg(feature = "tracing")]
        debug!(
            findings = result.findings.len(),
            scanned = result.scanned,
            skipped = result.skipped.len(),
            "scan complete"
        );

        result
    }

    /// Scans already-loaded text content attributed to `path`.
    ///
    /// No binary filtering is applied; callers are expected to have done so.
    #[must_use]
    pub fn scan_content(&self, content: &str, path: &Path) -> Vec<Finding> {
        let mut findings = Vec::new();
        self.scan_content_into(content, path, &mut findings);
        findings
    }

    /// Scans `content`, appending results to an existing vector.
    ///
    /// Patterns are applied in order; each pattern walks every line and
    /// records at most one finding per line.
    pub fn scan_content_into(&self, content: &str, path: &Path, findings: &mut Vec<Finding>) {
        let lines: Vec<&str> = split_lines(content).collect();

        for pattern in &self.patterns {
            scan_with_pattern_into(&lines, path, pattern, findings);
        }
    }

    fn scan_file_into(&self, path: &Path, reader: &dyn TextReader, findings: &mut Vec<Finding>) -> Result<(), SkipReason> {
        if has_binary_extension(path) {
            #[cfg(feature = "tracing")]
            trace!(path = %path.display(), "skipping binary extension");
            return Err(SkipReason::BinaryExtension);
        }

        let content = reader.read_text(path).map_err(|source| {
            let error = ReadError {
                path: path.to_path_buf(),
                source,
            };
            #[cfg(feature = "tracing")]
            warn!("{error}");
            SkipReason::Unreadable(error.source.to_string())
        })?;

        if is_binary_sample(&content) {
            #[cfg(feature = "tracing")]
            debug!(path = %path.display(), "skipping binary file");
            return Err(SkipReason::BinaryContent);
        }

        self.scan_content_into(&content, path, findings);
        Ok(())
    }
}

fn scan_with_pattern_into(lines: &[&str], path: &Path, pattern: &CompiledPattern, findings: &mut Vec<Finding>) {
    for (index, line) in lines.iter().enumerate() {
        if !pattern.matches(line) {
            continue;
        }

        let Ok(line_number) = u32::try_from(index + 1) else {
            break;
        };

        #[cfg(feature = "tracing")]
        trace!(pattern = %pattern.name, line = line_number, "match");

        findings.push(Finding::new(
            &pattern.name,
            path,
            line_number,
            line,
            Some(&pattern.description),
        ));
    }
}

/// Compiles `patterns` and scans `files` in one call.
pub fn scan(patterns: &[Pattern], files: &[PathBuf], reader: &dyn TextReader) -> Result<ScanResult, ScanError> {
    Ok(Scanner::from_patterns(patterns)?.scan(files, reader))
}
