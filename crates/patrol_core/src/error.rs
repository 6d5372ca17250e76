use std::path::PathBuf;

use thiserror::Error;

/// Errors raised when a pattern definition fails validation.
#[derive(Debug, Error)]
pub enum PatternError {
    /// The pattern name was empty or whitespace.
    #[error("pattern name is required")]
    EmptyName,

    /// The pattern description was empty or whitespace.
    #[error("description is required for pattern '{name}'")]
    EmptyDescription {
        /// Name of the offending pattern.
        name: String,
    },

    /// The pattern's regular expression failed to compile.
    #[error("invalid regex in pattern '{name}': {source}")]
    InvalidRegex {
        /// Name of the pattern that failed (e.g. `"eval-use"`).
        name: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// Another pattern already uses this name.
    #[error("a pattern named '{name}' already exists")]
    DuplicateName {
        /// The conflicting name.
        name: String,
    },
}

/// Errors returned by pattern store mutations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No pattern with the requested name exists.
    #[error("no pattern named '{name}'")]
    NotFound {
        /// The name that was looked up.
        name: String,
    },

    /// The submitted pattern was rejected.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// The updated pattern list could not be persisted.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
}

/// Errors that abort a whole scan before any file is processed.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The pattern set is empty so there is nothing to scan for.
    #[error("no security patterns configured")]
    NoPatterns,

    /// Another scan holds the finding store.
    #[error("a scan is already in progress")]
    InProgress,

    /// A stored pattern could not be compiled.
    #[error(transparent)]
    Pattern(#[from] PatternError),
}

/// A single file that could not be read during a scan.
///
/// Read errors never abort a scan; the file is counted as skipped.
#[derive(Debug, Error)]
#[error("failed to read '{path}': {source}")]
pub struct ReadError {
    /// The file that failed.
    pub path: PathBuf,
    /// The underlying I/O or decode error.
    #[source]
    pub source: std::io::Error,
}

/// Errors that can occur while writing a markdown report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// The workspace root does not exist or is not a directory.
    #[error("workspace root '{path}' is not a directory")]
    MissingWorkspaceRoot {
        /// The root that was supplied.
        path: PathBuf,
    },

    /// The report directory or file could not be written.
    #[error("failed to write report '{path}': {source}")]
    Io {
        /// Path that failed to write.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error type for the patrol pipeline.
///
/// Unifies errors from pattern management, scanning, configuration and report
/// generation for callers that orchestrate the full workflow.
#[derive(Debug, Error)]
pub enum PatrolError {
    /// A pattern failed validation.
    #[error(transparent)]
    Pattern(#[from] PatternError),

    /// A pattern store operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A scan could not start.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Configuration could not be read, parsed, or written.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// The report could not be written.
    #[error(transparent)]
    Report(#[from] ReportError),
}
