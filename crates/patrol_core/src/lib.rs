//! Core scanning engine for patrol.
//!
//! This crate scans text files line by line against user-defined regular
//! expressions and keeps the latest results for display and reporting. It is
//! designed to be embedded in CLIs, editor integrations and CI jobs.
//!
//! # Main Types
//!
//! - [`PatternStore`] - Validated, persisted list of user patterns
//! - [`Scanner`] - Runs compiled patterns over files and produces findings
//! - [`FindingStore`] - Holds the latest scan and notifies observers
//! - [`Finding`] - One line that matched one pattern
//! - [`Config`] - User configuration loaded from `.patrol.toml`
//!
//! # Error Handling
//!
//! This crate uses [`thiserror`] for structured, typed errors that library
//! consumers can match on:
//!
//! - [`PatternError`] - Pattern validation failures
//! - [`StoreError`] - Pattern store mutations
//! - [`ScanError`] - Scans that cannot start
//! - [`ReportError`] - Report writing failures
//! - [`PatrolError`] - Top-level error enum combining the above
//!
//! The CLI crate (`patrol_cli`) uses `anyhow` for error propagation.

/// Binary file detection heuristics.
pub mod binary;
/// User configuration loaded from `.patrol.toml`.
pub mod config;
/// Error types for patterns, scans and reports.
pub mod error;
/// The record produced for each matching line.
pub mod finding;
/// Filesystem helpers for atomic writes.
pub mod fs_util;
/// Hover text and highlight ranges for findings.
pub mod hover;
/// Pattern definitions, validation and the persisted pattern store.
pub mod pattern;
/// Common re-exports for internal use.
pub mod prelude;
/// Markdown report generation.
pub mod report;
/// The line-oriented scanning engine.
pub mod scanner;
/// Latest scan results, grouping and location lookup.
pub mod store;
#[cfg(test)]
pub(crate) mod test_utils;
/// Text utilities for line splitting and context windows.
pub mod text;
/// Tree nodes for grouped findings views.
pub mod tree;

pub use config::{Config, ConfigError, ConfigStore, MemoryConfigStore, TomlConfigStore};
pub use error::{PatrolError, PatternError, ReadError, ReportError, ScanError, StoreError};
pub use finding::Finding;
pub use pattern::{CompiledPattern, Pattern, PatternStore};
pub use scanner::{FsReader, ScanResult, Scanner, SkipReason, SkippedFile, TextReader};
pub use store::{FindingGroup, FindingObserver, FindingStore, ScanPermit, Snapshot};

/// Default filename for patrol configuration.
pub const CONFIG_FILENAME: &str = ".patrol.toml";
