//! CLI command handlers.

/// Project initialisation and `.patrol.toml` creation.
pub mod init;
/// Finding lookup by file and line.
pub mod lookup;
/// Pattern listing and management.
pub mod patterns;
/// Markdown report generation.
pub mod report;
/// File and directory scanning.
pub mod scan;

/// Convenience alias for command return types.
pub type Result<T = ()> = anyhow::Result<T>;
