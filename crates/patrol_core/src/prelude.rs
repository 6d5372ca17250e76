//! Convenience re-exports of the most commonly used types.

pub use crate::config::{Config, ConfigError, ConfigStore, MemoryConfigStore, TomlConfigStore};
pub use crate::error::{PatrolError, PatternError, ReportError, ScanError, StoreError};
pub use crate::finding::Finding;
pub use crate::pattern::{Pattern, PatternStore};
pub use crate::scanner::{FsReader, ScanResult, Scanner, TextReader};
pub use crate::store::{FindingGroup, FindingStore, Snapshot, group_by_name};
