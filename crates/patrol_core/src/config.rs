use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::pattern::Pattern;

/// Dependency directory glob, always excluded from file enumeration.
pub const DEPENDENCY_EXCLUDE: &str = "**/node_modules/**";

/// Generated report directory glob, always excluded from file enumeration.
pub const REPORT_EXCLUDE: &str = "**/security-reports/**";

/// Globs excluded from every scan regardless of configuration.
pub const ALWAYS_EXCLUDED: &[&str] = &[DEPENDENCY_EXCLUDE, REPORT_EXCLUDE];

/// Project-level configuration loaded from `.patrol.toml`.
///
/// Holds the ordered pattern list plus file selection settings. All fields are
/// optional and default to an empty pattern set that scans every file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Glob restricting which files are scanned. Scans everything when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,

    /// Glob patterns for file paths to exclude from scanning.
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Security patterns, applied in this order.
    #[serde(default)]
    pub patterns: Vec<Pattern>,
}

impl Config {
    /// Creates a default configuration with no patterns.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a `.patrol.toml` file.
    ///
    /// Returns the default configuration if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }

        let content = read_file(path)?;
        parse_toml(path, &content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })
    }

    /// Atomically writes this configuration to a `.patrol.toml` file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serialise_toml(self)?;
        write_file(path, &content)
    }

    /// Serialises this configuration to a pretty-printed TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        serialise_toml(self)
    }

    /// Returns the configured excludes with each [`ALWAYS_EXCLUDED`] glob
    /// appended if it is not already present.
    #[must_use]
    pub fn effective_excludes(&self) -> Vec<String> {
        let mut excludes = self.exclude_paths.clone();
        for glob in ALWAYS_EXCLUDED {
            if !excludes.iter().any(|e| e == glob) {
                excludes.push((*glob).to_string());
            }
        }
        excludes
    }
}

/// Persistence for the ordered pattern list.
///
/// The pattern store calls [`ConfigStore::set_patterns`] after every successful
/// mutation so the persisted list always mirrors the in-memory one.
pub trait ConfigStore {
    /// Returns the persisted patterns in order.
    fn patterns(&self) -> Result<Vec<Pattern>, ConfigError>;

    /// Replaces the persisted pattern list.
    fn set_patterns(&mut self, patterns: &[Pattern]) -> Result<(), ConfigError>;
}

/// A [`ConfigStore`] backed by a `.patrol.toml` file.
///
/// Only the `patterns` table is rewritten; other settings are preserved.
#[derive(Debug, Clone)]
pub struct TomlConfigStore {
    path: PathBuf,
}

impl TomlConfigStore {
    /// Creates a store reading and writing `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigStore for TomlConfigStore {
    fn patterns(&self) -> Result<Vec<Pattern>, ConfigError> {
        Config::load(&self.path).map(|config| config.patterns)
    }

    fn set_patterns(&mut self, patterns: &[Pattern]) -> Result<(), ConfigError> {
        let mut config = Config::load(&self.path)?;
        config.patterns = patterns.to_vec();
        config.save(&self.path)
    }
}

/// An in-memory [`ConfigStore`], useful for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigStore {
    patterns: Vec<Pattern>,
    writes: usize,
}

impl MemoryConfigStore {
    /// Creates a store seeded with `patterns`.
    #[must_use]
    pub fn new(patterns: Vec<Pattern>) -> Self {
        Self { patterns, writes: 0 }
    }

    /// Returns how many times the pattern list has been persisted.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.writes
    }
}

impl ConfigStore for MemoryConfigStore {
    fn patterns(&self) -> Result<Vec<Pattern>, ConfigError> {
        Ok(self.patterns.clone())
    }

    fn set_patterns(&mut self, patterns: &[Pattern]) -> Result<(), ConfigError> {
        self.patterns = patterns.to_vec();
        self.writes += 1;
        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, content: &str) -> Result<(), ConfigError> {
    crate::fs_util::atomic_write(path, content).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_toml(path: &Path, content: &str) -> Result<Config, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn serialise_toml(config: &Config) -> Result<String, ConfigError> {
    toml::to_string_pretty(config).map_err(|source| ConfigError::Serialize { source })
}

/// Errors that can occur when reading, parsing, serialising, or writing
/// a `.patrol.toml` configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read from disk.
    #[error("failed to read config '{path}': {source}")]
    Read {
        /// Path to the config file that could not be read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The config file contained invalid TOML or unexpected values.
    #[error("failed to parse config '{path}': {source}")]
    Parse {
        /// Path to the config file that could not be parsed.
        path: PathBuf,
        /// The underlying TOML deserialization error.
        #[source]
        source: toml::de::Error,
    },

    /// The in-memory configuration could not be serialised to TOML.
    #[error("failed to serialise config: {source}")]
    Serialize {
        /// The underlying TOML serialization error.
        #[source]
        source: toml::ser::Error,
    },

    /// The config file could not be written to disk.
    #[error("failed to write config '{path}': {source}")]
    Write {
        /// Path to the config file that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Returns the file path associated with this error, if any.
    ///
    /// `ConfigError::Serialize` errors have no associated path.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } | Self::Write { path, .. } => Some(path),
            Self::Serialize { .. } => None,
        }
    }
}
