//! Types representing pattern matches.
//!
//! A [`Finding`] records that one pattern matched one line of one file. Findings
//! are created only by the scanner and are never mutated afterwards; each scan
//! replaces the previous set wholesale.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Description shown when a finding carries none of its own.
pub const DEFAULT_DESCRIPTION: &str = "Security issue detected";

/// A single pattern match on one line of a source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Name of the pattern that matched (e.g. `"eval-use"`).
    pub name: String,
    /// Path to the file where the match was found.
    pub file: PathBuf,
    /// 1-indexed line number of the match.
    pub line: u32,
    /// The matched line with surrounding whitespace trimmed.
    #[serde(rename = "match")]
    pub matched: String,
    /// Description copied from the pattern, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Finding {
    /// Creates a finding, trimming `line_text` to produce the recorded match.
    #[must_use]
    pub fn new(name: &str, file: &Path, line: u32, line_text: &str, description: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            file: file.to_path_buf(),
            line,
            matched: line_text.trim().to_string(),
            description: description.map(str::to_string),
        }
    }

    /// Returns the description, falling back to [`DEFAULT_DESCRIPTION`].
    #[must_use]
    pub fn description_or_default(&self) -> &str {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DESCRIPTION)
    }

    /// Returns `true` if this finding is on `line` of `file`.
    #[must_use]
    pub fn is_at(&self, file: &Path, line: u32) -> bool {
        self.line == line && self.file == file
    }

    /// Returns the file's base name for compact display.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.file
            .file_name()
            .map_or_else(|| self.file.display().to_string(), |n| n.to_string_lossy().into_owned())
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file.display(), self.line, self.name)
    }
}
