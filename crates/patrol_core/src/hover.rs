//! Hover text and line highlighting for findings.

use std::path::Path;

use serde::Serialize;

use crate::finding::Finding;
use crate::store::FindingStore;

/// Editor range covering a finding, with 0-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineHighlight {
    /// 0-based line index.
    pub line: u32,
    /// First selected column.
    pub start: usize,
    /// Column after the last selected character.
    pub end: usize,
    /// Whether the whole line should also be decorated.
    pub whole_line: bool,
}

/// Returns the hover text for `file:line` (1-based), if a finding is there.
#[must_use]
pub fn hover_text(store: &FindingStore, file: &Path, line: u32) -> Option<String> {
    store
        .by_location(file, line)
        .map(|f| f.description_or_default().to_string())
}

/// Returns the range to select when a finding is opened.
///
/// The selection spans the matched text's length from column 0, in characters.
#[must_use]
pub fn highlight(finding: &Finding) -> LineHighlight {
    LineHighlight {
        line: finding.line.saturating_sub(1),
        start: 0,
        end: finding.matched.chars().count(),
        whole_line: true,
    }
}
