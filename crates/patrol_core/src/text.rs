//! Text utilities for line splitting and context windows.

use std::ops::RangeInclusive;

/// Lines shown before a finding in a context window.
pub const CONTEXT_LINES_BEFORE: usize = 3;
/// Lines shown after a finding in a context window.
pub const CONTEXT_LINES_AFTER: usize = 2;

/// Splits `content` on `'\n'` only.
///
/// Unlike [`str::lines`], a carriage return before the newline stays part of
/// the line, and a trailing newline yields a final empty line.
pub fn split_lines(content: &str) -> impl Iterator<Item = &str> {
    content.split('\n')
}

/// Returns the number of lines [`split_lines`] yields for `content`.
#[must_use]
pub fn line_count(content: &str) -> usize {
    content.bytes().filter(|&b| b == b'\n').count() + 1
}

/// Returns the 1-based line numbers shown around `line`, clamped to
/// `1..=total_lines`.
///
/// Returns `None` when the file has no lines or `line` is out of range.
#[must_use]
pub fn context_range(line: usize, total_lines: usize) -> Option<RangeInclusive<usize>> {
    if line == 0 || line > total_lines {
        return None;
    }

    let start = line.saturating_sub(CONTEXT_LINES_BEFORE).max(1);
    let end = (line + CONTEXT_LINES_AFTER).min(total_lines);

    Some(start..=end)
}

/// A single line of source code displayed alongside a finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextLine<'a> {
    /// One-based line number in the original file.
    pub number: usize,
    /// The line text as it appears in the file.
    pub text: &'a str,
    /// Whether this line is the finding's own line.
    pub is_finding: bool,
}

/// Extracts the context window around `line` from `content`.
#[must_use]
pub fn context_lines(content: &str, line: usize) -> Vec<ContextLine<'_>> {
    let lines: Vec<&str> = split_lines(content).collect();
    let Some(range) = context_range(line, lines.len()) else {
        return Vec::new();
    };

    range
        .map(|number| ContextLine {
            number,
            text: lines[number - 1],
            is_finding: number == line,
        })
        .collect()
}
