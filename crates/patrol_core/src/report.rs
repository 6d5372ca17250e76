//! Markdown report generation.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::ReportError;
use crate::finding::Finding;
use crate::scanner::TextReader;
use crate::store::group_by_name;
use crate::text::{ContextLine, context_lines};

/// Directory under the workspace root that receives reports.
pub const REPORT_DIR: &str = "security-reports";

const TITLE: &str = "# Security Scan Report";
const NO_ISSUES: &str = "No security issues found.";
const FINDING_MARKER: &str = ">";
const MIN_FENCE: usize = 3;

/// Renders `findings` as a markdown document.
///
/// Source context is read through `reader`; a file that cannot be read gets
/// an inline note instead of a code block and does not fail the report.
#[must_use]
pub fn render(findings: &[Finding], reader: &dyn TextReader) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{TITLE}");
    let _ = writeln!(out);

    if findings.is_empty() {
        let _ = writeln!(out, "{NO_ISSUES}");
        return out;
    }

    let groups = group_by_name(findings);
    let _ = writeln!(
        out,
        "Found **{}** {} across {} {}.",
        findings.len(),
        if findings.len() == 1 { "issue" } else { "issues" },
        groups.len(),
        if groups.len() == 1 { "pattern" } else { "patterns" },
    );

    let mut sources = SourceCache::new(reader);

    for group in &groups {
        let _ = writeln!(out);
        let _ = writeln!(out, "## {} ({})", group.name, group.len());

        for finding in &group.findings {
            write_finding(&mut out, finding, &mut sources);
        }
    }

    out
}

fn write_finding(out: &mut String, finding: &Finding, sources: &mut SourceCache<'_>) {
    let _ = writeln!(out);
    let _ = writeln!(out, "### `{}:{}`", finding.file.display(), finding.line);
    let _ = writeln!(out);
    let _ = writeln!(out, "**Description:** {}", finding.description_or_default());
    let _ = writeln!(out);

    match sources.get(&finding.file) {
        Ok(content) => {
            let lines = context_lines(content, finding.line as usize);
            if lines.is_empty() {
                let _ = writeln!(
                    out,
                    "_Context unavailable: line {} is past the end of the file._",
                    finding.line
                );
            } else {
                write_code_block(out, &lines);
            }
        }
        Err(reason) => {
            let _ = writeln!(out, "_Context unavailable: could not read file ({reason})._");
        }
    }
}

fn write_code_block(out: &mut String, lines: &[ContextLine<'_>]) {
    let width = lines.last().map_or(1, |l| l.number.to_string().len());
    let fence = fence_for(lines);

    let _ = writeln!(out, "{fence}");
    for line in lines {
        let marker = if line.is_finding { FINDING_MARKER } else { " " };
        let text = line.text.trim_end_matches('\r');
        let _ = writeln!(out, "{marker} {:>width$} | {text}", line.number);
    }
    let _ = writeln!(out, "{fence}");
}

/// Returns a backtick fence longer than any backtick run inside `lines`.
fn fence_for(lines: &[ContextLine<'_>]) -> String {
    let longest = lines
        .iter()
        .flat_map(|l| l.text.split(|c: char| c != '`'))
        .map(str::len)
        .max()
        .unwrap_or(0);

    "`".repeat(MIN_FENCE.max(longest + 1))
}

struct SourceCache<'a> {
    reader: &'a dyn TextReader,
    files: HashMap<PathBuf, Result<String, String>>,
}

impl<'a> SourceCache<'a> {
    fn new(reader: &'a dyn TextReader) -> Self {
        Self {
            reader,
            files: HashMap::new(),
        }
    }

    fn get(&mut self, path: &Path) -> Result<&str, &str> {
        let reader = self.reader;
        self.files
            .entry(path.to_path_buf())
            .or_insert_with(|| reader.read_text(path).map_err(|e| e.to_string()))
            .as_deref()
            .map_err(String::as_str)
    }
}

/// Returns `<root>/security-reports/scan-report-<YYYY-MM-DD>.md`.
#[must_use]
pub fn report_path(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(REPORT_DIR)
        .join(format!("scan-report-{}.md", date.format("%Y-%m-%d")))
}

/// Renders `findings` and writes the report under `root`.
///
/// Creates the report directory if needed and returns the written path.
pub fn write_report(
    root: &Path,
    findings: &[Finding],
    reader: &dyn TextReader,
    date: NaiveDate,
) -> Result<PathBuf, ReportError> {
    if !root.is_dir() {
        return Err(ReportError::MissingWorkspaceRoot {
            path: root.to_path_buf(),
        });
    }

    let path = report_path(root, date);
    let dir = root.join(REPORT_DIR);
    std::fs::create_dir_all(&dir).map_err(|source| ReportError::Io { path: dir, source })?;

    let markdown = render(findings, reader);
    crate::fs_util::atomic_write(&path, &markdown).map_err(|source| ReportError::Io {
        path: path.clone(),
        source,
    })?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::scanner::FsReader;
    use crate::test_utils::MapReader;

    fn finding(name: &str, file: &str, line: u32) -> Finding {
        Finding::new(name, Path::new(file), line, "matched", Some("Use of eval"))
    }

    fn count_findings(markdown: &str) -> usize {
        markdown.lines().filter(|l| l.starts_with("### ")).count()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 14).unwrap()
    }

    #[test]
    fn empty_findings_render_no_issues_document() {
        let markdown = render(&[], &MapReader::default());
        assert!(markdown.contains("No security issues found"));
        assert_eq!(count_findings(&markdown), 0);
    }

    #[test]
    fn summary_and_sections_follow_grouping() {
        let reader = MapReader::new([("/w/a.js", "eval(1)\neval(2)"), ("/w/b.js", "x")]);
        let findings = vec![
            finding("eval-use", "/w/a.js", 1),
            finding("inner-html", "/w/b.js", 1),
            finding("eval-use", "/w/a.js", 2),
        ];

        let markdown = render(&findings, &reader);

        assert!(markdown.contains("Found **3** issues across 2 patterns."));
        let eval = markdown.find("## eval-use (2)").unwrap();
        let inner = markdown.find("## inner-html (1)").unwrap();
        assert!(eval < inner);
        assert_eq!(count_findings(&markdown), findings.len());
    }

    #[test]
    fn context_block_marks_finding_line() {
        let content = "l1\nl2\nl3\nl4\nl5\nl6\nl7\nl8";
        let reader = MapReader::new([("/w/a.js", content)]);

        let markdown = render(&[finding("p", "/w/a.js", 5)], &reader);

        assert!(markdown.contains("### `/w/a.js:5`"));
        assert!(markdown.contains("**Description:** Use of eval"));
        assert!(markdown.contains("  2 | l2"));
        assert!(markdown.contains("> 5 | l5"));
        assert!(markdown.contains("  7 | l7"));
        assert!(!markdown.contains("| l1"));
        assert!(!markdown.contains("| l8"));
    }

    #[test]
    fn context_block_is_clamped_to_file_bounds() {
        let reader = MapReader::new([("/w/a.js", "first\nsecond")]);

        let markdown = render(&[finding("p", "/w/a.js", 1)], &reader);

        assert!(markdown.contains("> 1 | first"));
        assert!(markdown.contains("  2 | second"));
    }

    #[test]
    fn line_numbers_are_right_aligned() {
        let content: String = (1..=12).map(|n| format!("line{n}\n")).collect();
        let reader = MapReader::new([("/w/a.js", content.as_str())]);

        let markdown = render(&[finding("p", "/w/a.js", 10)], &reader);

        assert!(markdown.contains("   7 | line7"));
        assert!(markdown.contains("> 10 | line10"));
    }

    #[test]
    fn fence_outgrows_backticks_in_source() {
        let content = "let doc = r\"```rust\";\nx = eval(y)\nlet s = \"````\";";
        let reader = MapReader::new([("/w/a.md", content)]);

        let markdown = render(&[finding("p", "/w/a.md", 2)], &reader);

        let fences: Vec<&str> = markdown.lines().filter(|l| l.starts_with('`')).collect();
        assert_eq!(fences, vec!["`````", "`````"]);
        assert!(markdown.contains("> 2 | x = eval(y)"));
    }

    #[test]
    fn plain_source_uses_three_backtick_fence() {
        let reader = MapReader::new([("/w/a.js", "eval(1)")]);
        let markdown = render(&[finding("p", "/w/a.js", 1)], &reader);
        assert_eq!(markdown.lines().filter(|l| *l == "```").count(), 2);
    }

    #[test]
    fn unreadable_source_becomes_a_note() {
        let reader = MapReader::new([("/w/ok.js", "eval(1)")]);
        let findings = vec![finding("p", "/w/gone.js", 1), finding("p", "/w/ok.js", 1)];

        let markdown = render(&findings, &reader);

        assert!(markdown.contains("_Context unavailable: could not read file"));
        assert!(markdown.contains("> 1 | eval(1)"));
        assert_eq!(count_findings(&markdown), 2);
    }

    #[test]
    fn stale_line_numbers_become_a_note() {
        let reader = MapReader::new([("/w/a.js", "short")]);
        let markdown = render(&[finding("p", "/w/a.js", 9)], &reader);
        assert!(markdown.contains("line 9 is past the end of the file"));
    }

    #[test]
    fn missing_description_uses_default() {
        let reader = MapReader::new([("/w/a.js", "x")]);
        let bare = Finding::new("p", Path::new("/w/a.js"), 1, "x", None);

        let markdown = render(&[bare], &reader);

        assert!(markdown.contains("**Description:** Security issue detected"));
    }

    #[test]
    fn report_path_uses_iso_date() {
        let path = report_path(Path::new("/w"), date());
        assert_eq!(path, Path::new("/w/security-reports/scan-report-2025-03-14.md"));
    }

    #[test]
    fn write_report_creates_directory_and_file() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("app.js");
        std::fs::write(&source, "foo()\nx = eval(y)\n").unwrap();
        let findings = vec![Finding::new("eval-use", &source, 2, "x = eval(y)", Some("Use of eval"))];

        let path = write_report(dir.path(), &findings, &FsReader, date()).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(path.starts_with(dir.path().join(REPORT_DIR)));
        assert!(written.contains("> 2 | x = eval(y)"));
    }

    #[test]
    fn write_report_requires_existing_root() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = write_report(&missing, &[], &FsReader, date()).unwrap_err();

        assert!(matches!(err, ReportError::MissingWorkspaceRoot { .. }));
    }
}
