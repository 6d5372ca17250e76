//! Property-based tests for `patrol_core`.
//!
//! These tests verify invariants that should hold for all inputs,
//! catching edge cases that hand-written tests might miss.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use patrol_core::binary::{BINARY_SAMPLE_CHARS, is_binary_sample};
use patrol_core::prelude::*;
use patrol_core::text::context_range;
use proptest::prelude::*;

struct Files(HashMap<PathBuf, String>);

impl TextReader for Files {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        self.0
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotFound))
    }
}

fn finding_strategy() -> impl Strategy<Value = Finding> {
    ("[abc]", "[xy]\\.js", 1u32..50, "[a-z ]{0,12}")
        .prop_map(|(name, file, line, text)| Finding::new(&name, Path::new(&file), line, &text, None))
}

proptest! {
    /// Printable text without control characters is never classified as binary.
    #[test]
    fn printable_text_is_not_binary(s in "[a-zA-Z0-9 \t\n{}();=]{1,2000}") {
        prop_assert!(!is_binary_sample(&s));
    }

    /// A null anywhere in the sample marks it binary.
    #[test]
    fn null_in_sample_is_binary(prefix in "[a-z ]{0,500}", suffix in "[a-z ]{0,400}") {
        let sample = format!("{prefix}\0{suffix}");
        prop_assert!(is_binary_sample(&sample));
    }

    /// Content past the sample window never changes the verdict.
    #[test]
    fn only_leading_sample_counts(tail in "[\\x01-\\x08]{1,200}") {
        let head = "a".repeat(BINARY_SAMPLE_CHARS);
        let sample = format!("{head}{tail}");
        prop_assert!(!is_binary_sample(&sample));
    }

    /// Grouping keeps every finding exactly once.
    #[test]
    fn grouping_partitions_findings(findings in proptest::collection::vec(finding_strategy(), 0..40)) {
        let groups = group_by_name(&findings);
        let total: usize = groups.iter().map(FindingGroup::len).sum();
        prop_assert_eq!(total, findings.len());

        let mut names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        prop_assert_eq!(names.len(), groups.len());

        for group in &groups {
            prop_assert!(group.findings.iter().all(|f| f.name == group.name));
        }
    }

    /// Scanning the same content twice yields the same result.
    #[test]
    fn repeated_scans_are_identical(content in "[a-z()= \n]{0,300}") {
        let scanner = Scanner::from_patterns(&[Pattern::new("call", r"[a-z]+\(", "Call")]).unwrap();
        let files = Files(HashMap::from([(PathBuf::from("a.js"), content)]));
        let paths = vec![PathBuf::from("a.js")];

        let first = scanner.scan(&paths, &files);
        let second = scanner.scan(&paths, &files);

        prop_assert_eq!(first, second);
    }

    /// Every finding's line lies within the file.
    #[test]
    fn finding_lines_are_in_bounds(content in "[a-z()\n]{0,300}") {
        let scanner = Scanner::from_patterns(&[Pattern::new("paren", r"\(", "Paren")]).unwrap();
        let line_count = content.split('\n').count();

        for finding in scanner.scan_content(&content, Path::new("a.js")) {
            prop_assert!(finding.line >= 1);
            prop_assert!(finding.line as usize <= line_count);
        }
    }

    /// Context windows stay inside the file and contain the finding line.
    #[test]
    fn context_range_is_clamped(total in 1usize..500, offset in 0usize..500) {
        let line = offset % total + 1;
        let range = context_range(line, total).unwrap();

        prop_assert!(*range.start() >= 1);
        prop_assert!(*range.end() <= total);
        prop_assert!(range.contains(&line));
        prop_assert!(range.end() - range.start() <= 5);
    }
}
