//! Test utilities for `patrol_core` (compiled only during testing).

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use crate::finding::Finding;
use crate::pattern::Pattern;
use crate::scanner::TextReader;

/// In-memory file system keyed by path.
#[derive(Debug, Default)]
pub struct MapReader {
    files: HashMap<PathBuf, String>,
}

impl MapReader {
    pub fn new<'a>(files: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            files: files
                .into_iter()
                .map(|(path, content)| (PathBuf::from(path), content.to_string()))
                .collect(),
        }
    }
}

impl TextReader for MapReader {
    fn read_text(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }
}

pub fn eval_pattern() -> Pattern {
    Pattern::new("eval-use", r"eval\(", "Use of eval")
}

pub fn make_finding(name: &str, file: &str, line: u32) -> Finding {
    Finding::new(name, Path::new(file), line, "matched line", Some("Test description"))
}
