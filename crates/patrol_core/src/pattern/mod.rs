//! Pattern definitions and the ordered pattern store.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, ConfigStore};
use crate::error::{PatternError, StoreError};

/// A named regular expression with a description of the risk it flags.
///
/// This is the persisted form; see [`CompiledPattern`] for the scan-ready form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    /// Unique, non-empty name (e.g. `"eval-use"`).
    pub name: String,
    /// Regular expression tested against each line.
    pub pattern: String,
    /// Human-readable description shown in hovers and reports.
    pub description: String,
}

impl Pattern {
    /// Creates a pattern without validating it.
    #[must_use]
    pub fn new(name: impl Into<String>, pattern: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            description: description.into(),
        }
    }

    /// Compiles the regex, returning a pattern ready for scanning.
    pub fn compile(&self) -> Result<CompiledPattern, PatternError> {
        let regex = compile_regex(&self.name, &self.pattern)?;
        Ok(CompiledPattern {
            name: self.name.as_str().into(),
            description: self.description.as_str().into(),
            regex,
        })
    }
}

/// A pattern whose regular expression has been compiled.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Name copied from the source [`Pattern`].
    pub name: Box<str>,
    /// Description copied from the source [`Pattern`].
    pub description: Box<str>,
    /// Compiled regular expression.
    pub regex: Regex,
}

impl CompiledPattern {
    /// Returns `true` if the regex matches anywhere in `line`.
    #[must_use]
    pub fn matches(&self, line: &str) -> bool {
        self.regex.is_match(line)
    }
}

/// Checks that `name` is non-empty.
pub fn validate_name(name: &str) -> Result<(), PatternError> {
    if name.trim().is_empty() {
        return Err(PatternError::EmptyName);
    }
    Ok(())
}

/// Checks that `pattern` compiles as a regular expression.
pub fn validate_regex(name: &str, pattern: &str) -> Result<(), PatternError> {
    compile_regex(name, pattern).map(|_| ())
}

/// Checks that `description` is non-empty.
pub fn validate_description(name: &str, description: &str) -> Result<(), PatternError> {
    if description.trim().is_empty() {
        return Err(PatternError::EmptyDescription { name: name.to_string() });
    }
    Ok(())
}

/// Validates every field of `pattern`.
pub fn validate(pattern: &Pattern) -> Result<(), PatternError> {
    validate_name(&pattern.name)?;
    validate_regex(&pattern.name, &pattern.pattern)?;
    validate_description(&pattern.name, &pattern.description)
}

fn compile_regex(name: &str, pattern: &str) -> Result<Regex, PatternError> {
    Regex::new(pattern).map_err(|source| PatternError::InvalidRegex {
        name: name.to_string(),
        source,
    })
}

/// Ordered collection of [`Pattern`]s backed by a [`ConfigStore`].
///
/// Every successful mutation is persisted before it becomes visible, so a
/// failed write leaves the in-memory list unchanged.
#[derive(Debug)]
pub struct PatternStore<S> {
    patterns: Vec<Pattern>,
    config: S,
}

impl<S: ConfigStore> PatternStore<S> {
    /// Loads the persisted patterns from `config`.
    pub fn load(config: S) -> Result<Self, ConfigError> {
        let patterns = config.patterns()?;
        Ok(Self { patterns, config })
    }

    /// Returns the current patterns in persisted order.
    #[must_use]
    pub fn list(&self) -> &[Pattern] {
        &self.patterns
    }

    /// Looks up a pattern by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.name == name)
    }

    /// Returns the number of patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Returns `true` if no patterns are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Appends a validated pattern and persists the list.
    pub fn add(&mut self, pattern: Pattern) -> Result<(), StoreError> {
        validate(&pattern)?;
        if self.get(&pattern.name).is_some() {
            return Err(PatternError::DuplicateName { name: pattern.name }.into());
        }

        let mut updated = self.patterns.clone();
        updated.push(pattern);
        self.commit(updated)
    }

    /// Replaces the pattern named `name` in place, preserving its position.
    pub fn edit(&mut self, name: &str, pattern: Pattern) -> Result<(), StoreError> {
        validate(&pattern)?;

        let index = self
            .position(name)
            .ok_or_else(|| StoreError::NotFound { name: name.to_string() })?;

        if pattern.name != name && self.get(&pattern.name).is_some() {
            return Err(PatternError::DuplicateName { name: pattern.name }.into());
        }

        let mut updated = self.patterns.clone();
        updated[index] = pattern;
        self.commit(updated)
    }

    /// Removes the first pattern named `name`.
    ///
    /// Returns `Ok(false)` without persisting anything when no pattern matches.
    pub fn remove(&mut self, name: &str) -> Result<bool, StoreError> {
        let Some(index) = self.position(name) else {
            return Ok(false);
        };

        let mut updated = self.patterns.clone();
        updated.remove(index);
        self.commit(updated)?;
        Ok(true)
    }

    /// Compiles every pattern for scanning, in store order.
    pub fn compile_all(&self) -> Result<Vec<CompiledPattern>, PatternError> {
        self.patterns.iter().map(Pattern::compile).collect()
    }

    /// Returns the backing configuration store.
    #[must_use]
    pub const fn config(&self) -> &S {
        &self.config
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.patterns.iter().position(|p| p.name == name)
    }

    fn commit(&mut self, updated: Vec<Pattern>) -> Result<(), StoreError> {
        self.config.set_patterns(&updated)?;
        self.patterns = updated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryConfigStore;

    fn eval_pattern() -> Pattern {
        Pattern::new("eval-use", r"eval\(", "Use of eval")
    }

    fn store_with(patterns: Vec<Pattern>) -> PatternStore<MemoryConfigStore> {
        PatternStore::load(MemoryConfigStore::new(patterns)).unwrap()
    }

    #[test]
    fn load_reads_patterns_in_order() {
        let store = store_with(vec![
            Pattern::new("a", "a", "first"),
            Pattern::new("b", "b", "second"),
        ]);
        let names: Vec<_> = store.list().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn add_appends_and_persists() {
        let mut store = store_with(vec![]);
        store.add(eval_pattern()).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.config().writes(), 1);
        assert_eq!(store.config().patterns().unwrap(), vec![eval_pattern()]);
    }

    #[test]
    fn add_rejects_empty_name() {
        let mut store = store_with(vec![]);
        let err = store.add(Pattern::new("  ", "x", "desc")).unwrap_err();
        assert!(matches!(err, StoreError::Pattern(PatternError::EmptyName)));
        assert!(store.is_empty());
        assert_eq!(store.config().writes(), 0);
    }

    #[test]
    fn add_rejects_empty_description() {
        let mut store = store_with(vec![]);
        let err = store.add(Pattern::new("p", "x", "")).unwrap_err();
        assert!(matches!(err, StoreError::Pattern(PatternError::EmptyDescription { .. })));
    }

    #[test]
    fn add_rejects_invalid_regex() {
        let mut store = store_with(vec![]);
        let err = store.add(Pattern::new("broken", "eval(", "desc")).unwrap_err();
        assert!(matches!(err, StoreError::Pattern(PatternError::InvalidRegex { .. })));
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn add_rejects_duplicate_name() {
        let mut store = store_with(vec![eval_pattern()]);
        let err = store.add(Pattern::new("eval-use", "other", "desc")).unwrap_err();
        assert!(matches!(err, StoreError::Pattern(PatternError::DuplicateName { .. })));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn edit_replaces_in_place() {
        let mut store = store_with(vec![
            Pattern::new("a", "a", "first"),
            eval_pattern(),
            Pattern::new("c", "c", "third"),
        ]);

        store
            .edit("eval-use", Pattern::new("eval-call", r"\beval\s*\(", "Dynamic code evaluation"))
            .unwrap();

        assert_eq!(store.list()[1].name, "eval-call");
        assert_eq!(store.list()[1].description, "Dynamic code evaluation");
        assert_eq!(store.len(), 3);
        assert!(store.get("eval-use").is_none());
    }

    #[test]
    fn edit_missing_pattern_is_not_found() {
        let mut store = store_with(vec![eval_pattern()]);
        let err = store.edit("missing", eval_pattern()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { ref name } if name == "missing"));
        assert_eq!(store.config().writes(), 0);
    }

    #[test]
    fn edit_validates_before_lookup() {
        let mut store = store_with(vec![eval_pattern()]);
        let err = store.edit("eval-use", Pattern::new("eval-use", "(", "desc")).unwrap_err();
        assert!(matches!(err, StoreError::Pattern(PatternError::InvalidRegex { .. })));
        assert_eq!(store.list()[0], eval_pattern());
    }

    #[test]
    fn edit_rejects_rename_onto_existing_name() {
        let mut store = store_with(vec![eval_pattern(), Pattern::new("other", "o", "desc")]);
        let err = store.edit("other", Pattern::new("eval-use", "o", "desc")).unwrap_err();
        assert!(matches!(err, StoreError::Pattern(PatternError::DuplicateName { .. })));
    }

    #[test]
    fn remove_deletes_first_match() {
        let mut store = store_with(vec![eval_pattern(), Pattern::new("other", "o", "desc")]);
        assert!(store.remove("eval-use").unwrap());
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].name, "other");
    }

    #[test]
    fn remove_missing_pattern_is_a_no_op() {
        let mut store = store_with(vec![eval_pattern()]);
        assert!(!store.remove("missing").unwrap());
        assert_eq!(store.list(), &[eval_pattern()]);
        assert_eq!(store.config().writes(), 0);
    }

    #[test]
    fn compile_all_preserves_order() {
        let store = store_with(vec![eval_pattern(), Pattern::new("other", "o", "desc")]);
        let compiled = store.compile_all().unwrap();
        assert_eq!(compiled[0].name.as_ref(), "eval-use");
        assert_eq!(compiled[1].name.as_ref(), "other");
    }

    #[test]
    fn compiled_pattern_matches_lines() {
        let compiled = eval_pattern().compile().unwrap();
        assert!(compiled.matches("x = eval(y)"));
        assert!(!compiled.matches("evaluate()"));
    }

    #[test]
    fn validate_functions_check_each_field() {
        assert!(validate_name("ok").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_regex("p", r"\d+").is_ok());
        assert!(validate_regex("p", "[").is_err());
        assert!(validate_description("p", "text").is_ok());
        assert!(validate_description("p", " ").is_err());
    }
}
