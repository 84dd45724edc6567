//! Identifier generation
//!
//! Each page owns an [`IdGenerator`] for its shapes and lines, and each
//! document owns one for its pages. Generators never share state, so
//! independent documents can be built on independent threads.

use std::collections::{HashMap, HashSet};
use std::fmt;

use uuid::Uuid;

use super::{validate_id, LucidError, Result};

/// Kinds of element that receive counter-based identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Shape,
    Line,
    Page,
    Group,
}

impl IdKind {
    pub fn prefix(&self) -> &'static str {
        match self {
            IdKind::Shape => "shape",
            IdKind::Line => "line",
            IdKind::Page => "page",
            IdKind::Group => "group",
        }
    }
}

impl fmt::Display for IdKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Issues identifiers unique within one scope
///
/// Counter values only ever grow, and any identifier already registered
/// (generated or caller-supplied) is skipped.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    used: HashSet<String>,
    counters: HashMap<IdKind, u64>,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next free `"<kind>-<n>"` identifier
    pub fn next_id(&mut self, kind: IdKind) -> String {
        let counter = self.counters.entry(kind).or_insert(0);
        loop {
            *counter += 1;
            let candidate = format!("{}-{}", kind.prefix(), counter);
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
        }
    }

    /// Next free `"<prefix>-<8 hex chars>"` identifier for ad-hoc kinds
    pub fn next_with_prefix(&mut self, prefix: &str) -> Result<String> {
        if prefix.chars().count() > 27 {
            return Err(LucidError::validation(
                "prefix",
                "must leave room for the random suffix (27 characters at most)",
            ));
        }
        validate_id("prefix", prefix)?;
        loop {
            let suffix = Uuid::new_v4().simple().to_string();
            let candidate = format!("{}-{}", prefix, &suffix[..8]);
            if self.used.insert(candidate.clone()) {
                return Ok(candidate);
            }
        }
    }

    /// Mark an identifier as taken; returns false if it already was
    pub fn register(&mut self, id: &str) -> bool {
        self.used.insert(id.to_string())
    }

    pub fn is_available(&self, id: &str) -> bool {
        !self.used.contains(id)
    }

    /// Number of identifiers in use
    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_ids_per_kind() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.next_id(IdKind::Shape), "shape-1");
        assert_eq!(ids.next_id(IdKind::Shape), "shape-2");
        assert_eq!(ids.next_id(IdKind::Line), "line-1");
        assert_eq!(ids.next_id(IdKind::Page), "page-1");
        assert_eq!(ids.next_id(IdKind::Shape), "shape-3");
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn test_registered_ids_are_skipped() {
        let mut ids = IdGenerator::new();
        assert!(ids.register("shape-1"));
        assert!(ids.register("shape-2"));
        assert!(!ids.register("shape-2"));
        assert_eq!(ids.next_id(IdKind::Shape), "shape-3");
        assert!(!ids.is_available("shape-3"));
        assert!(ids.is_available("shape-4"));
    }

    #[test]
    fn test_custom_prefix() {
        let mut ids = IdGenerator::new();
        let first = ids.next_with_prefix("node").unwrap();
        let second = ids.next_with_prefix("node").unwrap();
        assert!(first.starts_with("node-"));
        assert_eq!(first.len(), "node-".len() + 8);
        assert_ne!(first, second);
        assert!(validate_id("id", &first).is_ok());
    }

    #[test]
    fn test_custom_prefix_rejects_bad_input() {
        let mut ids = IdGenerator::new();
        assert!(ids.next_with_prefix("bad prefix").is_err());
        assert!(ids.next_with_prefix(&"p".repeat(28)).is_err());
        assert!(ids.is_empty());
    }

    #[test]
    fn test_generators_are_independent() {
        let mut a = IdGenerator::new();
        let mut b = IdGenerator::new();
        assert_eq!(a.next_id(IdKind::Shape), "shape-1");
        assert_eq!(b.next_id(IdKind::Shape), "shape-1");
    }
}
