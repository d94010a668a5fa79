//! The closed set of legal tags.

/// Ordered set of allowed tag values.
///
/// Tags can be added at any time but never removed, so a tag that was legal
/// when it was assigned stays legal for the lifetime of the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagRegistry {
    tags: Vec<String>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from tags in display order; duplicates and blanks are dropped.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut registry = Self::new();
        for tag in tags {
            registry.add(tag);
        }
        registry
    }

    /// Insert a tag if absent. Returns `true` when the registry grew.
    ///
    /// Blank tags are never registered.
    pub fn add(&mut self, tag: impl Into<String>) -> bool {
        let tag = tag.into();
        if tag.trim().is_empty() || self.contains(&tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Tags in insertion order.
    pub fn all(&self) -> &[String] {
        &self.tags
    }

    pub fn position(&self, tag: &str) -> Option<usize> {
        self.tags.iter().position(|t| t == tag)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
