//! Configuration for tree building and filtering.

use crate::data::{AXIS_KEYS, JUNK_KEY};

/// Configuration for building a tree from a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeConfig {
    /// Attribute keys never shown as attribute rows.
    pub reserved_keys: Vec<String>,
    /// Attribute key whose value sets the node's junk flag.
    pub junk_key: String,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            reserved_keys: AXIS_KEYS.iter().map(|k| k.to_string()).collect(),
            junk_key: JUNK_KEY.to_string(),
        }
    }
}

impl TreeConfig {
    /// Whether `key` is bookkeeping that must not appear as a row.
    pub fn is_reserved(&self, key: &str) -> bool {
        key == self.junk_key || self.reserved_keys.iter().any(|k| k == key)
    }
}

/// Search string and visibility toggles for one filter pass.
///
/// Passed whole into [`crate::navigation::recompute`], so a filter result is
/// a pure function of the tree and this value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Whitespace-separated search terms, AND-ed together.
    pub term_string: String,
    /// Show attribute rows.
    pub attrs_visible: bool,
    /// Show junk-marked subtrees.
    pub junk_visible: bool,
}

impl FilterConfig {
    /// Config with the given search string and both gates closed.
    pub fn with_terms(term_string: impl Into<String>) -> Self {
        Self {
            term_string: term_string.into(),
            ..Self::default()
        }
    }

    /// The search terms; an empty string yields none.
    pub fn terms(&self) -> impl Iterator<Item = &str> + '_ {
        self.term_string.split_whitespace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_reserved_keys() {
        let config = TreeConfig::default();
        for key in ["DIMENSION_SCALE", "DIMENSION_LIST", "CLASS", "NAME", "REFERENCE_LIST"] {
            assert!(config.is_reserved(key));
        }
        assert!(config.is_reserved("__JUNK__"));
        assert!(!config.is_reserved("units"));
    }

    #[test]
    fn terms_split_on_whitespace() {
        let config = FilterConfig::with_terms("  scan \t counts\n");
        assert_eq!(config.terms().collect::<Vec<_>>(), vec!["scan", "counts"]);
        assert_eq!(FilterConfig::default().terms().count(), 0);
    }
}
