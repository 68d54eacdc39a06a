//! Search filtering.
//!
//! A filter pass selects the nodes whose full path contains every search
//! term, closes that set over ancestors so matches keep their place in the
//! tree, and finally hides attribute rows and junk subtrees unless their
//! toggles are on. The gates apply after the closure: a hidden attribute or
//! junk node still keeps its ancestors visible when it matches.

use crate::config::FilterConfig;
use crate::data::NodeId;
use crate::model::Tree;

/// Result of one filter pass.
#[derive(Debug, Clone, Default)]
pub struct VisibleSet {
    matched: Vec<bool>,
    closure: Vec<bool>,
    visible: Vec<bool>,
    generation: u64,
}

impl VisibleSet {
    /// Whether the node should be displayed.
    pub fn contains(&self, id: NodeId) -> bool {
        self.visible.get(id.index()).copied().unwrap_or(false)
    }

    /// Whether the node is in the ancestor closure of the term matches,
    /// before the attribute and junk gates.
    pub fn in_closure(&self, id: NodeId) -> bool {
        self.closure.get(id.index()).copied().unwrap_or(false)
    }

    /// Whether the node's own path matched every term.
    pub fn is_match(&self, id: NodeId) -> bool {
        self.matched.get(id.index()).copied().unwrap_or(false)
    }

    /// Number of displayed nodes.
    pub fn len(&self) -> usize {
        self.visible.iter().filter(|&&v| v).count()
    }

    /// Whether nothing is displayed.
    pub fn is_empty(&self) -> bool {
        !self.visible.iter().any(|&v| v)
    }

    /// Tree generation this set was computed for.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Displayed nodes in the tree's depth-first order.
    pub fn in_display_order<'a, H>(
        &'a self,
        tree: &'a Tree<H>,
    ) -> impl Iterator<Item = NodeId> + 'a {
        tree.iter().filter(move |&id| self.contains(id))
    }

    fn apply_gates<H>(&mut self, tree: &Tree<H>, attrs_visible: bool, junk_visible: bool) {
        self.visible = self
            .closure
            .iter()
            .enumerate()
            .map(|(i, &in_closure)| {
                let id = NodeId(i);
                in_closure
                    && (attrs_visible || !tree[id].is_attribute())
                    && (junk_visible || !tree.is_junk(id))
            })
            .collect();
    }
}

/// Compute the displayed nodes of `tree` for one search configuration.
pub fn recompute<H>(tree: &Tree<H>, config: &FilterConfig) -> VisibleSet {
    let terms: Vec<&str> = config.terms().collect();
    let root = tree.root();

    // With no terms every node matches.
    let mut matched = vec![false; tree.len()];
    for id in tree.iter() {
        let path = tree.full_path(id);
        matched[id.index()] = terms.iter().all(|t| path.contains(t));
    }

    // A marked node always has all of its ancestors marked, so each walk
    // stops at the first one already seen.
    let mut closure = vec![false; tree.len()];
    for id in tree.iter().filter(|id| matched[id.index()]) {
        let mut current = Some(id);
        while let Some(n) = current {
            if n == root || closure[n.index()] {
                break;
            }
            closure[n.index()] = true;
            current = tree.parent(n);
        }
    }

    let mut set = VisibleSet {
        matched,
        closure,
        visible: Vec::new(),
        generation: tree.generation(),
    };
    set.apply_gates(tree, config.attrs_visible, config.junk_visible);

    tracing::debug!(
        terms = terms.len(),
        matched = set.matched.iter().filter(|&&m| m).count(),
        visible = set.len(),
        "recomputed filter"
    );
    set
}

/// Filter state kept across tree rebuilds.
#[derive(Debug, Default)]
pub struct FilterEngine {
    config: FilterConfig,
    visible: VisibleSet,
    matches: Vec<NodeId>,
    current_match: usize,
}

impl FilterEngine {
    /// Create a filter showing everything except attributes and junk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current search configuration.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Result of the last filter pass.
    pub fn visible(&self) -> &VisibleSet {
        &self.visible
    }

    /// Whether the node is displayed.
    pub fn accepts(&self, id: NodeId) -> bool {
        self.visible.contains(id)
    }

    /// Set the search string and refilter.
    pub fn set_match_term<H>(&mut self, tree: &Tree<H>, term_string: &str) {
        self.config.term_string = term_string.to_string();
        self.refresh(tree);
    }

    /// Show or hide attribute rows.
    pub fn toggle_attrs_visible<H>(&mut self, tree: &Tree<H>, checked: bool) {
        self.config.attrs_visible = checked;
        self.regate(tree);
    }

    /// Show or hide junk subtrees.
    pub fn toggle_junk_visible<H>(&mut self, tree: &Tree<H>, checked: bool) {
        self.config.junk_visible = checked;
        self.regate(tree);
    }

    /// Refilter a rebuilt tree with the last search string.
    pub fn source_model_changed<H>(&mut self, tree: &Tree<H>) {
        self.refresh(tree);
    }

    fn refresh<H>(&mut self, tree: &Tree<H>) {
        let same_generation = self.visible.generation() == tree.generation();
        self.visible = recompute(tree, &self.config);
        self.collect_matches(tree, same_generation);
    }

    fn regate<H>(&mut self, tree: &Tree<H>) {
        if self.visible.generation() != tree.generation()
            || self.visible.closure.len() != tree.len()
        {
            self.refresh(tree);
            return;
        }
        self.visible
            .apply_gates(tree, self.config.attrs_visible, self.config.junk_visible);
        self.collect_matches(tree, true);
    }

    /// Rebuild the match list. The cursor stays on the same node only while
    /// node ids are still valid, i.e. within one tree generation.
    fn collect_matches<H>(&mut self, tree: &Tree<H>, same_generation: bool) {
        let previous = self.current_match().filter(|_| same_generation);
        self.matches.clear();
        if self.config.terms().next().is_some() {
            let visible = &self.visible;
            self.matches
                .extend(tree.iter().filter(|&id| visible.is_match(id) && visible.contains(id)));
        }
        self.current_match = previous
            .and_then(|p| self.matches.iter().position(|&m| m == p))
            .unwrap_or(0);
    }

    /// The selected displayed match, if the search has terms.
    pub fn current_match(&self) -> Option<NodeId> {
        self.matches.get(self.current_match).copied()
    }

    /// Move to the next match, wrapping around.
    pub fn next_match(&mut self) {
        if !self.matches.is_empty() {
            self.current_match = (self.current_match + 1) % self.matches.len();
        }
    }

    /// Move to the previous match, wrapping around.
    pub fn prev_match(&mut self) {
        if !self.matches.is_empty() {
            if self.current_match == 0 {
                self.current_match = self.matches.len() - 1;
            } else {
                self.current_match -= 1;
            }
        }
    }

    /// Get the number of displayed matches.
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    /// Get the current match index.
    pub fn current_match_index(&self) -> usize {
        self.current_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{AttributeValue, HierarchicalStore, MemoryStore};
    use crate::model::HierarchyModel;

    fn model() -> HierarchyModel<MemoryStore> {
        let mut store = MemoryStore::new();
        let root = store.root();
        let scan = store.add_group(root, "scan").unwrap();
        store.add_dataset(scan, "counts", &[10]).unwrap();
        store
            .set_attribute(&scan, "operator", AttributeValue::Text("ada".into()))
            .unwrap();
        let old = store.add_group(root, "old").unwrap();
        store.add_dataset(old, "counts", &[3]).unwrap();
        store
            .set_attribute(&old, "__JUNK__", AttributeValue::Integer(1))
            .unwrap();
        HierarchyModel::new(store).unwrap()
    }

    fn shown(model: &HierarchyModel<MemoryStore>, set: &VisibleSet) -> Vec<String> {
        set.in_display_order(model.tree())
            .map(|id| model.tree().full_path(id))
            .collect()
    }

    #[test]
    fn empty_search_hides_only_gated_nodes() {
        let model = model();
        let set = recompute(model.tree(), &FilterConfig::default());
        assert_eq!(shown(&model, &set), vec!["/scan", "/scan/counts"]);

        let config = FilterConfig {
            attrs_visible: true,
            junk_visible: true,
            ..FilterConfig::default()
        };
        let set = recompute(model.tree(), &config);
        assert_eq!(set.len(), model.tree().len() - 1);
        assert!(!set.contains(model.tree().root()));
    }

    #[test]
    fn attribute_match_keeps_owner_visible() {
        let model = model();
        let set = recompute(model.tree(), &FilterConfig::with_terms("operator"));
        let operator = model.find("/scan/operator").unwrap();

        assert!(set.in_closure(operator));
        assert!(!set.contains(operator));
        assert_eq!(shown(&model, &set), vec!["/scan"]);
    }

    #[test]
    fn match_inside_hidden_junk_shows_nothing() {
        let model = model();
        let set = recompute(model.tree(), &FilterConfig::with_terms("old"));
        assert!(set.is_empty());
        assert!(set.in_closure(model.find("/old/counts").unwrap()));
    }

    #[test]
    fn toggles_keep_closure() {
        let model = model();
        let mut engine = FilterEngine::new();
        engine.set_match_term(model.tree(), "counts");
        assert_eq!(shown(&model, engine.visible()), vec!["/scan", "/scan/counts"]);

        engine.toggle_junk_visible(model.tree(), true);
        assert_eq!(
            shown(&model, engine.visible()),
            vec!["/old", "/old/counts", "/scan", "/scan/counts"]
        );
        assert_eq!(engine.config().term_string, "counts");
    }

    #[test]
    fn match_cursor_wraps() {
        let model = model();
        let mut engine = FilterEngine::new();
        engine.toggle_junk_visible(model.tree(), true);
        engine.set_match_term(model.tree(), "counts");
        assert_eq!(engine.match_count(), 2);

        let first = engine.current_match();
        engine.next_match();
        engine.next_match();
        assert_eq!(engine.current_match(), first);
        engine.prev_match();
        assert_eq!(engine.current_match_index(), 1);
        assert_eq!(
            engine.current_match().map(|id| model.tree().full_path(id)),
            Some("/scan/counts".to_string())
        );
    }

    #[test]
    fn reload_resets_match_cursor() {
        let mut model = model();
        let mut engine = FilterEngine::new();
        engine.toggle_junk_visible(model.tree(), true);
        engine.set_match_term(model.tree(), "counts");
        engine.next_match();
        assert_eq!(engine.current_match_index(), 1);

        // "aaa" sorts first and shifts every id; the old id of /scan/counts
        // now names /old/counts, which is also a match.
        let stale = engine.current_match().unwrap();
        let root = model.store().root();
        let early = model.store_mut().add_group(root, "aaa").unwrap();
        model.store_mut().add_dataset(early, "counts", &[1]).unwrap();
        model.store_mut().add_dataset(early, "more_counts", &[1]).unwrap();
        model.reload().unwrap();
        assert_eq!(model.tree().full_path(stale), "/old/counts");
        engine.source_model_changed(model.tree());

        assert_eq!(engine.match_count(), 4);
        assert_eq!(engine.current_match_index(), 0);
        assert_eq!(
            engine.current_match().map(|id| model.tree().full_path(id)),
            Some("/aaa/counts".to_string())
        );
    }
}
