//! Search filtering over built trees.

use h5scope::config::FilterConfig;
use h5scope::data::{AttributeValue, HierarchicalStore, MemoryStore};
use h5scope::model::HierarchyModel;
use h5scope::navigation::{recompute, FilterEngine};

fn sample() -> HierarchyModel<MemoryStore> {
    let mut store = MemoryStore::new();
    let root = store.root();
    for run in ["run1", "run2"] {
        let run = store.add_group(root, run).unwrap();
        for det in ["detector_a", "detector_b"] {
            let det = store.add_group(run, det).unwrap();
            let image = store.add_dataset(det, "image", &[64, 64]).unwrap();
            store
                .set_attribute(&image, "exposure", AttributeValue::Float(0.1))
                .unwrap();
            store.add_dataset(det, "dark", &[64, 64]).unwrap();
        }
    }
    let trash = store.add_group(root, "trash").unwrap();
    store
        .set_attribute(&trash, "__JUNK__", AttributeValue::Integer(1))
        .unwrap();
    store.add_dataset(trash, "image", &[2, 2]).unwrap();
    HierarchyModel::new(store).unwrap()
}

fn everything() -> FilterConfig {
    FilterConfig {
        attrs_visible: true,
        junk_visible: true,
        ..FilterConfig::default()
    }
}

#[test]
fn no_terms_shows_all_but_gated_nodes() {
    let model = sample();
    let tree = model.tree();
    let set = recompute(tree, &FilterConfig::default());

    for id in tree.iter() {
        let gated = tree[id].is_attribute() || tree.is_junk(id);
        assert_eq!(set.contains(id), !gated, "{}", tree.full_path(id));
    }
    assert_eq!(recompute(tree, &everything()).len(), tree.len() - 1);
}

#[test]
fn visible_nodes_have_visible_ancestors() {
    let model = sample();
    let tree = model.tree();

    for terms in ["image", "run2 dark", "detector_b exposure", "trash", "nothing-here"] {
        let set = recompute(tree, &FilterConfig { term_string: terms.into(), ..everything() });
        for id in tree.iter().filter(|&id| set.contains(id)) {
            for ancestor in tree.ancestors(id).filter(|&a| a != tree.root()) {
                assert!(set.contains(ancestor), "{terms}: {}", tree.full_path(ancestor));
            }
        }
    }
}

#[test]
fn term_order_does_not_matter() {
    let model = sample();
    let tree = model.tree();

    let shown = |terms: &str| -> Vec<String> {
        let set = recompute(tree, &FilterConfig { term_string: terms.into(), ..everything() });
        set.in_display_order(tree).map(|id| tree.full_path(id)).collect()
    };

    let forward = shown("run1 detector_a image");
    assert_eq!(forward, shown("image run1 detector_a"));
    assert_eq!(forward, shown("  detector_a   image run1 "));
    assert_eq!(
        forward,
        vec![
            "/run1",
            "/run1/detector_a",
            "/run1/detector_a/image",
            "/run1/detector_a/image/exposure",
        ]
    );
}

#[test]
fn junk_match_is_hidden_until_toggled() {
    let model = sample();
    let tree = model.tree();
    let mut engine = FilterEngine::new();

    engine.set_match_term(tree, "trash");
    assert!(engine.visible().is_empty());
    assert_eq!(engine.match_count(), 0);

    engine.toggle_junk_visible(tree, true);
    assert!(engine.accepts(model.find("/trash/image").unwrap()));
    assert_eq!(engine.match_count(), 2);
}

#[test]
fn search_survives_reload() {
    let mut model = sample();
    let mut engine = FilterEngine::new();
    engine.set_match_term(model.tree(), "dark");
    let before = engine.visible().len();

    let root = model.store().root();
    let run3 = model.store_mut().add_group(root, "run3").unwrap();
    model.store_mut().add_dataset(run3, "dark", &[8]).unwrap();
    model.reload().unwrap();
    engine.source_model_changed(model.tree());

    assert_eq!(engine.config().term_string, "dark");
    assert_eq!(engine.visible().generation(), 1);
    assert_eq!(engine.visible().len(), before + 2);
    assert!(engine.accepts(model.find("/run3/dark").unwrap()));
}

#[test]
fn rename_then_refilter() {
    let mut model = sample();
    let mut engine = FilterEngine::new();
    engine.set_match_term(model.tree(), "calibrated");
    assert!(engine.visible().is_empty());

    let dark = model.find("/run1/detector_a/dark").unwrap();
    model.rename(dark, "calibrated").unwrap();
    engine.source_model_changed(model.tree());

    assert_eq!(engine.current_match(), Some(dark));
    assert_eq!(engine.visible().len(), 3);
}

#[test]
fn terms_match_inside_segments_and_respect_case() {
    let model = sample();
    let tree = model.tree();
    let set = recompute(tree, &FilterConfig { term_string: "tector_".into(), ..everything() });

    for run in ["/run1", "/run2"] {
        let run_id = model.find(run).unwrap();
        assert!(set.contains(run_id));
        assert!(!set.is_match(run_id));
        for det in ["detector_a", "detector_b"] {
            let det_id = model.find(&format!("{run}/{det}")).unwrap();
            assert!(set.is_match(det_id));
            assert!(set.contains(det_id));
        }
    }
    assert!(!set.contains(model.find("/trash").unwrap()));

    for terms in ["Image", "DARK", "Run1 dark"] {
        let set = recompute(tree, &FilterConfig { term_string: terms.into(), ..everything() });
        assert!(set.is_empty(), "{terms}");
    }
}
