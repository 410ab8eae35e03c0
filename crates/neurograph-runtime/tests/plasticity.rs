//! Hebbian Learning and Decay
//!
//! Checks that co-occurrence wiring:
//! 1. Creates exactly one synapse per ordered pair
//! 2. Strengthens by the scaled increment and never exceeds the cap
//! 3. Decays every weight and prunes what sinks to the floor

use neurograph_core::params::*;
use neurograph_core::types::*;
use neurograph_runtime::plasticity::PlasticityEngine;
use neurograph_runtime::store::GraphStore;

fn weight(store: &GraphStore, src: &str, dst: &str) -> Option<f64> {
    let src = store.get_node(src).unwrap()?;
    let dst = store.get_node(dst).unwrap()?;
    store.get_synapse(src.id, dst.id).unwrap().map(|s| s.weight)
}

#[test]
fn three_labels_make_six_synapses() {
    let store = GraphStore::open_in_memory().unwrap();
    let engine = PlasticityEngine::new(&store);

    let touched = engine.reinforce_pairs(&["A", "B", "C"], 1.0).unwrap();
    assert_eq!(touched, 6);
    assert_eq!(store.synapse_count().unwrap(), 6);
    for (s, d) in [("a", "b"), ("b", "a"), ("a", "c"), ("c", "a"), ("b", "c"), ("c", "b")] {
        assert_eq!(weight(&store, s, d), Some(INITIAL_SYNAPSE_WEIGHT));
    }
}

#[test]
fn repeated_pairs_grow_by_scaled_increment() {
    let store = GraphStore::open_in_memory().unwrap();
    let engine = PlasticityEngine::new(&store);

    engine.reinforce_pairs(&["sun", "light"], 1.0).unwrap();
    engine.reinforce_pairs(&["sun", "light"], 1.5).unwrap();

    let w = weight(&store, "sun", "light").unwrap();
    let expected = INITIAL_SYNAPSE_WEIGHT + HEBBIAN_INCREMENT * 1.5;
    assert!((w - expected).abs() < 1e-12, "got {w}, want {expected}");
    assert_eq!(store.synapse_count().unwrap(), 2);
}

#[test]
fn blank_labels_are_skipped() {
    let store = GraphStore::open_in_memory().unwrap();
    let engine = PlasticityEngine::new(&store);

    assert_eq!(engine.reinforce_pairs(&["dog", "  ", "cat"], 1.0).unwrap(), 2);
    assert_eq!(store.node_count().unwrap(), 2);
    assert_eq!(weight(&store, "dog", "cat"), Some(INITIAL_SYNAPSE_WEIGHT));

    let linked = engine
        .reinforce_links(&["", "dog"], &["bird", "\t"], SynapseType::Response, 1.0)
        .unwrap();
    assert_eq!(linked, 1);
    assert_eq!(store.node_count().unwrap(), 3);
}

#[test]
fn weights_never_leave_unit_range() {
    let store = GraphStore::open_in_memory().unwrap();
    let engine = PlasticityEngine::new(&store);

    for _ in 0..100 {
        engine.reinforce_pairs(&["x", "y", "z"], 1.8).unwrap();
    }
    for s in store.all_synapses().unwrap() {
        assert!(s.weight >= 0.0 && s.weight <= HEBBIAN_MAX_WEIGHT);
    }
    assert_eq!(weight(&store, "x", "z"), Some(HEBBIAN_MAX_WEIGHT));
}

#[test]
fn decay_never_increases_and_prunes_the_floor() {
    let store = GraphStore::open_in_memory().unwrap();
    store.connect("strong", "bond", 0.5, SynapseType::Association).unwrap();
    store.connect("weak", "link", 0.03, SynapseType::Association).unwrap();
    store.connect("dust", "mote", 0.02, SynapseType::Association).unwrap();

    let before: Vec<_> = store.all_synapses().unwrap();
    let report = PlasticityEngine::new(&store).decay_and_prune().unwrap();
    let after = store.all_synapses().unwrap();

    for s in &after {
        let old = before.iter().find(|b| b.id == s.id).unwrap();
        assert!(s.weight <= old.weight);
        assert!(s.weight > SYNAPTIC_MIN_WEIGHT);
    }
    // 0.5 and 0.03 decay; 0.03 lands on the floor and goes with 0.02.
    assert_eq!(report.synapses_decayed, 2);
    assert_eq!(report.synapses_pruned, 2);
    assert_eq!(after.len(), 1);
    assert!((after[0].weight - 0.49).abs() < 1e-12);
}

#[test]
fn orphans_are_pruned_unless_fired() {
    let store = GraphStore::open_in_memory().unwrap();
    store.connect("left", "right", 0.02, SynapseType::Association).unwrap();
    let left = store.get_node("left").unwrap().unwrap();
    store.fire_node(left.id, 1.0).unwrap();

    let report = PlasticityEngine::new(&store).decay_and_prune().unwrap();
    assert_eq!(report.synapses_pruned, 1);
    assert_eq!(report.orphan_nodes_pruned, 1);
    assert!(store.get_node("left").unwrap().is_some());
    assert!(store.get_node("right").unwrap().is_none());
}

#[test]
fn taught_association_relearns_at_half_strength() {
    let store = GraphStore::open_in_memory().unwrap();
    let engine = PlasticityEngine::new(&store);

    let first = engine
        .learn_association("Rust", "ownership", 0.4, SynapseType::Association)
        .unwrap()
        .unwrap();
    assert!((first.weight - 0.4).abs() < 1e-12);

    let second = engine
        .learn_association("rust", "Ownership", 0.4, SynapseType::Association)
        .unwrap()
        .unwrap();
    assert!((second.weight - 0.6).abs() < 1e-12);

    assert!(engine
        .learn_association("echo", " ECHO", 0.4, SynapseType::Association)
        .unwrap()
        .is_none());
    assert!(weight(&store, "ownership", "rust").is_none());
}
