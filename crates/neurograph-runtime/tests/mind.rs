//! Foreground Mind
//!
//! Full interaction cycles against an in-memory store: perception wiring,
//! chemistry persistence, feedback reinforcement and taught associations.

use neurograph_core::neurochemistry::{Neurochemistry, BASELINE};
use neurograph_core::params::*;
use neurograph_core::types::*;
use neurograph_runtime::config::NeurographConfig;
use neurograph_runtime::mind::{Affect, Mind};
use neurograph_runtime::store::GraphStore;
use neurograph_runtime::weaver::TemplateWeaver;

fn mind() -> Mind {
    Mind::new(GraphStore::open_in_memory().unwrap())
        .unwrap()
        .with_weaver(Box::new(TemplateWeaver::seeded(11)))
}

#[test]
fn perception_wires_input_words() {
    let mut mind = mind();
    let p = mind.perceive("The dog chased the cat", None).unwrap();
    assert_eq!(p.labels, vec!["dog", "chased", "cat"]);
    assert_eq!(p.synapses_touched, 6);
    assert!(p.novel);
    assert_eq!(mind.store().synapse_count().unwrap(), 6);
    // novel input raises dopamine and norepinephrine
    assert!(mind.chemistry().norepinephrine > BASELINE.norepinephrine);
}

#[test]
fn affect_moves_chemistry() {
    let mut mind = mind();
    mind.perceive("wrong", Some(Affect::Frustrated)).unwrap();
    assert!(mind.chemistry().cortisol > BASELINE.cortisol);

    let mut mind = self::mind();
    mind.perceive("lovely", Some(Affect::Pleased)).unwrap();
    assert!(mind.chemistry().oxytocin > BASELINE.oxytocin);
}

#[test]
fn interaction_always_answers() {
    let mut mind = mind();
    let first = mind.interact("quasar").unwrap();
    assert!(!first.response.is_empty());
    assert_eq!(mind.last_response(), first.response);

    let silent = mind.interact("the a an").unwrap();
    assert!(!silent.woven);
    assert_eq!(silent.response, "...?");
}

#[test]
fn learning_persists_chemistry() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = NeurographConfig::default();
    config.store.path = dir.path().join("brain.db");
    config.chemistry.homeostasis_speed = 0.5;

    let mut mind = Mind::open(&config).unwrap();
    mind.interact("spaceship rocket orbit planet").unwrap();
    let saved = mind.chemistry();
    assert_ne!(saved, Neurochemistry::default());
    drop(mind);

    let reopened = Mind::open(&config).unwrap();
    assert_eq!(reopened.chemistry(), saved);
}

#[test]
fn positive_feedback_links_input_to_reply() {
    let mut mind = mind();
    mind.interact("telescope").unwrap();
    let reply_words = neurograph_core::lexicon::extract_labels(mind.last_response());
    let linked = mind.feedback(1.0).unwrap();
    let expected = reply_words.iter().filter(|w| w.as_str() != "telescope").count();
    assert_eq!(linked, expected);

    let telescope = mind.store().get_node("telescope").unwrap().unwrap();
    let out = mind.store().outgoing(telescope.id, 0.0).unwrap();
    assert_eq!(out.len(), expected);
    assert!(mind.chemistry().dopamine > BASELINE.dopamine);
}

#[test]
fn feedback_links_grow_at_the_plain_hebbian_rate() {
    let mut mind = mind();
    mind.interact("telescope").unwrap();
    mind.feedback(1.0).unwrap();
    // dopamine is up now, so chemistry-derived plasticity would exceed 1.0
    assert!(mind.chemistry().graph_params().plasticity > 1.0);
    mind.feedback(1.0).unwrap();

    let telescope = mind.store().get_node("telescope").unwrap().unwrap();
    let out = mind.store().outgoing(telescope.id, 0.0).unwrap();
    assert!(!out.is_empty());
    let expected = INITIAL_SYNAPSE_WEIGHT + HEBBIAN_INCREMENT;
    for edge in out {
        assert!((edge.weight - expected).abs() < 1e-12, "got {}", edge.weight);
    }
}

#[test]
fn negative_feedback_only_stresses() {
    let mut mind = mind();
    mind.interact("volcano").unwrap();
    let before = mind.store().synapse_count().unwrap();
    assert_eq!(mind.feedback(-1.0).unwrap(), 0);
    assert_eq!(mind.store().synapse_count().unwrap(), before);
    assert!(mind.chemistry().cortisol > BASELINE.cortisol);
}

#[test]
fn teaching_uses_default_strength() {
    let mut mind = mind();
    let syn = mind.teach("Whale", "mammal", None).unwrap().unwrap();
    assert!((syn.weight - TEACH_STRENGTH).abs() < 1e-12);
    assert_eq!(syn.syn_type, SynapseType::Association);
    assert!(mind.teach("same", "SAME", Some(0.9)).unwrap().is_none());

    let strongest = mind.store().strongest_connections("whale", 1).unwrap();
    assert_eq!(strongest[0].0, "mammal");
}

#[test]
fn taught_knowledge_shapes_the_reply() {
    let mut mind = mind();
    mind.teach("whale", "ocean", Some(0.9)).unwrap();
    let (activation, reply) = mind.respond("whale").unwrap();
    assert!(activation.labels().contains(&"ocean"));
    let reply = reply.unwrap();
    assert!(reply.contains("whale") && reply.contains("ocean"), "{reply}");
}
