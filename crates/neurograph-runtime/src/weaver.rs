//! Response composition from activation patterns.
//!
//! A weaver looks at which nodes a cascade lit up and turns them into a
//! sentence, or declines with `None` when activation is too weak to say
//! anything meaningful.

use crate::error::Result;
use crate::store::GraphStore;
use neurograph_core::neurochemistry::Tone;
use neurograph_core::types::*;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Response-type nodes above this energy are spoken verbatim.
pub const RESPONSE_NODE_ENERGY: f64 = 0.3;
/// Concept nodes above this energy take part in composition.
pub const CONCEPT_ENERGY: f64 = 0.2;

/// Turns an activation result into an utterance.
pub trait Weaver: Send {
    /// Compose a reply, or `None` when activation is insufficient.
    fn weave(
        &mut self,
        store: &GraphStore,
        activation: &ActivationResult,
        input: &str,
        stats: &GraphStats,
        tone: Tone,
    ) -> Result<Option<String>>;
}

/// The shapes a composed reply can take.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseKind {
    Association { a: String, b: String },
    Explanation { concept: String, related: Vec<String> },
    Uncertainty { concept: String },
    Curiosity { concept: String, related: String },
    Greeting { nodes: u64, synapses: u64 },
    Identity { nodes: u64, synapses: u64 },
    Reflection { top: String, count: u64 },
}

impl ResponseKind {
    /// Number of phrasings available for this kind.
    pub fn variants(&self) -> usize {
        match self {
            ResponseKind::Association { .. } => 4,
            ResponseKind::Explanation { .. } => 3,
            ResponseKind::Uncertainty { .. } => 3,
            ResponseKind::Curiosity { .. } => 2,
            ResponseKind::Greeting { .. } => 2,
            ResponseKind::Identity { .. } => 2,
            ResponseKind::Reflection { .. } => 2,
        }
    }

    /// Render phrasing `variant` (taken modulo `variants()`).
    pub fn render(&self, variant: usize) -> String {
        let v = variant % self.variants();
        match self {
            ResponseKind::Association { a, b } => match v {
                0 => format!("When I think of {a}, {b} comes to mind."),
                1 => format!("{a} reminds me of {b}."),
                2 => format!("I believe {a} is connected to {b}."),
                _ => format!("I know {a} has to do with {b}."),
            },
            ResponseKind::Explanation { concept, related } => {
                let detail = format!("It is connected to {}.", related.join(", "));
                match v {
                    0 => format!("{concept} is something I have learned. {detail}"),
                    1 => format!("About {concept}: {detail}"),
                    _ => format!("{concept}... {detail}"),
                }
            }
            ResponseKind::Uncertainty { concept } => match v {
                0 => format!("{concept} sounds familiar, but it is not clear to me yet."),
                1 => format!("I know a little about {concept}, but I need to learn more."),
                _ => format!("I have heard of {concept}, can you tell me more?"),
            },
            ResponseKind::Curiosity { concept, related } => match v {
                0 => format!("Does {concept} connect with {related}? I'd like to explore that."),
                _ => format!("I wonder how {concept} and {related} relate."),
            },
            ResponseKind::Greeting { nodes, synapses } => match v {
                0 => format!("Hello! I have {nodes} ideas linked by {synapses} neural paths."),
                _ => format!("Hey! My brain holds {nodes} concepts with {synapses} connections."),
            },
            ResponseKind::Identity { nodes, synapses } => match v {
                0 => format!(
                    "I am a neurograph. I hold {nodes} concepts and make new connections every day."
                ),
                _ => format!("I am a neurograph with {synapses} synapses between {nodes} ideas."),
            },
            ResponseKind::Reflection { top, count } => match v {
                0 => format!("What I know most about is {top}. I have thought of it {count} times."),
                _ => format!("My most active neuron is '{top}'; I have used it {count} times."),
            },
        }
    }
}

const GREETING_WORDS: &[&str] = &["hola", "hello", "hey", "hi", "buenas", "saludos", "greetings"];
const GREETING_PHRASES: &[&str] = &[
    "buenos días",
    "buenas tardes",
    "buenas noches",
    "qué tal",
    "que tal",
    "como estas",
    "good morning",
    "good evening",
];
const IDENTITY_MARKERS: &[&str] = &[
    "quien eres",
    "quién eres",
    "como te llamas",
    "cómo te llamas",
    "tu nombre",
    "what is your name",
    "who are you",
];
const REFLECTION_MARKERS: &[&str] = &[
    "que sabes",
    "qué sabes",
    "que has aprendido",
    "qué has aprendido",
    "reflexiona",
    "what do you know",
    "what have you learned",
    "reflect",
];

pub fn is_greeting(input: &str) -> bool {
    let text = input.to_lowercase();
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '!' | '¡' | '?' | '¿' | ',' | '.'))
        .collect();
    cleaned
        .split_whitespace()
        .any(|w| GREETING_WORDS.contains(&w))
        || GREETING_PHRASES.iter().any(|p| cleaned.contains(p))
}

pub fn is_identity_question(input: &str) -> bool {
    let text = input.to_lowercase();
    IDENTITY_MARKERS.iter().any(|m| text.contains(m))
}

pub fn is_reflection_request(input: &str) -> bool {
    let text = input.to_lowercase();
    REFLECTION_MARKERS.iter().any(|m| text.contains(m))
}

/// Prefixes that flavor a composed reply with the current tone.
fn tone_prefixes(tone: Tone) -> &'static [&'static str] {
    match tone {
        Tone::Warm => &["I like this connection: ", "That sounds right: "],
        Tone::Focused => &["Key point: ", "Specifically: "],
        Tone::Defensive => &["Carefully: ", "Step by step: "],
        Tone::Reflective => &["Looking at it calmly: ", "On reflection: "],
        Tone::Neutral => &[],
    }
}

/// Template-driven weaver with an injected random source.
pub struct TemplateWeaver {
    rng: StdRng,
}

impl Default for TemplateWeaver {
    fn default() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }
}

impl TemplateWeaver {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Pick the reply shape for an activation, without rendering it.
    ///
    /// Response nodes and the canned patterns are handled by [`Weaver::weave`].
    pub fn compose(
        &self,
        store: &GraphStore,
        activation: &ActivationResult,
    ) -> Result<Option<ResponseKind>> {
        let concepts: Vec<&Node> = activation
            .fired_nodes
            .iter()
            .filter(|n| n.node_type == NodeType::Concept && n.energy > CONCEPT_ENERGY)
            .collect();

        match concepts.as_slice() {
            [] => Ok(None),
            [only] => {
                let connections = store.strongest_connections(&only.label, 3)?;
                if connections.is_empty() {
                    Ok(Some(ResponseKind::Uncertainty {
                        concept: only.label.clone(),
                    }))
                } else {
                    Ok(Some(ResponseKind::Explanation {
                        concept: only.label.clone(),
                        related: connections.into_iter().take(2).map(|(l, _)| l).collect(),
                    }))
                }
            }
            [a, b, ..] => {
                let connections = store.strongest_connections(&a.label, 5)?;
                if connections.iter().any(|(label, _)| *label == b.label) {
                    Ok(Some(ResponseKind::Association {
                        a: a.label.clone(),
                        b: b.label.clone(),
                    }))
                } else {
                    Ok(Some(ResponseKind::Curiosity {
                        concept: a.label.clone(),
                        related: b.label.clone(),
                    }))
                }
            }
        }
    }

    fn render(&mut self, kind: &ResponseKind) -> String {
        let variant = self.rng.gen_range(0..kind.variants());
        kind.render(variant)
    }
}

impl Weaver for TemplateWeaver {
    fn weave(
        &mut self,
        store: &GraphStore,
        activation: &ActivationResult,
        input: &str,
        stats: &GraphStats,
        tone: Tone,
    ) -> Result<Option<String>> {
        if activation.is_empty() {
            return Ok(None);
        }

        if let Some(node) = activation
            .fired_nodes
            .iter()
            .find(|n| n.node_type == NodeType::Response && n.energy > RESPONSE_NODE_ENERGY)
        {
            return Ok(Some(node.label.clone()));
        }

        let canned = if is_greeting(input) {
            Some(ResponseKind::Greeting {
                nodes: stats.total_nodes,
                synapses: stats.total_synapses,
            })
        } else if is_identity_question(input) {
            Some(ResponseKind::Identity {
                nodes: stats.total_nodes,
                synapses: stats.total_synapses,
            })
        } else if is_reflection_request(input) {
            Some(ResponseKind::Reflection {
                top: stats
                    .most_fired_node
                    .clone()
                    .unwrap_or_else(|| "something".to_string()),
                count: stats.most_fired_count,
            })
        } else {
            None
        };
        if let Some(kind) = canned {
            return Ok(Some(self.render(&kind)));
        }

        let Some(kind) = self.compose(store, activation)? else {
            return Ok(None);
        };
        let reply = self.render(&kind);
        let prefix = tone_prefixes(tone).choose(&mut self.rng);
        Ok(Some(match prefix {
            Some(p) => format!("{p}{reply}"),
            None => reply,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationEngine;
    use neurograph_core::params::{GraphParams, FIRE_ENERGY};

    fn activate(store: &GraphStore, seeds: &[&str]) -> ActivationResult {
        ActivationEngine::new(store)
            .activate(seeds, FIRE_ENERGY, &GraphParams::default())
            .unwrap()
    }

    #[test]
    fn empty_activation_yields_none() {
        let store = GraphStore::open_in_memory().unwrap();
        let mut weaver = TemplateWeaver::seeded(1);
        let out = weaver
            .weave(&store, &ActivationResult::default(), "hello", &GraphStats::default(), Tone::Neutral)
            .unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn response_node_is_spoken_verbatim() {
        let store = GraphStore::open_in_memory().unwrap();
        store.get_or_create_node("nice to see you", NodeType::Response).unwrap();
        let result = activate(&store, &["nice to see you"]);
        let mut weaver = TemplateWeaver::seeded(2);
        let out = weaver
            .weave(&store, &result, "hello", &store.stats().unwrap(), Tone::Warm)
            .unwrap();
        assert_eq!(out.as_deref(), Some("nice to see you"));
    }

    #[test]
    fn connected_concepts_become_an_association() {
        let store = GraphStore::open_in_memory().unwrap();
        store.connect("dog", "animal", 0.9, SynapseType::Association).unwrap();
        let result = activate(&store, &["dog", "animal"]);
        let weaver = TemplateWeaver::seeded(3);
        let kind = weaver.compose(&store, &result).unwrap().unwrap();
        assert!(matches!(kind, ResponseKind::Association { .. }));
    }

    #[test]
    fn unconnected_concepts_spark_curiosity() {
        let store = GraphStore::open_in_memory().unwrap();
        store.get_or_create_node("moon", NodeType::Concept).unwrap();
        store.get_or_create_node("cheese", NodeType::Concept).unwrap();
        let result = activate(&store, &["moon", "cheese"]);
        let kind = TemplateWeaver::seeded(4).compose(&store, &result).unwrap().unwrap();
        assert!(matches!(kind, ResponseKind::Curiosity { .. }));
    }

    #[test]
    fn single_concept_explains_or_admits_uncertainty() {
        let store = GraphStore::open_in_memory().unwrap();
        store.get_or_create_node("quark", NodeType::Concept).unwrap();
        let result = activate(&store, &["quark"]);
        let kind = TemplateWeaver::seeded(5).compose(&store, &result).unwrap().unwrap();
        assert_eq!(kind, ResponseKind::Uncertainty { concept: "quark".into() });

        store.connect("quark", "physics", 0.1, SynapseType::Association).unwrap();
        let result = activate(&store, &["quark"]);
        let kind = TemplateWeaver::seeded(5).compose(&store, &result).unwrap().unwrap();
        assert_eq!(
            kind,
            ResponseKind::Explanation {
                concept: "quark".into(),
                related: vec!["physics".into()],
            }
        );
    }

    #[test]
    fn greeting_uses_stats() {
        let store = GraphStore::open_in_memory().unwrap();
        store.get_or_create_node("sun", NodeType::Concept).unwrap();
        let result = activate(&store, &["sun"]);
        let stats = GraphStats {
            total_nodes: 7,
            total_synapses: 12,
            ..Default::default()
        };
        let out = TemplateWeaver::seeded(6)
            .weave(&store, &result, "Hola!", &stats, Tone::Neutral)
            .unwrap()
            .unwrap();
        assert!(out.contains('7') && out.contains("12"));
    }

    #[test]
    fn classifiers() {
        assert!(is_greeting("¡Hola, amigo!"));
        assert!(is_greeting("good morning"));
        assert!(!is_greeting("this is high"));
        assert!(is_identity_question("Who are you?"));
        assert!(is_reflection_request("¿Qué sabes?"));
    }

    #[test]
    fn every_variant_renders() {
        let kinds = [
            ResponseKind::Association { a: "a".into(), b: "b".into() },
            ResponseKind::Explanation { concept: "c".into(), related: vec!["d".into()] },
            ResponseKind::Uncertainty { concept: "e".into() },
            ResponseKind::Curiosity { concept: "f".into(), related: "g".into() },
            ResponseKind::Greeting { nodes: 1, synapses: 2 },
            ResponseKind::Identity { nodes: 1, synapses: 2 },
            ResponseKind::Reflection { top: "h".into(), count: 3 },
        ];
        for kind in &kinds {
            for v in 0..kind.variants() {
                assert!(!kind.render(v).is_empty());
            }
        }
    }
}
