//! The foreground cognitive cycle: perceive, respond, learn.

use crate::activation::ActivationEngine;
use crate::config::NeurographConfig;
use crate::coordinator::{read_chemistry, shared_chemistry, InteractionClock, SharedChemistry};
use crate::error::Result;
use crate::plasticity::PlasticityEngine;
use crate::store::GraphStore;
use crate::weaver::{TemplateWeaver, Weaver};
use neurograph_core::lexicon::{LabelExtractor, StopWordExtractor};
use neurograph_core::neurochemistry::{ChemicalEvent, Neurochemistry};
use neurograph_core::params::{FIRE_ENERGY, TEACH_STRENGTH};
use neurograph_core::types::*;
use std::sync::{Arc, PoisonError};
use tracing::{debug, info};

/// Labels at or above this count make an input "novel".
const NOVELTY_LABELS: usize = 3;
/// Reply links grow at the plain Hebbian rate, whatever the chemistry.
const FEEDBACK_PLASTICITY: f64 = 1.0;

/// Emotional colour of an input, as far as chemistry cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affect {
    /// Approval or agreement.
    Pleased,
    /// Complaint or correction.
    Frustrated,
}

const PLEASED_WORDS: &[&str] = &[
    "good", "great", "awesome", "nice", "love", "yes", "correct", "right", "bien", "genial",
    "sí", "exacto", "perfecto",
];
const FRUSTRATED_WORDS: &[&str] = &[
    "bad", "wrong", "no", "mal", "error", "mistake", "terrible", "horrible",
];

impl Affect {
    /// Word-level guess. Questions carry no affect.
    pub fn detect(text: &str) -> Option<Affect> {
        if text.contains('?') {
            return None;
        }
        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        if words.iter().any(|w| PLEASED_WORDS.contains(w)) {
            Some(Affect::Pleased)
        } else if words.iter().any(|w| FRUSTRATED_WORDS.contains(w)) {
            Some(Affect::Frustrated)
        } else {
            None
        }
    }

    fn event(self) -> ChemicalEvent {
        match self {
            Affect::Pleased => ChemicalEvent::SocialTrust,
            Affect::Frustrated => ChemicalEvent::Unanswered,
        }
    }
}

/// What perception extracted from an input.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Perception {
    pub labels: Vec<String>,
    pub synapses_touched: usize,
    pub novel: bool,
}

/// Everything one interaction produced.
#[derive(Debug, Clone)]
pub struct Interaction {
    pub perception: Perception,
    pub activation: ActivationResult,
    pub response: String,
    /// False when the weaver declined and the fallback was used.
    pub woven: bool,
}

/// Foreground owner of a store connection and the chemistry.
pub struct Mind {
    store: GraphStore,
    chemistry: SharedChemistry,
    extractor: Box<dyn LabelExtractor>,
    weaver: Box<dyn Weaver>,
    clock: Option<Arc<InteractionClock>>,
    homeostasis_speed: f64,
    last_input: Vec<String>,
    last_response: String,
}

impl Mind {
    /// Wrap a store, loading persisted chemistry.
    pub fn new(store: GraphStore) -> Result<Self> {
        let chem = store.load_chemistry()?;
        Ok(Self {
            store,
            chemistry: shared_chemistry(chem),
            extractor: Box::new(StopWordExtractor::default()),
            weaver: Box::new(TemplateWeaver::default()),
            clock: None,
            homeostasis_speed: neurograph_core::neurochemistry::HOMEOSTASIS_SPEED,
            last_input: Vec::new(),
            last_response: String::new(),
        })
    }

    /// Open the configured database.
    pub fn open(config: &NeurographConfig) -> Result<Self> {
        let store = GraphStore::open_with_timeout(&config.store.path, config.store.busy_timeout())?;
        Ok(Self::new(store)?.with_homeostasis_speed(config.chemistry.homeostasis_speed))
    }

    pub fn with_weaver(mut self, weaver: Box<dyn Weaver>) -> Self {
        self.weaver = weaver;
        self
    }

    pub fn with_extractor(mut self, extractor: Box<dyn LabelExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Touch `clock` on every interaction.
    pub fn with_clock(mut self, clock: Arc<InteractionClock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_homeostasis_speed(mut self, speed: f64) -> Self {
        self.homeostasis_speed = speed;
        self
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    pub fn chemistry(&self) -> Neurochemistry {
        read_chemistry(&self.chemistry)
    }

    /// Cell shared with background workers.
    pub fn shared_chemistry(&self) -> SharedChemistry {
        self.chemistry.clone()
    }

    pub fn last_response(&self) -> &str {
        &self.last_response
    }

    fn modulate(&self, event: ChemicalEvent) {
        self.chemistry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .modulate(event);
        debug!(event = event.as_str(), "modulated chemistry");
    }

    /// Extract labels, nudge chemistry and wire co-occurring labels together.
    pub fn perceive(&mut self, text: &str, affect: Option<Affect>) -> Result<Perception> {
        if let Some(clock) = &self.clock {
            clock.touch();
        }
        let labels = self.extractor.extract(text);
        for label in &labels {
            self.store.get_or_create_node(label, NodeType::Concept)?;
        }

        let novel = labels.len() >= NOVELTY_LABELS;
        if novel {
            self.modulate(ChemicalEvent::NovelInput);
        }
        if let Some(affect) = affect {
            self.modulate(affect.event());
        }

        let plasticity = self.chemistry().graph_params().plasticity;
        let synapses_touched = PlasticityEngine::new(&self.store).reinforce_pairs(&labels, plasticity)?;
        self.last_input = labels.clone();
        Ok(Perception {
            labels,
            synapses_touched,
            novel,
        })
    }

    /// Activate the input's labels and weave a reply.
    ///
    /// Returns the activation and `None` when the weaver had nothing to say.
    pub fn respond(&mut self, text: &str) -> Result<(ActivationResult, Option<String>)> {
        let labels = self.extractor.extract(text);
        if labels.is_empty() {
            return Ok((ActivationResult::default(), None));
        }
        let chem = self.chemistry();
        let activation =
            ActivationEngine::new(&self.store).activate(&labels, FIRE_ENERGY, &chem.graph_params())?;
        let stats = self.store.stats()?;
        let reply = self
            .weaver
            .weave(&self.store, &activation, text, &stats, chem.tone())?;
        Ok((activation, reply))
    }

    /// Homeostasis, then persist chemistry.
    pub fn learn(&mut self) -> Result<Neurochemistry> {
        let chem = {
            let mut chem = self.chemistry.write().unwrap_or_else(PoisonError::into_inner);
            chem.homeostasis(self.homeostasis_speed);
            *chem
        };
        self.store.save_chemistry(&chem)?;
        Ok(chem)
    }

    /// One full cycle: perceive, respond (with fallback), learn.
    pub fn interact(&mut self, text: &str) -> Result<Interaction> {
        let perception = self.perceive(text, Affect::detect(text))?;
        let (activation, reply) = self.respond(text)?;
        let woven = reply.is_some();
        let response = reply.unwrap_or_else(|| fallback_reply(&perception.labels));
        self.last_response = response.clone();
        self.learn()?;
        info!(
            labels = perception.labels.len(),
            fired = activation.total_fired,
            woven,
            "interaction"
        );
        Ok(Interaction {
            perception,
            activation,
            response,
            woven,
        })
    }

    /// Score the last reply. Positive scores tie the last input's words to the
    /// reply's words; negative ones only raise stress.
    pub fn feedback(&mut self, score: f64) -> Result<usize> {
        if score > 0.0 {
            self.modulate(ChemicalEvent::FeedbackPositive);
            let reply_labels = self.extractor.extract(&self.last_response);
            let linked = PlasticityEngine::new(&self.store).reinforce_links(
                &self.last_input,
                &reply_labels,
                SynapseType::Response,
                FEEDBACK_PLASTICITY,
            )?;
            self.store.save_chemistry(&self.chemistry())?;
            return Ok(linked);
        }
        if score < 0.0 {
            self.modulate(ChemicalEvent::FeedbackNegative);
            self.store.save_chemistry(&self.chemistry())?;
        }
        Ok(0)
    }

    /// Teach an explicit association. `None` strength uses the default.
    pub fn teach(
        &mut self,
        concept: &str,
        associated: &str,
        strength: Option<f64>,
    ) -> Result<Option<Synapse>> {
        if let Some(clock) = &self.clock {
            clock.touch();
        }
        PlasticityEngine::new(&self.store).learn_association(
            concept,
            associated,
            strength.unwrap_or(TEACH_STRENGTH),
            SynapseType::Association,
        )
    }

    pub fn decay_and_prune(&self) -> Result<PruneReport> {
        PlasticityEngine::new(&self.store).decay_and_prune()
    }
}

/// Plain acknowledgment used when nothing activated strongly enough.
pub fn fallback_reply(labels: &[String]) -> String {
    match labels.first() {
        Some(word) => format!("'{word}'... I'm still learning about that!"),
        None => "...?".to_string(),
    }
}
