//! Background musing: thinking while nobody is talking.
//!
//! Once the foreground has been quiet long enough, the musing loop picks a
//! seed concept (usually the least exercised one), lets activation spread
//! from it, and verbalizes whatever lights up. Notable thoughts are said out
//! loud through the voice queue.

use crate::activation::ActivationEngine;
use crate::config::MusingConfig;
use crate::coordinator::{read_chemistry, WorkerContext, WorkerState, WorkerStatus};
use crate::error::Result;
use crate::state::INNER_LOG_KEY;
use crate::store::GraphStore;
use crate::voice::{VoiceEngine, PRIORITY_INNER};
use crate::weaver::Weaver;
use neurograph_core::neurochemistry::Neurochemistry;
use neurograph_core::params::FIRE_ENERGY;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{debug, info, warn};

/// Number of most-fired concepts the fallback seed is drawn from.
const POPULAR_POOL: usize = 10;
/// Thoughts persisted to the state table after each step.
const PERSISTED_THOUGHTS: usize = 20;
/// Prefix for thoughts spoken aloud.
const THINKING_ALOUD: &str = "Hmm... ";

/// One verbalized musing step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InnerThought {
    pub seed: String,
    /// Peak energy of the cascade.
    pub energy: f64,
    /// 0.8 for an unconnected seed, otherwise lower the stronger its best link.
    pub surprise: f64,
    pub verbalized: String,
    pub idle_secs: f64,
    /// Seconds since the Unix epoch.
    pub at: f64,
}

/// Surprise of a seed given its strongest outgoing weight.
pub fn surprise(strongest: Option<f64>) -> f64 {
    match strongest {
        None => 0.8,
        Some(w) => (0.5 - w * 0.4).max(0.1),
    }
}

/// Whether a thought is worth saying out loud under `chem`.
pub fn should_speak(thought: &InnerThought, chem: &Neurochemistry, config: &MusingConfig) -> bool {
    let calm = chem.serotonin > 0.45 && chem.cortisol < 0.6;
    calm && (thought.energy > config.speak_energy || thought.surprise > config.speak_surprise)
}

/// Bounded in-memory log of recent thoughts.
#[derive(Debug, Clone)]
pub struct InnerLog {
    entries: Vec<InnerThought>,
    capacity: usize,
    retain: usize,
}

pub type SharedInnerLog = Arc<Mutex<InnerLog>>;

impl InnerLog {
    pub fn new(capacity: usize, retain: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity: capacity.max(1),
            retain: retain.min(capacity).max(1),
        }
    }

    pub fn shared(capacity: usize, retain: usize) -> SharedInnerLog {
        Arc::new(Mutex::new(Self::new(capacity, retain)))
    }

    /// Append, trimming to the newest `retain` entries once past capacity.
    pub fn push(&mut self, thought: InnerThought) {
        self.entries.push(thought);
        if self.entries.len() > self.capacity {
            let excess = self.entries.len() - self.retain;
            self.entries.drain(..excess);
        }
    }

    /// The newest `limit` thoughts, oldest first.
    pub fn recent(&self, limit: usize) -> &[InnerThought] {
        let start = self.entries.len().saturating_sub(limit);
        &self.entries[start..]
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The musing worker. Owns its own store connection.
pub struct Musing {
    store: GraphStore,
    weaver: Box<dyn Weaver>,
    rng: StdRng,
    config: MusingConfig,
}

impl Musing {
    pub fn new(store: GraphStore, weaver: Box<dyn Weaver>, rng: StdRng, config: MusingConfig) -> Self {
        Self {
            store,
            weaver,
            rng,
            config,
        }
    }

    /// Mostly the least-fired concept; otherwise a random popular one.
    pub fn select_seed(&mut self) -> Result<Option<String>> {
        if self.rng.gen_bool(self.config.seed_bias()) {
            if let Some(seed) = self.store.least_fired_concept()? {
                return Ok(Some(seed));
            }
        }
        let pool = self.store.most_fired_concepts(POPULAR_POOL)?;
        Ok(pool.choose(&mut self.rng).cloned())
    }

    /// Think one thought. `None` when the graph holds no concepts.
    pub fn step(&mut self, idle: Duration, chem: &Neurochemistry) -> Result<Option<InnerThought>> {
        let Some(seed) = self.select_seed()? else {
            return Ok(None);
        };

        let params = chem.graph_params();
        let activation =
            ActivationEngine::new(&self.store).activate(&[seed.as_str()], FIRE_ENERGY, &params)?;
        let stats = self.store.stats()?;
        let verbalized = self
            .weaver
            .weave(&self.store, &activation, &seed, &stats, chem.tone())?
            .unwrap_or_else(|| format!("{seed}... still trying to connect this idea better."));

        let strongest = self
            .store
            .strongest_connections(&seed, 3)?
            .first()
            .map(|(_, w)| *w);

        let at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);

        Ok(Some(InnerThought {
            seed,
            energy: activation.peak_energy,
            surprise: surprise(strongest),
            verbalized,
            idle_secs: (idle.as_secs_f64() * 10.0).round() / 10.0,
            at,
        }))
    }

    /// Log, persist and maybe voice a thought.
    pub fn record(
        &self,
        thought: InnerThought,
        log: &SharedInnerLog,
        chem: &Neurochemistry,
        voice: &VoiceEngine,
    ) -> Result<()> {
        if should_speak(&thought, chem, &self.config) {
            voice.speak(&format!("{THINKING_ALOUD}{}", thought.verbalized), PRIORITY_INNER);
        }
        let recent = {
            let mut log = log.lock().unwrap_or_else(PoisonError::into_inner);
            log.push(thought);
            log.recent(PERSISTED_THOUGHTS).to_vec()
        };
        self.store.save_state(INNER_LOG_KEY, &recent)
    }

    /// Loop until stopped.
    pub fn run(mut self, ctx: &WorkerContext, status: &WorkerStatus) {
        info!("musing started");
        while !ctx.stop.is_stopped() {
            let idle = ctx.clock.idle();
            if idle < self.config.idle_threshold() {
                status.set(WorkerState::Suspended);
                ctx.stop.sleep(self.config.poll());
                continue;
            }

            status.set(WorkerState::Running);
            let chem = read_chemistry(&ctx.chemistry);
            let outcome = self
                .step(idle, &chem)
                .and_then(|t| match t {
                    Some(thought) => {
                        debug!(seed = %thought.seed, surprise = thought.surprise, "inner thought");
                        self.record(thought, &ctx.inner_log, &chem, &ctx.voice)
                    }
                    None => Ok(()),
                });
            if let Err(e) = outcome {
                warn!(error = %e, "musing step failed");
            }

            status.set(WorkerState::Idle);
            ctx.stop.sleep(self.config.cadence(idle));
        }
        status.set(WorkerState::Stopped);
        info!("musing stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::DeliveryQueue;
    use crate::weaver::TemplateWeaver;
    use neurograph_core::types::{NodeType, SynapseType};
    use rand::SeedableRng;

    fn musing(store: GraphStore, bias: f64) -> Musing {
        let config = MusingConfig {
            least_fired_bias: bias,
            ..MusingConfig::default()
        };
        Musing::new(
            store,
            Box::new(TemplateWeaver::seeded(7)),
            StdRng::seed_from_u64(7),
            config,
        )
    }

    fn thought(energy: f64, surprise: f64) -> InnerThought {
        InnerThought {
            seed: "x".into(),
            energy,
            surprise,
            verbalized: "x".into(),
            idle_secs: 30.0,
            at: 0.0,
        }
    }

    #[test]
    fn empty_graph_has_no_thoughts() {
        let mut m = musing(GraphStore::open_in_memory().unwrap(), 0.6);
        let out = m.step(Duration::from_secs(30), &Neurochemistry::default()).unwrap();
        assert!(out.is_none());
    }

    #[test]
    fn full_bias_picks_least_fired() {
        let store = GraphStore::open_in_memory().unwrap();
        let busy = store.get_or_create_node("busy", NodeType::Concept).unwrap();
        store.get_or_create_node("quiet", NodeType::Concept).unwrap();
        store.fire_node(busy.id, 1.0).unwrap();
        let mut m = musing(store, 1.0);
        assert_eq!(m.select_seed().unwrap().as_deref(), Some("quiet"));
    }

    #[test]
    fn zero_bias_picks_from_popular_pool() {
        let store = GraphStore::open_in_memory().unwrap();
        store.get_or_create_node("only", NodeType::Concept).unwrap();
        store.get_or_create_node("a reply", NodeType::Response).unwrap();
        let mut m = musing(store, 0.0);
        for _ in 0..5 {
            assert_eq!(m.select_seed().unwrap().as_deref(), Some("only"));
        }
    }

    #[test]
    fn non_finite_bias_still_selects() {
        for bias in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let store = GraphStore::open_in_memory().unwrap();
            store.get_or_create_node("only", NodeType::Concept).unwrap();
            let mut m = musing(store, bias);
            assert_eq!(m.select_seed().unwrap().as_deref(), Some("only"));
        }
    }

    #[test]
    fn unconnected_seed_is_surprising() {
        let store = GraphStore::open_in_memory().unwrap();
        store.get_or_create_node("island", NodeType::Concept).unwrap();
        let mut m = musing(store, 1.0);
        let t = m
            .step(Duration::from_secs(42), &Neurochemistry::default())
            .unwrap()
            .unwrap();
        assert_eq!(t.seed, "island");
        assert_eq!(t.surprise, 0.8);
        assert_eq!(t.energy, 1.0);
        assert!(!t.verbalized.is_empty());
    }

    #[test]
    fn surprise_falls_with_link_strength() {
        assert_eq!(surprise(None), 0.8);
        assert!((surprise(Some(0.5)) - 0.3).abs() < 1e-12);
        assert_eq!(surprise(Some(0.95)), 0.1);
    }

    #[test]
    fn speaking_needs_calm_chemistry() {
        let config = MusingConfig::default();
        let calm = Neurochemistry::default();
        assert!(!should_speak(&thought(0.5, 0.5), &calm, &config));
        assert!(should_speak(&thought(0.9, 0.2), &calm, &config));
        assert!(should_speak(&thought(0.1, 0.8), &calm, &config));

        let stressed = Neurochemistry::new(0.5, 0.5, 0.3, 0.7, 0.3);
        assert!(!should_speak(&thought(1.0, 0.8), &stressed, &config));
    }

    #[test]
    fn inner_log_trims_to_retain() {
        let mut log = InnerLog::new(5, 3);
        for i in 0..6 {
            log.push(thought(i as f64, 0.0));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.recent(1)[0].energy, 5.0);
        assert_eq!(log.recent(10).len(), 3);
    }

    #[test]
    fn record_persists_and_speaks() {
        let store = GraphStore::open_in_memory().unwrap();
        store.connect("sun", "warmth", 0.5, SynapseType::Association).unwrap();
        let mut m = musing(store, 1.0);
        let chem = Neurochemistry::default();
        let t = m.step(Duration::from_secs(60), &chem).unwrap().unwrap();

        let queue = Arc::new(DeliveryQueue::new());
        let voice = VoiceEngine::new(queue.clone(), true);
        let log = InnerLog::shared(200, 120);
        m.record(t, &log, &chem, &voice).unwrap();

        assert_eq!(log.lock().unwrap().len(), 1);
        let saved: Vec<InnerThought> = m.store.load_state(INNER_LOG_KEY).unwrap().unwrap();
        assert_eq!(saved.len(), 1);
        let spoken = queue.pop_timeout(Duration::ZERO).unwrap();
        assert!(spoken.text.starts_with("Hmm... "));
        assert_eq!(spoken.priority, PRIORITY_INNER);
    }
}
