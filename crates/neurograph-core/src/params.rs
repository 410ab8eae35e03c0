//! Algorithm constants and the tunable parameter set.

use serde::{Deserialize, Serialize};

/// Minimum propagated energy for an edge to carry activation.
pub const ACTIVATION_THRESHOLD: f64 = 0.15;
/// Fraction of energy kept per hop.
pub const DECAY_FACTOR: f64 = 0.6;
/// Maximum hops from a seed.
pub const MAX_PROPAGATION_DEPTH: u32 = 4;
/// Weight added per Hebbian co-fire, before plasticity scaling.
pub const HEBBIAN_INCREMENT: f64 = 0.05;
/// Ceiling for reinforced synapses.
pub const HEBBIAN_MAX_WEIGHT: f64 = 0.95;
/// Weight removed from every synapse per decay pass.
pub const SYNAPTIC_DECAY_RATE: f64 = 0.01;
/// Prune floor: synapses at or below this weight are removed.
pub const SYNAPTIC_MIN_WEIGHT: f64 = 0.02;
/// Weight of a freshly created synapse.
pub const INITIAL_SYNAPSE_WEIGHT: f64 = 0.1;
/// Energy given to a seed node.
pub const FIRE_ENERGY: f64 = 1.0;
/// Default strength of an explicitly taught association.
pub const TEACH_STRENGTH: f64 = 0.2;

/// Parameters consumed by the activation and plasticity engines.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraphParams {
    pub max_propagation_depth: u32,
    pub activation_threshold: f64,
    pub decay_factor: f64,
    pub plasticity: f64,
}

impl Default for GraphParams {
    fn default() -> Self {
        Self {
            max_propagation_depth: MAX_PROPAGATION_DEPTH,
            activation_threshold: ACTIVATION_THRESHOLD,
            decay_factor: DECAY_FACTOR,
            plasticity: 1.0,
        }
    }
}

impl GraphParams {
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.max_propagation_depth = depth;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.activation_threshold = threshold;
        self
    }

    pub fn with_decay(mut self, decay_factor: f64) -> Self {
        self.decay_factor = decay_factor;
        self
    }
}
