//! Spreading activation.
//!
//! Seeds are fired at full energy and their energy flows breadth-first along
//! outgoing synapses, attenuated by weight and decay factor, until it falls
//! under the firing threshold or the depth limit is reached. A node reached
//! twice accumulates energy with diminishing returns:
//! `new = existing + propagated * (1 - existing)`, which keeps it in [0,1].

use crate::error::Result;
use crate::store::GraphStore;
use neurograph_core::params::{GraphParams, SYNAPTIC_MIN_WEIGHT};
use neurograph_core::types::*;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Runs activation cascades through a borrowed store connection.
pub struct ActivationEngine<'a> {
    store: &'a GraphStore,
}

impl<'a> ActivationEngine<'a> {
    pub fn new(store: &'a GraphStore) -> Self {
        Self { store }
    }

    /// Fire `seeds` at `initial_energy` and propagate under `params`.
    ///
    /// Unknown seeds are skipped. When no seed resolves the result is empty
    /// and nothing is logged.
    pub fn activate<S: AsRef<str>>(
        &self,
        seeds: &[S],
        initial_energy: f64,
        params: &GraphParams,
    ) -> Result<ActivationResult> {
        // Full-table reset per cascade; an incremental reset would only touch last cascade's nodes.
        self.store.reset_energies()?;

        let initial_energy = clamp_unit(initial_energy);
        let mut energies: HashMap<NodeId, f64> = HashMap::new();
        let mut frontier: VecDeque<(NodeId, f64, u32)> = VecDeque::new();
        let mut resolved: Vec<String> = Vec::new();
        let mut seen: HashSet<NodeId> = HashSet::new();

        for seed in seeds {
            let Some(node) = self.store.get_node(seed.as_ref())? else {
                continue;
            };
            if !seen.insert(node.id) {
                continue;
            }
            self.store.fire_node(node.id, initial_energy)?;
            energies.insert(node.id, initial_energy);
            frontier.push_back((node.id, initial_energy, 0));
            resolved.push(node.label);
        }

        if resolved.is_empty() {
            return Ok(ActivationResult::default());
        }

        while let Some((node_id, energy, depth)) = frontier.pop_front() {
            if depth >= params.max_propagation_depth {
                continue;
            }
            for edge in self.store.outgoing(node_id, SYNAPTIC_MIN_WEIGHT)? {
                let propagated = energy * edge.weight * params.decay_factor;
                if propagated < params.activation_threshold {
                    continue;
                }
                let existing = energies.get(&edge.dst_id).copied().unwrap_or(0.0);
                let new = (existing + propagated * (1.0 - existing)).min(1.0);
                if new > existing {
                    energies.insert(edge.dst_id, new);
                    self.store.raise_energy(edge.dst_id, new)?;
                    frontier.push_back((edge.dst_id, new, depth + 1));
                }
            }
        }

        let fired = self.store.nodes_above(params.activation_threshold)?;
        let result = ActivationResult::from_fired(fired);

        let trigger = resolved.join(", ");
        self.store.log_activation(
            &trigger,
            result.total_fired,
            result.peak_node.as_ref().map(|n| n.label.as_str()),
            result.peak_energy,
        )?;
        debug!(
            trigger = %trigger,
            fired = result.total_fired,
            peak = result.peak_energy,
            "activation cascade"
        );
        Ok(result)
    }
}
