//! Hebbian learning and synaptic decay.
//!
//! "Neurons that fire together wire together": every pair of labels seen
//! together gets a synapse in both directions, and repeated co-occurrence
//! strengthens it. Unused synapses lose a fixed amount of weight per decay
//! pass and are pruned once they sink to the floor.
//!
//! Decay is global and unconditional. A time-weighted variant keyed on
//! `last_fired` would spare recently used synapses.

use crate::error::Result;
use crate::store::GraphStore;
use neurograph_core::params::{
    HEBBIAN_INCREMENT, HEBBIAN_MAX_WEIGHT, INITIAL_SYNAPSE_WEIGHT, SYNAPTIC_DECAY_RATE,
    SYNAPTIC_MIN_WEIGHT,
};
use neurograph_core::types::*;
use tracing::{debug, info};

/// Share of the taught strength added when an association already exists.
const RELEARN_FACTOR: f64 = 0.5;

/// Labels that survive normalization; blanks are dropped.
fn usable<S: AsRef<str>>(labels: &[S]) -> impl Iterator<Item = &str> {
    labels
        .iter()
        .map(|l| l.as_ref())
        .filter(|l| normalize_label(l).is_ok())
}

/// Applies learning rules through a borrowed store connection.
pub struct PlasticityEngine<'a> {
    store: &'a GraphStore,
}

impl<'a> PlasticityEngine<'a> {
    pub fn new(store: &'a GraphStore) -> Self {
        Self { store }
    }

    /// Wire every unordered pair of distinct labels in both directions.
    ///
    /// Blank labels are skipped. Absent synapses start at the initial weight;
    /// present ones grow by `HEBBIAN_INCREMENT * plasticity`. Returns the
    /// number of synapses created or strengthened.
    pub fn reinforce_pairs<S: AsRef<str>>(&self, labels: &[S], plasticity: f64) -> Result<usize> {
        let mut nodes: Vec<Node> = Vec::with_capacity(labels.len());
        for label in usable(labels) {
            let node = self.store.get_or_create_node(label, NodeType::Concept)?;
            if !nodes.iter().any(|n| n.id == node.id) {
                nodes.push(node);
            }
        }

        let delta = HEBBIAN_INCREMENT * plasticity;
        let mut touched = 0;
        for (i, a) in nodes.iter().enumerate() {
            for b in &nodes[i + 1..] {
                for (src, dst) in [(a, b), (b, a)] {
                    self.store.upsert_synapse(
                        src,
                        dst,
                        INITIAL_SYNAPSE_WEIGHT,
                        delta,
                        HEBBIAN_MAX_WEIGHT,
                        SynapseType::Association,
                    )?;
                    touched += 1;
                }
            }
        }
        debug!(labels = nodes.len(), synapses = touched, "reinforced co-occurrence");
        Ok(touched)
    }

    /// Wire every source label to every distinct target label, one direction.
    ///
    /// Used to tie the words of an input to the words of a well-received reply.
    pub fn reinforce_links<S: AsRef<str>, T: AsRef<str>>(
        &self,
        sources: &[S],
        targets: &[T],
        syn_type: SynapseType,
        plasticity: f64,
    ) -> Result<usize> {
        let mut touched = 0;
        for src in usable(sources) {
            let src = self.store.get_or_create_node(src, NodeType::Concept)?;
            for dst in usable(targets) {
                let dst = self.store.get_or_create_node(dst, NodeType::Concept)?;
                if dst.id == src.id {
                    continue;
                }
                self.store.upsert_synapse(
                    &src,
                    &dst,
                    INITIAL_SYNAPSE_WEIGHT,
                    HEBBIAN_INCREMENT * plasticity,
                    HEBBIAN_MAX_WEIGHT,
                    syn_type,
                )?;
                touched += 1;
            }
        }
        Ok(touched)
    }

    /// Teach `concept -> associated` explicitly.
    ///
    /// A new synapse starts at `strength`; an existing one gains half of it,
    /// capped at the Hebbian maximum. Associating a label with itself does
    /// nothing and returns `None`.
    pub fn learn_association(
        &self,
        concept: &str,
        associated: &str,
        strength: f64,
        syn_type: SynapseType,
    ) -> Result<Option<Synapse>> {
        let src = self.store.get_or_create_node(concept, NodeType::Concept)?;
        let dst = self.store.get_or_create_node(associated, NodeType::Concept)?;
        if src.id == dst.id {
            return Ok(None);
        }
        let synapse = self.store.upsert_synapse(
            &src,
            &dst,
            strength,
            strength * RELEARN_FACTOR,
            HEBBIAN_MAX_WEIGHT,
            syn_type,
        )?;
        info!(
            concept = %src.label,
            associated = %dst.label,
            weight = synapse.weight,
            "learned association"
        );
        Ok(Some(synapse))
    }

    /// Weaken every synapse, then prune the weak ones and the orphans they leave.
    pub fn decay_and_prune(&self) -> Result<PruneReport> {
        let synapses_decayed = self
            .store
            .decay_synapses(SYNAPTIC_DECAY_RATE, SYNAPTIC_MIN_WEIGHT)?;
        let synapses_pruned = self.store.delete_weak_synapses(SYNAPTIC_MIN_WEIGHT)?;
        let orphan_nodes_pruned = self.store.delete_orphan_nodes()?;
        let report = PruneReport {
            synapses_decayed,
            synapses_pruned,
            orphan_nodes_pruned,
        };
        info!(
            decayed = report.synapses_decayed,
            pruned = report.synapses_pruned,
            orphans = report.orphan_nodes_pruned,
            "decay and prune"
        );
        Ok(report)
    }
}
