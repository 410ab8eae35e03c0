//! Shared types used across the store, the engines and their collaborators.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Store-assigned identifier of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Store-assigned identifier of a synapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SynapseId(pub i64);

/// What a node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    /// A concept learned from input.
    #[default]
    Concept,
    /// A canned response fragment.
    Response,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Concept => "concept",
            NodeType::Response => "response",
        }
    }
}

impl FromStr for NodeType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "concept" => Ok(NodeType::Concept),
            "response" => Ok(NodeType::Response),
            other => Err(ValidationError::UnknownNodeType(other.to_string())),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Association label carried by a synapse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SynapseType {
    /// Co-occurrence or taught association.
    #[default]
    Association,
    /// Input word linked to a word of a well-received response.
    Response,
}

impl SynapseType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynapseType::Association => "association",
            SynapseType::Response => "response",
        }
    }

    /// Lenient parse used when reading rows back; unknown labels become `Association`.
    pub fn from_db(s: &str) -> Self {
        match s {
            "response" => SynapseType::Response,
            _ => SynapseType::Association,
        }
    }
}

impl fmt::Display for SynapseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A labeled vertex of the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Lowercase, trimmed, unique.
    pub label: String,
    pub node_type: NodeType,
    /// Transient activation energy in [0,1].
    pub energy: f64,
    /// Energy restored at the start of every activation.
    pub resting: f64,
    /// Times this node was fired directly as a seed.
    pub fire_count: u64,
}

/// A directed, weighted edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synapse {
    pub id: SynapseId,
    pub src_id: NodeId,
    pub dst_id: NodeId,
    /// Always within [0,1].
    pub weight: f64,
    pub syn_type: SynapseType,
    pub fire_count: u64,
    /// SQLite `datetime('now')` text of the last reinforcement, if any.
    pub last_fired: Option<String>,
}

/// One outgoing edge as seen from its source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outgoing {
    pub dst_id: NodeId,
    pub weight: f64,
    pub dst_label: String,
}

/// Result of one spreading-activation cascade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivationResult {
    /// Nodes above threshold, strongest first.
    pub fired_nodes: Vec<Node>,
    pub total_fired: usize,
    pub peak_node: Option<Node>,
    pub peak_energy: f64,
}

impl ActivationResult {
    /// Build a result from nodes already sorted by energy descending.
    pub fn from_fired(fired_nodes: Vec<Node>) -> Self {
        let peak_node = fired_nodes.first().cloned();
        let peak_energy = peak_node.as_ref().map(|n| n.energy).unwrap_or(0.0);
        Self {
            total_fired: fired_nodes.len(),
            fired_nodes,
            peak_node,
            peak_energy,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fired_nodes.is_empty()
    }

    /// Labels of the fired nodes in firing order.
    pub fn labels(&self) -> Vec<&str> {
        self.fired_nodes.iter().map(|n| n.label.as_str()).collect()
    }
}

/// An activation-log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivationRecord {
    pub trigger: String,
    pub nodes_fired: usize,
    pub peak_node: Option<String>,
    pub peak_energy: f64,
    pub timestamp: String,
}

/// Aggregate graph statistics handed to response composers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphStats {
    pub total_nodes: u64,
    pub total_synapses: u64,
    pub avg_synapse_weight: f64,
    pub most_fired_node: Option<String>,
    pub most_fired_count: u64,
    /// synapses / (nodes * (nodes - 1)); zero for graphs of fewer than two nodes.
    pub density: f64,
}

impl GraphStats {
    pub fn density(nodes: u64, synapses: u64) -> f64 {
        if nodes < 2 {
            return 0.0;
        }
        synapses as f64 / (nodes as f64 * (nodes as f64 - 1.0))
    }
}

/// Counts returned by a decay-and-prune pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneReport {
    pub synapses_decayed: usize,
    pub synapses_pruned: usize,
    pub orphan_nodes_pruned: usize,
}

/// Lowercase and trim a label, rejecting empty results.
pub fn normalize_label(label: &str) -> Result<String, ValidationError> {
    let clean = label.trim().to_lowercase();
    if clean.is_empty() {
        return Err(ValidationError::EmptyLabel);
    }
    Ok(clean)
}

/// Clamp into [0,1], mapping NaN to zero.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
