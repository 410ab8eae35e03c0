//! # Neurograph
//!
//! A persisted concept graph that learns by use.
//!
//! Labels seen together are wired by Hebbian synapses; unused synapses decay
//! and are pruned. Spreading activation surfaces related concepts from a few
//! seeds, and a five-scalar neurochemistry tunes how far and how easily that
//! activation spreads.
//!
//! ## Quick Start
//!
//! ```rust
//! use neurograph::prelude::*;
//!
//! let store = GraphStore::open_in_memory()?;
//! PlasticityEngine::new(&store).reinforce_pairs(&["dog", "animal", "bark"], 1.0)?;
//! assert_eq!(store.synapse_count()?, 6);
//!
//! let chem = Neurochemistry::default();
//! let result = ActivationEngine::new(&store).activate(&["dog"], FIRE_ENERGY, &chem.graph_params())?;
//! assert_eq!(result.peak_node.unwrap().label, "dog");
//! # Ok::<(), NeuroError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`neurograph_core`] - Types, parameters, neurochemistry, label extraction
//! - [`neurograph_runtime`] - SQLite store, engines, weaver, musing and voice workers
//!
//! ## Hebbian Learning
//!
//! "Neurons that fire together wire together."
//!
//! - First co-occurrence: synapse at 0.1 weight in both directions
//! - Subsequent co-occurrences: +0.05 scaled by plasticity, capped at 0.95
//! - Every decay pass removes 0.01; synapses at or below 0.02 are pruned
//!
//! ## Neurochemistry
//!
//! | Scalar | Raises | Lowers |
//! |--------|--------|--------|
//! | Serotonin | depth, decay factor | |
//! | Cortisol | threshold | depth, decay factor, plasticity |
//! | Norepinephrine | | threshold |
//! | Dopamine | plasticity | |

pub use neurograph_core;
pub use neurograph_runtime;

/// Convenient imports for common usage.
pub mod prelude {
    pub use neurograph_runtime::prelude::*;
}
