//! # Neurograph Core
//!
//! Core types, parameters and neuromodulation for the neurograph substrate.
//!
//! This crate is storage-agnostic. It defines:
//!
//! - **Nodes and synapses** - labeled concepts joined by directed, weighted edges
//! - **Activation results** - the nodes that fired in one spreading-activation cascade
//! - **Graph parameters** - depth, threshold, decay and plasticity knobs
//! - **Neurochemistry** - a bounded five-scalar state that derives those knobs and a tone
//! - **Label extraction** - turning raw text into normalized content words
//!
//! ## Quick Start
//!
//! ```rust
//! use neurograph_core::prelude::*;
//!
//! let mut chem = Neurochemistry::default();
//! chem.modulate(ChemicalEvent::FeedbackPositive);
//! let params = chem.graph_params();
//! assert!(params.activation_threshold < GraphParams::default().activation_threshold);
//! ```

pub mod types;
pub mod error;
pub mod params;
pub mod neurochemistry;
pub mod lexicon;
pub mod prelude;
