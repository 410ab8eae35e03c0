//! Convenience re-exports for common neurograph types.

pub use crate::error::ValidationError;
pub use crate::lexicon::{extract_labels, LabelExtractor, StopWordExtractor};
pub use crate::neurochemistry::{ChemicalEvent, Neurochemistry, Tone, BASELINE, HOMEOSTASIS_SPEED};
pub use crate::params::*;
pub use crate::types::*;
