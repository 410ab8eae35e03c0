//! Neurograph Runtime Prelude: convenient imports for common usage.
//!
//! ```rust
//! use neurograph_runtime::prelude::*;
//! ```

// Re-export storage and engines
pub use crate::activation::ActivationEngine;
pub use crate::plasticity::PlasticityEngine;
pub use crate::state::{CHEMISTRY_KEY, INNER_LOG_KEY};
pub use crate::store::{GraphStore, DEFAULT_BUSY_TIMEOUT};

// Re-export errors and configuration
pub use crate::config::{ChemistryConfig, MusingConfig, NeurographConfig, StoreConfig, VoiceConfig};
pub use crate::error::{NeuroError, Result};

// Re-export response composition
pub use crate::weaver::{ResponseKind, TemplateWeaver, Weaver};

// Re-export workers
pub use crate::coordinator::{
    read_chemistry, shared_chemistry, Coordinator, InteractionClock, SharedChemistry, StopSignal,
    WorkerContext, WorkerState, WorkerStatus,
};
pub use crate::mind::{fallback_reply, Affect, Interaction, Mind, Perception};
pub use crate::musing::{InnerLog, InnerThought, Musing, SharedInnerLog};
pub use crate::voice::{
    Delivery, DeliveryQueue, Utterance, VoiceEngine, VoiceSink, VoiceWorker, WriterSink,
    PRIORITY_EMOTION, PRIORITY_INNER, PRIORITY_LEVEL_UP, PRIORITY_REACTIVE,
};

// Re-export from core
pub use neurograph_core::prelude::*;
