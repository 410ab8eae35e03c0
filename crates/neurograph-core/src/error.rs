//! Validation errors raised before anything touches storage.

use thiserror::Error;

/// Errors caused by invalid caller input. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Label was empty after trimming.
    #[error("node label cannot be empty")]
    EmptyLabel,

    /// Source and destination resolved to the same node.
    #[error("cannot connect node '{label}' to itself")]
    SelfLoop { label: String },

    /// Unrecognized neurochemical event name.
    #[error("unknown neurochemical event: {0}")]
    UnknownEvent(String),

    /// Unrecognized node type name.
    #[error("unknown node type: {0}")]
    UnknownNodeType(String),
}
