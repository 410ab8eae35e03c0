//! CLI command implementations.

pub mod activate;
pub mod chat;
pub mod init;
pub mod prune;
pub mod stats;
pub mod teach;

use anyhow::{Context, Result};
use neurograph::prelude::*;

/// Open the configured database.
pub fn open_store(config: &NeurographConfig) -> Result<GraphStore> {
    GraphStore::open_with_timeout(&config.store.path, config.store.busy_timeout())
        .with_context(|| format!("Failed to open database: {}", config.store.path.display()))
}
