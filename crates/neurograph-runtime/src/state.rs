//! Key-value persistence for small pieces of runtime state.
//!
//! Values are JSON documents stored in the `state` table next to the graph.

use crate::error::Result;
use crate::store::GraphStore;
use neurograph_core::neurochemistry::Neurochemistry;
use rusqlite::{params, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// State key holding the serialized neurochemistry vector.
pub const CHEMISTRY_KEY: &str = "neurochemistry";
/// State key holding the most recent inner thoughts.
pub const INNER_LOG_KEY: &str = "inner_log_recent";

impl GraphStore {
    /// Upsert a JSON value under `key`.
    pub fn save_state<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.conn().execute(
            "INSERT INTO state (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, json],
        )?;
        Ok(())
    }

    /// Load and decode the value under `key`. Missing keys return `None`.
    pub fn load_state<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let raw: Option<String> = self
            .conn()
            .query_row(
                "SELECT value FROM state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Persisted chemistry, or the baseline when absent or unreadable.
    pub fn load_chemistry(&self) -> Result<Neurochemistry> {
        match self.load_state::<Neurochemistry>(CHEMISTRY_KEY) {
            Ok(Some(chem)) => Ok(Neurochemistry::new(
                chem.dopamine,
                chem.serotonin,
                chem.norepinephrine,
                chem.cortisol,
                chem.oxytocin,
            )),
            Ok(None) => Ok(Neurochemistry::default()),
            Err(crate::error::NeuroError::Serialization(e)) => {
                warn!(error = %e, "stored neurochemistry unreadable, using baseline");
                Ok(Neurochemistry::default())
            }
            Err(e) => Err(e),
        }
    }

    pub fn save_chemistry(&self, chem: &Neurochemistry) -> Result<()> {
        self.save_state(CHEMISTRY_KEY, chem)
    }
}
