//! Configuration loading for the neurograph CLI.
//!
//! The runtime defines the settings; this module finds and reads
//! `neurograph.toml` and writes the default one.

use anyhow::{Context, Result};
use neurograph::prelude::NeurographConfig;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_FILE: &str = "neurograph.toml";

/// Load settings from the nearest `neurograph.toml`, else the user config
/// directory, else defaults.
///
/// A relative database path is resolved against the directory holding the
/// config file it came from.
pub fn load() -> Result<NeurographConfig> {
    let Some(path) = find_config_file() else {
        debug!("no {CONFIG_FILE} found, using defaults");
        return Ok(NeurographConfig::default());
    };
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    let mut config: NeurographConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.display()))?;
    if config.store.path.is_relative() {
        if let Some(dir) = path.parent() {
            config.store.path = dir.join(&config.store.path);
        }
    }
    debug!(config = %path.display(), db = %config.store.path.display(), "loaded config");
    Ok(config)
}

/// Save settings to the specified path.
pub fn save(config: &NeurographConfig, path: &Path) -> Result<()> {
    let content = to_toml(config)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config: {}", path.display()))?;
    Ok(())
}

fn to_toml(config: &NeurographConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize config")
}

/// Find neurograph.toml in current or parent directories, then in the user config dir.
fn find_config_file() -> Option<PathBuf> {
    if let Ok(mut dir) = std::env::current_dir() {
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.exists() {
                return Some(candidate);
            }
            if !dir.pop() {
                break;
            }
        }
    }
    let user = dirs::config_dir()?.join("neurograph").join(CONFIG_FILE);
    user.exists().then_some(user)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_survives_toml() {
        let text = to_toml(&NeurographConfig::default()).unwrap();
        let back: NeurographConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.voice.cooldown_secs, 120);
        assert_eq!(back.store.path, PathBuf::from(".neurograph/brain.db"));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: NeurographConfig = toml::from_str("[musing]\nenabled = false\n").unwrap();
        assert!(!config.musing.enabled);
        assert_eq!(config.musing.long_idle_secs, 300);
        assert!(config.voice.enabled);
    }
}
