//! Runtime configuration.
//!
//! Every field has a default so a partial `neurograph.toml` is valid.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NeurographConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub musing: MusingConfig,
    #[serde(default)]
    pub voice: VoiceConfig,
    #[serde(default)]
    pub chemistry: ChemistryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusingConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Foreground silence required before musing starts.
    #[serde(default = "default_idle_threshold")]
    pub idle_threshold_secs: u64,
    /// Re-check interval while the foreground is still active.
    #[serde(default = "default_poll")]
    pub poll_secs: u64,
    /// Idle time past which musing speeds up.
    #[serde(default = "default_long_idle")]
    pub long_idle_secs: u64,
    #[serde(default = "default_short_sleep")]
    pub short_sleep_secs: u64,
    #[serde(default = "default_long_sleep")]
    pub long_sleep_secs: u64,
    #[serde(default = "default_log_capacity")]
    pub inner_log_capacity: usize,
    #[serde(default = "default_log_retain")]
    pub inner_log_retain: usize,
    #[serde(default = "default_speak_energy")]
    pub speak_energy: f64,
    #[serde(default = "default_speak_surprise")]
    pub speak_surprise: f64,
    /// Probability of seeding from the least-fired concept.
    #[serde(default = "default_least_fired_bias")]
    pub least_fired_bias: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_cooldown")]
    pub cooldown_secs: u64,
    #[serde(default = "default_queue_wait")]
    pub queue_wait_ms: u64,
    #[serde(default = "default_requeue_backoff")]
    pub requeue_backoff_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChemistryConfig {
    #[serde(default = "default_homeostasis_speed")]
    pub homeostasis_speed: f64,
}

// Default value functions
fn default_db_path() -> PathBuf { PathBuf::from(".neurograph/brain.db") }
fn default_busy_timeout_ms() -> u64 { 5000 }
fn default_true() -> bool { true }
fn default_idle_threshold() -> u64 { 25 }
fn default_poll() -> u64 { 5 }
fn default_long_idle() -> u64 { 300 }
fn default_short_sleep() -> u64 { 15 }
fn default_long_sleep() -> u64 { 30 }
fn default_log_capacity() -> usize { 200 }
fn default_log_retain() -> usize { 120 }
fn default_speak_energy() -> f64 { 0.55 }
fn default_speak_surprise() -> f64 { 0.6 }
fn default_least_fired_bias() -> f64 { 0.6 }
fn default_cooldown() -> u64 { 120 }
fn default_queue_wait() -> u64 { 500 }
fn default_requeue_backoff() -> u64 { 250 }
fn default_homeostasis_speed() -> f64 { neurograph_core::neurochemistry::HOMEOSTASIS_SPEED }

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

impl Default for MusingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            idle_threshold_secs: default_idle_threshold(),
            poll_secs: default_poll(),
            long_idle_secs: default_long_idle(),
            short_sleep_secs: default_short_sleep(),
            long_sleep_secs: default_long_sleep(),
            inner_log_capacity: default_log_capacity(),
            inner_log_retain: default_log_retain(),
            speak_energy: default_speak_energy(),
            speak_surprise: default_speak_surprise(),
            least_fired_bias: default_least_fired_bias(),
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cooldown_secs: default_cooldown(),
            queue_wait_ms: default_queue_wait(),
            requeue_backoff_ms: default_requeue_backoff(),
        }
    }
}

impl Default for ChemistryConfig {
    fn default() -> Self {
        Self {
            homeostasis_speed: default_homeostasis_speed(),
        }
    }
}

impl StoreConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl MusingConfig {
    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs(self.idle_threshold_secs)
    }

    pub fn poll(&self) -> Duration {
        Duration::from_secs(self.poll_secs)
    }

    /// `least_fired_bias` as a probability; non-finite values fall back to the default.
    pub fn seed_bias(&self) -> f64 {
        if self.least_fired_bias.is_finite() {
            self.least_fired_bias.clamp(0.0, 1.0)
        } else {
            default_least_fired_bias()
        }
    }

    /// Sleep after a step: shorter once the foreground has been quiet a long time.
    pub fn cadence(&self, idle: Duration) -> Duration {
        if idle > Duration::from_secs(self.long_idle_secs) {
            Duration::from_secs(self.short_sleep_secs)
        } else {
            Duration::from_secs(self.long_sleep_secs)
        }
    }
}

impl VoiceConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_secs(self.cooldown_secs)
    }

    pub fn queue_wait(&self) -> Duration {
        Duration::from_millis(self.queue_wait_ms)
    }

    pub fn requeue_backoff(&self) -> Duration {
        Duration::from_millis(self.requeue_backoff_ms)
    }
}
