//! Foreground/background coordination.
//!
//! The foreground thread owns one store connection and handles input. The
//! coordinator spawns two background threads: the musing loop, which opens
//! its own connection to the same database file, and the voice worker. They
//! share only the stop signal, the interaction clock, the chemistry cell,
//! the inner log and the delivery queue.

use crate::config::NeurographConfig;
use crate::error::{NeuroError, Result};
use crate::musing::{InnerLog, Musing, SharedInnerLog};
use crate::store::GraphStore;
use crate::voice::{DeliveryQueue, VoiceEngine, VoiceSink, VoiceWorker};
use crate::weaver::TemplateWeaver;
use neurograph_core::neurochemistry::Neurochemistry;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};
use std::sync::{Arc, Condvar, Mutex, PoisonError, RwLock};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Chemistry shared between the foreground and the musing loop.
pub type SharedChemistry = Arc<RwLock<Neurochemistry>>;

pub fn shared_chemistry(chem: Neurochemistry) -> SharedChemistry {
    Arc::new(RwLock::new(chem))
}

/// Snapshot the shared chemistry, tolerating a poisoned lock.
pub fn read_chemistry(chem: &SharedChemistry) -> Neurochemistry {
    *chem.read().unwrap_or_else(PoisonError::into_inner)
}

/// Cooperative stop flag with an interruptible sleep.
#[derive(Default)]
pub struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        *self.stopped.lock().unwrap_or_else(PoisonError::into_inner) = true;
        self.wake.notify_all();
    }

    pub fn is_stopped(&self) -> bool {
        *self.stopped.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep up to `duration`, returning early (true) once stopped.
    pub fn sleep(&self, duration: Duration) -> bool {
        let guard = self.stopped.lock().unwrap_or_else(PoisonError::into_inner);
        let (guard, _) = self
            .wake
            .wait_timeout_while(guard, duration, |stopped| !*stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *guard
    }
}

/// Time of the last foreground interaction, readable from any thread.
pub struct InteractionClock {
    origin: Instant,
    last_millis: AtomicU64,
}

impl Default for InteractionClock {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionClock {
    /// A clock whose last interaction is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            last_millis: AtomicU64::new(0),
        }
    }

    /// A clock that reports `idle` of silence already elapsed.
    pub fn idle_for(idle: Duration) -> Self {
        let origin = Instant::now()
            .checked_sub(idle)
            .unwrap_or_else(Instant::now);
        Self {
            origin,
            last_millis: AtomicU64::new(0),
        }
    }

    /// Record a foreground interaction.
    pub fn touch(&self) {
        let millis = self.origin.elapsed().as_millis() as u64;
        self.last_millis.fetch_max(millis, Ordering::Relaxed);
    }

    /// Time since the last interaction.
    pub fn idle(&self) -> Duration {
        let last = Duration::from_millis(self.last_millis.load(Ordering::Relaxed));
        self.origin.elapsed().saturating_sub(last)
    }
}

/// Lifecycle of a background worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Running,
    /// Waiting for the foreground to go quiet.
    Suspended,
    Stopped,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WorkerState::Idle => "idle",
            WorkerState::Running => "running",
            WorkerState::Suspended => "suspended",
            WorkerState::Stopped => "stopped",
        };
        f.write_str(s)
    }
}

/// Atomically readable worker state.
pub struct WorkerStatus {
    name: &'static str,
    state: AtomicU8,
}

impl WorkerStatus {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            state: AtomicU8::new(0),
        }
    }

    pub fn get(&self) -> WorkerState {
        match self.state.load(Ordering::Acquire) {
            0 => WorkerState::Idle,
            1 => WorkerState::Running,
            2 => WorkerState::Suspended,
            _ => WorkerState::Stopped,
        }
    }

    /// Move to `next`; `Stopped` is terminal.
    pub fn set(&self, next: WorkerState) {
        let code = match next {
            WorkerState::Idle => 0,
            WorkerState::Running => 1,
            WorkerState::Suspended => 2,
            WorkerState::Stopped => 3,
        };
        let prev = self
            .state
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| {
                (cur != 3).then_some(code)
            });
        if let Ok(prev) = prev {
            if prev != code {
                debug!(worker = self.name, state = %next, "worker state");
            }
        }
    }
}

/// Handles shared by the background workers.
#[derive(Clone)]
pub struct WorkerContext {
    pub stop: Arc<StopSignal>,
    pub clock: Arc<InteractionClock>,
    pub chemistry: SharedChemistry,
    pub voice: VoiceEngine,
    pub inner_log: SharedInnerLog,
}

/// Owns the background threads for one session.
pub struct Coordinator {
    context: WorkerContext,
    musing_status: Arc<WorkerStatus>,
    voice_status: Arc<WorkerStatus>,
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl Coordinator {
    /// Spawn the voice worker and, when enabled and the store is file-backed,
    /// the musing loop on its own connection.
    pub fn start(
        store: &GraphStore,
        config: &NeurographConfig,
        chemistry: SharedChemistry,
        clock: Arc<InteractionClock>,
        sink: Box<dyn VoiceSink>,
    ) -> Result<Self> {
        let queue = Arc::new(DeliveryQueue::new());
        let context = WorkerContext {
            stop: Arc::new(StopSignal::new()),
            clock,
            chemistry,
            voice: VoiceEngine::new(queue.clone(), config.voice.enabled),
            inner_log: InnerLog::shared(
                config.musing.inner_log_capacity,
                config.musing.inner_log_retain,
            ),
        };
        let mut coordinator = Self {
            context,
            musing_status: Arc::new(WorkerStatus::new("musing")),
            voice_status: Arc::new(WorkerStatus::new("voice")),
            handles: Vec::new(),
        };

        let worker = VoiceWorker::new(queue, sink, config.voice.cooldown())
            .with_timing(config.voice.queue_wait(), config.voice.requeue_backoff());
        let stop = coordinator.context.stop.clone();
        let status = coordinator.voice_status.clone();
        coordinator.spawn("voice", move || worker.run(&stop, &status))?;

        if config.musing.enabled {
            match store.reopen(config.store.busy_timeout()) {
                Some(own) => {
                    let musing = Musing::new(
                        own?,
                        Box::new(TemplateWeaver::new(StdRng::from_entropy())),
                        StdRng::from_entropy(),
                        config.musing.clone(),
                    );
                    let ctx = coordinator.context.clone();
                    let status = coordinator.musing_status.clone();
                    coordinator.spawn("musing", move || musing.run(&ctx, &status))?;
                }
                None => warn!("in-memory store cannot be shared, musing disabled"),
            }
        }

        info!(workers = coordinator.handles.len(), "coordinator started");
        Ok(coordinator)
    }

    fn spawn<F>(&mut self, name: &'static str, f: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let handle = std::thread::Builder::new()
            .name(format!("neurograph-{name}"))
            .spawn(f)?;
        self.handles.push((name, handle));
        Ok(())
    }

    pub fn context(&self) -> &WorkerContext {
        &self.context
    }

    pub fn voice(&self) -> &VoiceEngine {
        &self.context.voice
    }

    pub fn inner_log(&self) -> &SharedInnerLog {
        &self.context.inner_log
    }

    pub fn musing_state(&self) -> WorkerState {
        self.musing_status.get()
    }

    pub fn voice_state(&self) -> WorkerState {
        self.voice_status.get()
    }

    /// Raise the stop flag and join every worker.
    pub fn shutdown(mut self) -> Result<()> {
        self.context.stop.stop();
        let mut failed = Vec::new();
        for (name, handle) in self.handles.drain(..) {
            if handle.join().is_err() {
                failed.push(name);
            }
        }
        if failed.is_empty() {
            info!("coordinator stopped");
            Ok(())
        } else {
            Err(NeuroError::Worker(format!(
                "worker(s) panicked: {}",
                failed.join(", ")
            )))
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.context.stop.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_interrupts_sleep() {
        let stop = Arc::new(StopSignal::new());
        let waker = stop.clone();
        let t = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            waker.stop();
        });
        let started = Instant::now();
        assert!(stop.sleep(Duration::from_secs(30)));
        assert!(started.elapsed() < Duration::from_secs(10));
        t.join().unwrap();
    }

    #[test]
    fn sleep_times_out_when_not_stopped() {
        let stop = StopSignal::new();
        assert!(!stop.sleep(Duration::from_millis(5)));
    }

    #[test]
    fn clock_reports_idle_time() {
        let clock = InteractionClock::idle_for(Duration::from_secs(120));
        assert!(clock.idle() >= Duration::from_secs(120));
        clock.touch();
        assert!(clock.idle() < Duration::from_secs(5));
    }

    #[test]
    fn stopped_is_terminal() {
        let status = WorkerStatus::new("test");
        assert_eq!(status.get(), WorkerState::Idle);
        status.set(WorkerState::Suspended);
        assert_eq!(status.get(), WorkerState::Suspended);
        status.set(WorkerState::Stopped);
        status.set(WorkerState::Running);
        assert_eq!(status.get(), WorkerState::Stopped);
    }
}
