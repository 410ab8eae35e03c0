//! Priority-ordered, cooldown-gated output.
//!
//! Speakers enqueue `(priority, text)`; a single worker drains the queue
//! lowest priority value first (FIFO within a priority). After a delivery
//! the worker enters a cooldown window during which only priority-1 items
//! pass; anything softer is put back and retried after a short backoff.

use crate::coordinator::{StopSignal, WorkerState, WorkerStatus};
use crate::error::Result;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::io::Write;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

pub const PRIORITY_LEVEL_UP: u8 = 1;
pub const PRIORITY_EMOTION: u8 = 2;
pub const PRIORITY_REACTIVE: u8 = 3;
pub const PRIORITY_INNER: u8 = 4;

const MIN_PRIORITY: u8 = 1;
const MAX_PRIORITY: u8 = 5;

/// A queued piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub priority: u8,
    /// Enqueue order; preserved across requeues.
    pub seq: u64,
    pub text: String,
}

impl Ord for Utterance {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: the smallest (priority, seq) must compare greatest.
        (other.priority, other.seq).cmp(&(self.priority, self.seq))
    }
}

impl PartialOrd for Utterance {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Default)]
struct QueueInner {
    heap: BinaryHeap<Utterance>,
    next_seq: u64,
}

/// Blocking priority queue shared by speakers and the delivery worker.
#[derive(Default)]
pub struct DeliveryQueue {
    inner: Mutex<QueueInner>,
    ready: Condvar,
}

impl DeliveryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, QueueInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue text at `priority`, clamped to 1..=5.
    pub fn push(&self, priority: u8, text: impl Into<String>) {
        let mut inner = self.lock();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.heap.push(Utterance {
            priority: priority.clamp(MIN_PRIORITY, MAX_PRIORITY),
            seq,
            text: text.into(),
        });
        drop(inner);
        self.ready.notify_one();
    }

    /// Put a dequeued item back at its original position.
    pub fn requeue(&self, utterance: Utterance) {
        self.lock().heap.push(utterance);
        self.ready.notify_one();
    }

    /// Dequeue the most urgent item, waiting up to `timeout` for one to arrive.
    pub fn pop_timeout(&self, timeout: Duration) -> Option<Utterance> {
        let deadline = Instant::now() + timeout;
        let mut inner = self.lock();
        loop {
            if let Some(item) = inner.heap.pop() {
                return Some(item);
            }
            let now = Instant::now();
            if now >= deadline {
                return None;
            }
            let (guard, _) = self
                .ready
                .wait_timeout(inner, deadline - now)
                .unwrap_or_else(PoisonError::into_inner);
            inner = guard;
        }
    }

    pub fn len(&self) -> usize {
        self.lock().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Where delivered text ends up.
pub trait VoiceSink: Send {
    fn deliver(&mut self, text: &str) -> Result<()>;
}

/// Writes each utterance as one line to any writer.
pub struct WriterSink<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> VoiceSink for WriterSink<W> {
    fn deliver(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer, "{text}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Cheap handle used by anything that wants to speak.
#[derive(Clone)]
pub struct VoiceEngine {
    queue: Arc<DeliveryQueue>,
    enabled: bool,
}

impl VoiceEngine {
    pub fn new(queue: Arc<DeliveryQueue>, enabled: bool) -> Self {
        Self { queue, enabled }
    }

    /// Enqueue trimmed text. Returns false when disabled or the text is blank.
    pub fn speak(&self, text: &str, priority: u8) -> bool {
        let text = text.trim();
        if !self.enabled || text.is_empty() {
            return false;
        }
        self.queue.push(priority, text);
        true
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn queue(&self) -> &Arc<DeliveryQueue> {
        &self.queue
    }
}

/// Outcome of one worker iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// Nothing arrived before the wait timed out.
    Empty,
    Delivered(Utterance),
    /// Inside the cooldown window; the item was requeued.
    Deferred(Utterance),
    /// The sink failed; the item is dropped and the cooldown is not started.
    Failed(Utterance),
}

/// Drains the queue into a sink.
pub struct VoiceWorker {
    queue: Arc<DeliveryQueue>,
    sink: Box<dyn VoiceSink>,
    cooldown: Duration,
    wait: Duration,
    backoff: Duration,
    last_spoke: Option<Instant>,
}

impl VoiceWorker {
    pub fn new(queue: Arc<DeliveryQueue>, sink: Box<dyn VoiceSink>, cooldown: Duration) -> Self {
        Self {
            queue,
            sink,
            cooldown,
            wait: Duration::from_millis(500),
            backoff: Duration::from_millis(250),
            last_spoke: None,
        }
    }

    pub fn with_timing(mut self, wait: Duration, backoff: Duration) -> Self {
        self.wait = wait;
        self.backoff = backoff;
        self
    }

    fn in_cooldown(&self, now: Instant) -> bool {
        self.last_spoke
            .is_some_and(|t| now.saturating_duration_since(t) < self.cooldown)
    }

    /// Wait for one item and deliver, defer or drop it.
    pub fn process_one(&mut self) -> Delivery {
        match self.queue.pop_timeout(self.wait) {
            Some(item) => self.handle(item),
            None => Delivery::Empty,
        }
    }

    fn handle(&mut self, item: Utterance) -> Delivery {
        if item.priority > PRIORITY_LEVEL_UP && self.in_cooldown(Instant::now()) {
            self.queue.requeue(item.clone());
            return Delivery::Deferred(item);
        }

        match self.sink.deliver(&item.text) {
            Ok(()) => {
                self.last_spoke = Some(Instant::now());
                debug!(priority = item.priority, "voice delivered");
                Delivery::Delivered(item)
            }
            Err(e) => {
                warn!(error = %e, priority = item.priority, "voice delivery failed");
                Delivery::Failed(item)
            }
        }
    }

    /// Loop until `stop` is raised.
    ///
    /// `Suspended` while the queue is empty or an item waits out the
    /// cooldown, `Running` while an item is handled, `Idle` after it.
    pub fn run(mut self, stop: &StopSignal, status: &WorkerStatus) {
        info!("voice worker started");
        while !stop.is_stopped() {
            let Some(item) = self.queue.pop_timeout(self.wait) else {
                status.set(WorkerState::Suspended);
                continue;
            };
            status.set(WorkerState::Running);
            match self.handle(item) {
                Delivery::Deferred(_) => {
                    status.set(WorkerState::Suspended);
                    stop.sleep(self.backoff);
                }
                _ => status.set(WorkerState::Idle),
            }
        }
        status.set(WorkerState::Stopped);
        info!(pending = self.queue.len(), "voice worker stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NeuroError;
    use std::sync::Mutex as StdMutex;

    /// Records delivered text for inspection.
    #[derive(Clone, Default)]
    struct Recorder(Arc<StdMutex<Vec<String>>>);

    impl VoiceSink for Recorder {
        fn deliver(&mut self, text: &str) -> Result<()> {
            self.0.lock().unwrap().push(text.to_string());
            Ok(())
        }
    }

    struct Broken;

    impl VoiceSink for Broken {
        fn deliver(&mut self, _text: &str) -> Result<()> {
            Err(NeuroError::Io(std::io::Error::other("speaker unplugged")))
        }
    }

    fn worker(queue: &Arc<DeliveryQueue>, sink: Box<dyn VoiceSink>, cooldown: Duration) -> VoiceWorker {
        VoiceWorker::new(queue.clone(), sink, cooldown)
            .with_timing(Duration::from_millis(10), Duration::from_millis(1))
    }

    #[test]
    fn lowest_priority_value_first() {
        let queue = DeliveryQueue::new();
        queue.push(PRIORITY_REACTIVE, "later");
        queue.push(PRIORITY_LEVEL_UP, "now");
        assert_eq!(queue.pop_timeout(Duration::ZERO).unwrap().text, "now");
        assert_eq!(queue.pop_timeout(Duration::ZERO).unwrap().text, "later");
        assert!(queue.pop_timeout(Duration::from_millis(5)).is_none());
    }

    #[test]
    fn fifo_within_priority_and_clamping() {
        let queue = DeliveryQueue::new();
        queue.push(9, "first");
        queue.push(5, "second");
        queue.push(0, "urgent");
        let a = queue.pop_timeout(Duration::ZERO).unwrap();
        assert_eq!((a.priority, a.text.as_str()), (1, "urgent"));
        assert_eq!(queue.pop_timeout(Duration::ZERO).unwrap().text, "first");
        assert_eq!(queue.pop_timeout(Duration::ZERO).unwrap().text, "second");
    }

    #[test]
    fn blank_or_disabled_speech_is_ignored() {
        let queue = Arc::new(DeliveryQueue::new());
        let voice = VoiceEngine::new(queue.clone(), true);
        assert!(!voice.speak("   ", PRIORITY_INNER));
        assert!(voice.speak("  hi  ", PRIORITY_INNER));
        assert_eq!(queue.pop_timeout(Duration::ZERO).unwrap().text, "hi");

        let muted = VoiceEngine::new(queue.clone(), false);
        assert!(!muted.speak("hello", PRIORITY_LEVEL_UP));
        assert!(queue.is_empty());
    }

    #[test]
    fn cooldown_defers_soft_items_but_not_priority_one() {
        let queue = Arc::new(DeliveryQueue::new());
        let recorder = Recorder::default();
        let mut worker = worker(&queue, Box::new(recorder.clone()), Duration::from_secs(60));

        queue.push(PRIORITY_INNER, "first thought");
        assert!(matches!(worker.process_one(), Delivery::Delivered(_)));

        queue.push(PRIORITY_INNER, "second thought");
        assert!(matches!(worker.process_one(), Delivery::Deferred(_)));
        assert_eq!(queue.len(), 1);

        queue.push(PRIORITY_LEVEL_UP, "level up!");
        match worker.process_one() {
            Delivery::Delivered(u) => assert_eq!(u.text, "level up!"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(*recorder.0.lock().unwrap(), vec!["first thought", "level up!"]);
    }

    fn wait_for(status: &WorkerStatus, want: WorkerState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while status.get() != want {
            assert!(Instant::now() < deadline, "stuck in {}", status.get());
            std::thread::sleep(Duration::from_millis(2));
        }
    }

    #[test]
    fn worker_reports_waiting_delivering_and_stopped() {
        let queue = Arc::new(DeliveryQueue::new());
        let recorder = Recorder::default();
        let stop = Arc::new(StopSignal::new());
        let status = Arc::new(WorkerStatus::new("voice"));

        let w = worker(&queue, Box::new(recorder.clone()), Duration::from_secs(60));
        let (s, st) = (stop.clone(), status.clone());
        let handle = std::thread::spawn(move || w.run(&s, &st));

        wait_for(&status, WorkerState::Suspended);
        queue.push(PRIORITY_INNER, "hello");
        let deadline = Instant::now() + Duration::from_secs(5);
        while recorder.0.lock().unwrap().is_empty() {
            assert!(Instant::now() < deadline);
            std::thread::sleep(Duration::from_millis(2));
        }

        // a soft item inside the cooldown is held back
        queue.push(PRIORITY_INNER, "later");
        wait_for(&status, WorkerState::Suspended);
        assert_eq!(*recorder.0.lock().unwrap(), vec!["hello"]);

        stop.stop();
        handle.join().unwrap();
        assert_eq!(status.get(), WorkerState::Stopped);
    }

    #[test]
    fn failed_delivery_does_not_start_cooldown() {
        let queue = Arc::new(DeliveryQueue::new());
        let mut broken = worker(&queue, Box::new(Broken), Duration::from_secs(60));
        queue.push(PRIORITY_INNER, "lost");
        assert!(matches!(broken.process_one(), Delivery::Failed(_)));
        assert!(broken.last_spoke.is_none());
        assert_eq!(broken.process_one(), Delivery::Empty);
    }

    #[test]
    fn writer_sink_emits_lines() {
        let mut sink = WriterSink::new(Vec::new());
        sink.deliver("one").unwrap();
        sink.deliver("two").unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "one\ntwo\n");
    }
}
