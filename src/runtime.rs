use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};

/// Interval between elapsed-time ticks while a round runs.
pub const TICK_RATE_MS: u64 = 100;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    /// Timer tick, tagged with the generation of the timer that produced it
    Tick(u64),
}

/// Source of terminal events (keyboard, mouse, resize, ticks)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    tx: Sender<AppEvent>,
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let reader_tx = tx.clone();

        thread::spawn(move || loop {
            let evt = match event::read() {
                Ok(CtEvent::Key(key)) => AppEvent::Key(key),
                Ok(CtEvent::Mouse(mouse)) => AppEvent::Mouse(mouse),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal event reader stopped");
                    break;
                }
            };

            if reader_tx.send(evt).is_err() {
                break;
            }
        });

        Self { tx, rx }
    }

    /// Handle for producers that post into the same queue (the tick timer).
    pub fn sender(&self) -> Sender<AppEvent> {
        self.tx.clone()
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// A cancelable repeating timer. Each `arm` starts a new generation; ticks
/// from any other generation must be dropped by the consumer.
pub trait TickScheduler {
    fn arm(&mut self);
    fn disarm(&mut self);
    fn is_armed(&self) -> bool;
    /// Whether a tick carrying `generation` belongs to the live timer.
    fn accepts(&self, generation: u64) -> bool;
}

/// Timer backed by a sleeper thread that posts `AppEvent::Tick` into the
/// event queue until its cancel flag is raised.
#[derive(Debug)]
pub struct ThreadTicker {
    tx: Sender<AppEvent>,
    interval: Duration,
    generation: u64,
    cancel: Option<Arc<AtomicBool>>,
}

impl ThreadTicker {
    pub fn new(tx: Sender<AppEvent>, interval: Duration) -> Self {
        Self {
            tx,
            interval,
            generation: 0,
            cancel: None,
        }
    }
}

impl TickScheduler for ThreadTicker {
    fn arm(&mut self) {
        self.disarm();
        self.generation += 1;

        let cancel = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancel);
        let tx = self.tx.clone();
        let generation = self.generation;
        let interval = self.interval;

        thread::spawn(move || loop {
            thread::sleep(interval);
            if flag.load(Ordering::Acquire) {
                break;
            }
            if tx.send(AppEvent::Tick(generation)).is_err() {
                break;
            }
        });

        self.cancel = Some(cancel);
        tracing::trace!(generation, "tick timer armed");
    }

    fn disarm(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.store(true, Ordering::Release);
            tracing::trace!(generation = self.generation, "tick timer disarmed");
        }
    }

    fn is_armed(&self) -> bool {
        self.cancel.is_some()
    }

    fn accepts(&self, generation: u64) -> bool {
        self.is_armed() && generation == self.generation
    }
}

impl Drop for ThreadTicker {
    fn drop(&mut self) {
        self.disarm();
    }
}

/// Timer that never fires on its own; tests pull ticks with `tick()`.
#[derive(Debug, Default, Clone)]
pub struct ManualTicker {
    generation: u64,
    armed: bool,
    pub arm_count: usize,
    pub disarm_count: usize,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The event the live timer would deliver next, if armed.
    pub fn tick(&self) -> Option<AppEvent> {
        self.armed.then_some(AppEvent::Tick(self.generation))
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

impl TickScheduler for ManualTicker {
    fn arm(&mut self) {
        self.generation += 1;
        self.armed = true;
        self.arm_count += 1;
    }

    fn disarm(&mut self) {
        if self.armed {
            self.armed = false;
            self.disarm_count += 1;
        }
    }

    fn is_armed(&self) -> bool {
        self.armed
    }

    fn accepts(&self, generation: u64) -> bool {
        self.armed && generation == self.generation
    }
}

/// Runner that advances the application one event at a time
pub struct Runner<E: EventSource> {
    event_source: E,
    poll_interval: Duration,
}

impl<E: EventSource> Runner<E> {
    pub fn new(event_source: E, poll_interval: Duration) -> Self {
        Self {
            event_source,
            poll_interval,
        }
    }

    /// Blocks up to the poll interval and returns the next event, or None on timeout
    pub fn step(&self) -> Option<AppEvent> {
        match self.event_source.recv_timeout(self.poll_interval) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
