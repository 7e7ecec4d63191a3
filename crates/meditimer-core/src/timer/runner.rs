//! Async driver that ticks a session in real time.
//!
//! All commands and every tick go through one mutex, so a `stop()` that
//! returns has already been observed by the ticker: the next wakeup sees an
//! inactive session (or a newer run generation) and exits.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::clock::TickClock;
use super::segment::{SegmentId, SegmentUpdate};
use super::sequencer::Sequencer;
use super::session::{Session, SessionSnapshot};
use super::signal::CompletionSignal;
use crate::error::ValidationError;
use crate::events::Event;

const EVENT_CAPACITY: usize = 64;

struct RunnerInner<S> {
    session: Session,
    sequencer: Sequencer<S>,
    clock: TickClock,
    anchor: Instant,
    /// Bumped on every start so a stale ticker can tell it was replaced.
    generation: u64,
}

/// Clonable handle that owns a session and ticks it once per interval.
pub struct SessionRunner<S> {
    inner: Arc<Mutex<RunnerInner<S>>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
    snapshots: watch::Sender<SessionSnapshot>,
    events: broadcast::Sender<Event>,
}

impl<S> Clone for SessionRunner<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            ticker: self.ticker.clone(),
            tick_interval: self.tick_interval,
            snapshots: self.snapshots.clone(),
            events: self.events.clone(),
        }
    }
}

impl<S> SessionRunner<S>
where
    S: CompletionSignal + Send + 'static,
{
    pub fn new(session: Session, signal: S, tick_interval: Duration) -> Self {
        let (snapshots, _) = watch::channel(session.snapshot());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(RunnerInner {
                session,
                sequencer: Sequencer::new(signal),
                clock: TickClock::new(tick_interval),
                anchor: Instant::now(),
                generation: 0,
            })),
            ticker: Arc::new(Mutex::new(None)),
            tick_interval,
            snapshots,
            events,
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.lock().await.session.snapshot()
    }

    /// Latest snapshot, updated after every mutation and every tick.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.subscribe()
    }

    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    /// Wait until no run is in progress.
    pub async fn finished(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|snap| !snap.is_active).await;
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a run and spawn the ticker.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if any segment has zero duration; no
    /// ticker is spawned and the session is unchanged.
    pub async fn start(&self) -> Result<Event, ValidationError> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let event = inner.sequencer.start(&mut inner.session)?;
        inner.generation += 1;
        self.reanchor(inner);
        self.publish(&inner.session, Some(event.clone()));
        // Swap tickers before another start can bump the generation.
        self.spawn_ticker(inner.generation).await;
        Ok(event)
    }

    pub async fn stop(&self) -> Event {
        let event = {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;
            let event = inner.sequencer.stop(&mut inner.session);
            self.publish(&inner.session, Some(event.clone()));
            event
        };
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
        event
    }

    /// Toggle pause on `id`.
    ///
    /// Ticks already owed are applied before pausing, and the clock is
    /// re-anchored on resume, so a ticker that was stalled across the pause
    /// never charges the paused span to the segment.
    pub async fn pause_resume(&self, id: SegmentId) -> Option<Event> {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        let caught_up = self.catch_up(inner);
        let event = inner.sequencer.pause_resume(&mut inner.session, id);
        if matches!(event, Some(Event::SegmentResumed { .. })) {
            self.reanchor(inner);
        }
        if caught_up || event.is_some() {
            self.publish(&inner.session, event.clone());
        }
        event
    }

    /// Toggle pause on whatever segment is under the cursor.
    pub async fn pause_resume_current(&self) -> Option<Event> {
        let id = {
            let guard = self.inner.lock().await;
            guard.session.current()?.id
        };
        self.pause_resume(id).await
    }

    pub async fn add_segment(&self) -> SegmentId {
        let mut guard = self.inner.lock().await;
        let id = guard.session.add_segment();
        self.publish(&guard.session, None);
        id
    }

    pub async fn update_segment(&self, id: SegmentId, update: SegmentUpdate) -> bool {
        let mut guard = self.inner.lock().await;
        let applied = guard.session.update_segment(id, update);
        self.publish(&guard.session, None);
        applied
    }

    pub async fn remove_segment(&self, id: SegmentId) -> bool {
        let mut guard = self.inner.lock().await;
        let removed = guard.session.remove_segment(id);
        self.publish(&guard.session, None);
        removed
    }

    pub async fn reset_segment(&self, id: SegmentId) -> bool {
        let mut guard = self.inner.lock().await;
        let reset = guard.session.reset_segment(id);
        self.publish(&guard.session, None);
        reset
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Send the event (if any) first, then the snapshot reflecting it.
    fn publish(&self, session: &Session, event: Option<Event>) {
        if let Some(event) = event {
            // No subscribers is fine.
            let _ = self.events.send(event);
        }
        self.snapshots.send_replace(session.snapshot());
    }

    fn reanchor(&self, inner: &mut RunnerInner<S>) {
        inner.clock = TickClock::new(self.tick_interval);
        inner.anchor = Instant::now();
    }

    /// Apply every tick owed since the anchor. Returns whether any ran.
    fn catch_up(&self, inner: &mut RunnerInner<S>) -> bool {
        if !inner.session.is_active() {
            return false;
        }
        let due = inner.clock.due(inner.anchor.elapsed());
        if due > 1 {
            debug!(due, "catching up missed ticks");
        }
        for _ in 0..due {
            if let Some(event) = inner.sequencer.tick(&mut inner.session) {
                let _ = self.events.send(event);
            }
            if !inner.session.is_active() {
                break;
            }
        }
        due > 0
    }

    async fn spawn_ticker(&self, generation: u64) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let runner = self.clone();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(runner.tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;

                let mut guard = runner.inner.lock().await;
                let inner = &mut *guard;
                if inner.generation != generation || !inner.session.is_active() {
                    debug!(generation, "ticker exiting");
                    break;
                }

                if runner.catch_up(inner) {
                    runner.publish(&inner.session, None);
                }
                if !inner.session.is_active() {
                    info!("run finished");
                    break;
                }
            }
        });
        *ticker_guard = Some(handle);
    }
}
