//! Segment sequencer.
//!
//! The sequencer is a tick-driven state machine. It does not own a clock -
//! the caller (or [`SessionRunner`](super::SessionRunner)) invokes `tick()`
//! once per second.
//!
//! ## Segment transitions
//!
//! ```text
//! Pending -> Running -> (Paused <-> Running) -> Completed
//! ```
//!
//! ## Usage
//!
//! ```
//! use meditimer_core::timer::{Sequencer, Session};
//!
//! let mut session = Session::new();
//! let mut sequencer = Sequencer::new(|_: &meditimer_core::timer::Segment| {});
//! sequencer.start(&mut session).unwrap();
//! // Once per second:
//! sequencer.tick(&mut session); // Some(Event::SegmentCompleted) on a boundary
//! ```

use chrono::Utc;
use tracing::{debug, info, warn};

use super::duration::SegmentDuration;
use super::segment::{SegmentId, SegmentStatus};
use super::session::Session;
use super::signal::CompletionSignal;
use crate::error::ValidationError;
use crate::events::Event;

/// Drives the countdown of a [`Session`] and fires the completion signal.
#[derive(Debug, Clone)]
pub struct Sequencer<S> {
    signal: S,
}

impl<S: CompletionSignal> Sequencer<S> {
    pub fn new(signal: S) -> Self {
        Self { signal }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a run at the first segment.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroDuration`] if any segment has no
    /// duration. The session is left untouched in that case.
    pub fn start(&mut self, session: &mut Session) -> Result<Event, ValidationError> {
        if let Some(position) = session.store.first_zero_duration() {
            warn!(position, "cannot start: segment has zero duration");
            return Err(ValidationError::ZeroDuration { position });
        }

        session.store.reset_all();
        if let Some(first) = session.store.at_mut(0) {
            first.status = SegmentStatus::Running;
        }
        session.current_index = Some(0);

        let segment_count = session.store.len();
        let total_secs = session.store.total_configured_secs();
        info!(segment_count, total_secs, "session started");
        Ok(Event::SessionStarted {
            segment_count,
            total_secs,
            at: Utc::now(),
        })
    }

    /// Halt the run and put every segment back to `pending`. Idempotent.
    pub fn stop(&mut self, session: &mut Session) -> Event {
        if session.is_active() {
            info!(index = ?session.current_index, "session stopped");
        }
        session.current_index = None;
        session.store.reset_all();
        Event::SessionStopped { at: Utc::now() }
    }

    /// Toggle `running <-> paused` on the segment under the cursor.
    ///
    /// Any other id, and any pending or completed segment, is a no-op.
    pub fn pause_resume(&mut self, session: &mut Session, id: SegmentId) -> Option<Event> {
        let index = session.current_index?;
        if session.store.position(id) != Some(index) {
            debug!(%id, "pause/resume ignored: not the current segment");
            return None;
        }
        let segment = session.store.find_mut(id)?;
        let remaining_secs = segment.remaining.total_secs();
        match segment.status {
            SegmentStatus::Running => {
                segment.status = SegmentStatus::Paused;
                info!(index, remaining_secs, "segment paused");
                Some(Event::SegmentPaused {
                    index,
                    segment_id: id,
                    remaining_secs,
                    at: Utc::now(),
                })
            }
            SegmentStatus::Paused => {
                segment.status = SegmentStatus::Running;
                info!(index, remaining_secs, "segment resumed");
                Some(Event::SegmentResumed {
                    index,
                    segment_id: id,
                    remaining_secs,
                    at: Utc::now(),
                })
            }
            SegmentStatus::Pending | SegmentStatus::Completed => None,
        }
    }

    /// Advance the current segment by one second.
    ///
    /// Returns `Some(Event::SegmentCompleted)` when the segment reaches zero.
    pub fn tick(&mut self, session: &mut Session) -> Option<Event> {
        let index = session.current_index?;
        let segment = session.store.at_mut(index)?;
        if segment.status != SegmentStatus::Running {
            return None;
        }

        match segment.remaining.decrement() {
            Some(next) if !next.is_zero() => {
                segment.remaining = next;
                debug!(index, remaining = %next, "tick");
                return None;
            }
            _ => {}
        }

        segment.remaining = SegmentDuration::ZERO;
        segment.status = SegmentStatus::Completed;
        let segment_id = segment.id;
        let label = segment.label.clone();
        self.signal.segment_completed(segment);

        let next_index = index + 1;
        let next_index = match session.store.at_mut(next_index) {
            Some(next) => {
                next.status = SegmentStatus::Running;
                next.remaining = next.configured;
                session.current_index = Some(next_index);
                Some(next_index)
            }
            None => {
                session.current_index = None;
                None
            }
        };

        match next_index {
            Some(next) => info!(index, next, "segment completed"),
            None => info!(index, "segment completed, session finished"),
        }
        Some(Event::SegmentCompleted {
            index,
            segment_id,
            label,
            next_index,
            at: Utc::now(),
        })
    }
}
