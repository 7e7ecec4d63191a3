//! Ordered segment storage.
//!
//! The store only knows about the segment list. Whether a run is in
//! progress is the session's concern, so guards that depend on the cursor
//! live in [`Session`](super::Session).

use serde::Serialize;
use tracing::debug;

use super::duration::SegmentDuration;
use super::segment::{Segment, SegmentId, SegmentStatus, SegmentUpdate};

/// Never empty. Built through [`SegmentStore::new`] or
/// [`SegmentStore::from_segments`] only:
///
/// ```compile_fail
/// let store: meditimer_core::timer::SegmentStore =
///     serde_json::from_str(r#"{"segments":[]}"#).unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentStore {
    segments: Vec<Segment>,
}

impl SegmentStore {
    /// A store holding one default segment.
    pub fn new() -> Self {
        Self {
            segments: vec![Segment::default()],
        }
    }

    /// Build from a list of segments. An empty list falls back to one
    /// default segment so the store is never empty.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        if segments.is_empty() {
            return Self::new();
        }
        Self { segments }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    pub fn get(&self, id: SegmentId) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn position(&self, id: SegmentId) -> Option<usize> {
        self.segments.iter().position(|s| s.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn total_configured_secs(&self) -> u64 {
        self.segments.iter().map(|s| s.configured.total_secs()).sum()
    }

    /// Position of the first segment with no duration, if any.
    pub fn first_zero_duration(&self) -> Option<usize> {
        self.segments.iter().position(|s| s.configured.is_zero())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Append a default segment and return its id.
    pub fn add(&mut self) -> SegmentId {
        self.push(Segment::default())
    }

    pub fn push(&mut self, segment: Segment) -> SegmentId {
        let id = segment.id;
        self.segments.push(segment);
        debug!(%id, len = self.segments.len(), "segment added");
        id
    }

    /// Apply a partial update. Returns `false` if nothing matched `id`.
    ///
    /// The label only changes while the segment is pending. Duration
    /// changes on a pending segment re-seed the countdown; on any other
    /// status they only move the reset value, clamping the live countdown
    /// if it would end up above it.
    pub fn update(&mut self, id: SegmentId, update: SegmentUpdate) -> bool {
        let Some(segment) = self.segments.iter_mut().find(|s| s.id == id) else {
            return false;
        };

        let retimed = update.touches_duration();
        let SegmentUpdate {
            label,
            minutes,
            seconds,
        } = update;

        if let Some(label) = label {
            if segment.status == SegmentStatus::Pending {
                segment.label = label;
            }
        }

        if retimed {
            let configured = SegmentDuration::new(
                minutes.unwrap_or(segment.configured.minutes),
                seconds.unwrap_or(segment.configured.seconds),
            );
            segment.configured = configured;
            segment.remaining = match segment.status {
                SegmentStatus::Pending => configured,
                _ => segment.remaining.min(configured),
            };
        }
        true
    }

    /// Remove a segment. The last remaining segment is never removed.
    pub fn remove(&mut self, id: SegmentId) -> bool {
        if self.segments.len() <= 1 {
            return false;
        }
        let before = self.segments.len();
        self.segments.retain(|s| s.id != id);
        before != self.segments.len()
    }

    /// Reset one segment to `pending` with a full countdown.
    pub fn reset(&mut self, id: SegmentId) -> bool {
        match self.segments.iter_mut().find(|s| s.id == id) {
            Some(segment) => {
                segment.reset();
                true
            }
            None => false,
        }
    }

    pub fn reset_all(&mut self) {
        self.segments.iter_mut().for_each(Segment::reset);
    }

    pub(crate) fn at_mut(&mut self, index: usize) -> Option<&mut Segment> {
        self.segments.get_mut(index)
    }

    pub(crate) fn find_mut(&mut self, id: SegmentId) -> Option<&mut Segment> {
        self.segments.iter_mut().find(|s| s.id == id)
    }
}

impl Default for SegmentStore {
    fn default() -> Self {
        Self::new()
    }
}
