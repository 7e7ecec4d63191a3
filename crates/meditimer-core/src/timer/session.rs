use serde::{Deserialize, Serialize};
use tracing::warn;

use super::segment::{Segment, SegmentId, SegmentSpec, SegmentUpdate};
use super::store::SegmentStore;

/// The run-time aggregate: ordered segments plus the run cursor.
///
/// A session is a plain value owned by the caller. Sequencer operations
/// borrow it mutably, so there is no shared global state.
///
/// Sessions are only built through the constructors; they serialize for
/// inspection but cannot be read back:
///
/// ```compile_fail
/// let session: meditimer_core::Session = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    pub(crate) store: SegmentStore,
    /// Index of the running or paused segment. `None` outside a run.
    pub(crate) current_index: Option<usize>,
}

/// Read-only view handed to renderers after every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub segments: Vec<Segment>,
    pub current_index: Option<usize>,
    pub is_active: bool,
}

impl Session {
    /// A session with one default 5:00 segment.
    pub fn new() -> Self {
        Self::default()
    }

    /// A session seeded from plan entries.
    pub fn from_plan(plan: &[SegmentSpec]) -> Self {
        Self {
            store: SegmentStore::from_segments(plan.iter().map(SegmentSpec::to_segment).collect()),
            current_index: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn store(&self) -> &SegmentStore {
        &self.store
    }

    pub fn segments(&self) -> &[Segment] {
        self.store.segments()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn is_active(&self) -> bool {
        self.current_index.is_some()
    }

    pub fn current(&self) -> Option<&Segment> {
        self.current_index.and_then(|i| self.store.at(i))
    }

    /// Seconds left in the whole run, counting the live segment's countdown
    /// and every segment after it.
    pub fn remaining_secs(&self) -> u64 {
        match self.current_index {
            Some(index) => self
                .segments()
                .iter()
                .skip(index)
                .enumerate()
                .map(|(offset, s)| {
                    if offset == 0 {
                        s.remaining.total_secs()
                    } else {
                        s.configured.total_secs()
                    }
                })
                .sum(),
            None => 0,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            segments: self.segments().to_vec(),
            current_index: self.current_index,
            is_active: self.is_active(),
        }
    }

    // ── Configuration commands ───────────────────────────────────────

    pub fn add_segment(&mut self) -> SegmentId {
        self.store.add()
    }

    pub fn update_segment(&mut self, id: SegmentId, update: SegmentUpdate) -> bool {
        self.store.update(id, update)
    }

    /// Remove a segment. Rejected while a run is in progress so the cursor
    /// always points at an existing segment.
    pub fn remove_segment(&mut self, id: SegmentId) -> bool {
        if self.is_active() {
            warn!(%id, "refusing to remove a segment during an active run");
            return false;
        }
        self.store.remove(id)
    }

    /// Reset one segment's countdown. The segment under the cursor is left
    /// alone; use `stop` to abandon the run instead.
    pub fn reset_segment(&mut self, id: SegmentId) -> bool {
        if let (Some(current), Some(position)) = (self.current_index, self.store.position(id)) {
            if current == position {
                return false;
            }
        }
        self.store.reset(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{SegmentDuration, SegmentStatus};

    #[test]
    fn new_session_is_inactive_with_one_segment() {
        let session = Session::new();
        assert!(!session.is_active());
        assert_eq!(session.current_index(), None);
        assert_eq!(session.segments().len(), 1);
        assert!(session.current().is_none());
    }

    #[test]
    fn remove_is_rejected_while_active() {
        let mut session = Session::new();
        let second = session.add_segment();
        session.current_index = Some(0);
        assert!(!session.remove_segment(second));
        assert_eq!(session.segments().len(), 2);
    }

    #[test]
    fn reset_segment_skips_the_cursor() {
        let mut session = Session::new();
        let first = session.segments()[0].id;
        session.store.at_mut(0).unwrap().status = SegmentStatus::Running;
        session.current_index = Some(0);
        assert!(!session.reset_segment(first));
        assert_eq!(session.segments()[0].status, SegmentStatus::Running);
    }

    #[test]
    fn from_plan_keeps_order_and_labels() {
        let plan = vec![
            SegmentSpec {
                label: "Settle".into(),
                minutes: 1,
                seconds: 0,
            },
            SegmentSpec {
                label: "Sit".into(),
                minutes: 20,
                seconds: 0,
            },
        ];
        let session = Session::from_plan(&plan);
        let labels: Vec<_> = session.segments().iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Settle", "Sit"]);
        assert_eq!(session.segments()[1].configured, SegmentDuration::new(20, 0));
    }

    #[test]
    fn snapshot_mirrors_cursor() {
        let mut session = Session::new();
        assert!(!session.snapshot().is_active);
        session.current_index = Some(0);
        let snap = session.snapshot();
        assert!(snap.is_active);
        assert_eq!(snap.current_index, Some(0));
    }
}
