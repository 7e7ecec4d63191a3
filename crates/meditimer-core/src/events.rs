use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::SegmentId;

/// Every sequencer transition produces an Event.
/// Renderers and the CLI subscribe to them; ticks without a transition
/// produce none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        segment_count: usize,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    SegmentPaused {
        index: usize,
        segment_id: SegmentId,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SegmentResumed {
        index: usize,
        segment_id: SegmentId,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// A segment counted down to zero. `next_index` is the segment that
    /// started running in its place, or `None` when the run ended.
    SegmentCompleted {
        index: usize,
        segment_id: SegmentId,
        label: String,
        next_index: Option<usize>,
        at: DateTime<Utc>,
    },
    SessionStopped {
        at: DateTime<Utc>,
    },
}

impl Event {
    /// True for the completion that ended the run.
    pub fn is_run_end(&self) -> bool {
        matches!(
            self,
            Event::SegmentCompleted {
                next_index: None,
                ..
            }
        )
    }
}
