//! Property tests for the sequencer invariants.

use std::cell::Cell;
use std::rc::Rc;

use meditimer_core::timer::{Segment, SegmentUpdate, Sequencer, Session};
use meditimer_core::Event;
use proptest::prelude::*;

fn session_with(durations: &[(u32, u32)]) -> Session {
    let mut session = Session::new();
    for _ in 1..durations.len() {
        session.add_segment();
    }
    let ids: Vec<_> = session.segments().iter().map(|s| s.id).collect();
    for (id, (m, s)) in ids.into_iter().zip(durations) {
        session.update_segment(id, SegmentUpdate::duration(*m, *s));
    }
    session
}

fn durations() -> impl Strategy<Value = Vec<(u32, u32)>> {
    prop::collection::vec((0u32..3, 1u32..60), 1..5)
}

proptest! {
    #[test]
    fn each_segment_takes_exactly_its_duration(durations in durations()) {
        let mut session = session_with(&durations);
        let count = Rc::new(Cell::new(0usize));
        let handle = count.clone();
        let mut seq = Sequencer::new(move |_: &Segment| handle.set(handle.get() + 1));
        seq.start(&mut session).unwrap();

        let mut since_start = 0u64;
        let mut completed = Vec::new();
        while session.is_active() {
            since_start += 1;
            if let Some(Event::SegmentCompleted { .. }) = seq.tick(&mut session) {
                completed.push(since_start);
                since_start = 0;
            }
        }

        prop_assert_eq!(count.get(), durations.len());
        prop_assert_eq!(completed.len(), durations.len());
        for (ticks, (m, s)) in completed.into_iter().zip(&durations) {
            prop_assert_eq!(ticks, u64::from(*m) * 60 + u64::from(*s));
        }
    }

    #[test]
    fn remaining_never_leaves_bounds(
        durations in durations(),
        ops in prop::collection::vec(0u8..10, 0..300),
    ) {
        let mut session = session_with(&durations);
        let mut seq = Sequencer::new(|_: &Segment| {});
        seq.start(&mut session).unwrap();

        for op in ops {
            match op {
                0 => {
                    if let Some(id) = session.current().map(|s| s.id) {
                        seq.pause_resume(&mut session, id);
                    }
                }
                1 => {
                    let id = session.segments()[0].id;
                    session.update_segment(id, SegmentUpdate::duration(0, 2));
                }
                _ => {
                    seq.tick(&mut session);
                }
            }
            for s in session.segments() {
                prop_assert!(s.remaining.total_secs() <= s.configured.total_secs());
            }
            let running = session
                .segments()
                .iter()
                .filter(|s| s.status == meditimer_core::SegmentStatus::Running)
                .count();
            prop_assert!(running <= 1);
            prop_assert_eq!(session.is_active(), session.current_index().is_some());
        }
    }

    #[test]
    fn stop_is_idempotent(durations in durations(), ticks in 0usize..200) {
        let mut session = session_with(&durations);
        let mut seq = Sequencer::new(|_: &Segment| {});
        seq.start(&mut session).unwrap();
        for _ in 0..ticks {
            seq.tick(&mut session);
        }
        seq.stop(&mut session);
        let once = session.clone();
        seq.stop(&mut session);
        prop_assert_eq!(&session, &once);
        for s in session.segments() {
            prop_assert_eq!(s.remaining, s.configured);
        }
    }
}
