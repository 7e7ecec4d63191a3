//! Runner tests on tokio's paused clock.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use meditimer_core::timer::{
    Segment, SegmentDuration, SegmentStatus, SegmentUpdate, Session, SessionRunner,
};
use meditimer_core::Event;

fn runner_with(
    durations: &[(u32, u32)],
) -> (Arc<AtomicUsize>, SessionRunner<impl FnMut(&Segment) + Send + 'static>) {
    let mut session = Session::new();
    for _ in 1..durations.len() {
        session.add_segment();
    }
    let ids: Vec<_> = session.segments().iter().map(|s| s.id).collect();
    for (id, (m, s)) in ids.into_iter().zip(durations) {
        session.update_segment(id, SegmentUpdate::duration(*m, *s));
    }

    let count = Arc::new(AtomicUsize::new(0));
    let handle = count.clone();
    let runner = SessionRunner::new(
        session,
        move |_: &Segment| {
            handle.fetch_add(1, Ordering::SeqCst);
        },
        Duration::from_secs(1),
    );
    (count, runner)
}

#[tokio::test(start_paused = true)]
async fn runs_all_segments_in_real_time() {
    let (count, runner) = runner_with(&[(0, 2), (0, 1)]);
    runner.start().await.unwrap();

    tokio::time::timeout(Duration::from_secs(10), runner.finished())
        .await
        .expect("run should finish");

    assert_eq!(count.load(Ordering::SeqCst), 2);
    let snap = runner.snapshot().await;
    assert!(!snap.is_active);
    assert!(snap
        .segments
        .iter()
        .all(|s| s.status == SegmentStatus::Completed));
}

#[tokio::test(start_paused = true)]
async fn stop_halts_ticking() {
    let (count, runner) = runner_with(&[(0, 5)]);
    runner.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(2_500)).await;

    runner.stop().await;
    let stopped = runner.snapshot().await;
    assert!(!stopped.is_active);
    assert_eq!(stopped.segments[0].remaining, SegmentDuration::new(0, 5));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(runner.snapshot().await, stopped);
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn pause_holds_the_countdown() {
    let (count, runner) = runner_with(&[(0, 3)]);
    runner.start().await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_500)).await;

    assert!(matches!(
        runner.pause_resume_current().await,
        Some(Event::SegmentPaused { remaining_secs: 2, .. })
    ));
    tokio::time::sleep(Duration::from_secs(5)).await;
    let paused = runner.snapshot().await;
    assert_eq!(paused.segments[0].remaining, SegmentDuration::new(0, 2));
    assert_eq!(paused.segments[0].status, SegmentStatus::Paused);

    runner.pause_resume_current().await;
    tokio::time::timeout(Duration::from_secs(10), runner.finished())
        .await
        .expect("run should finish after resume");
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn invalid_start_spawns_nothing() {
    let (_, runner) = runner_with(&[(0, 0)]);
    assert!(runner.start().await.is_err());
    assert!(!runner.snapshot().await.is_active);
}

#[tokio::test(start_paused = true)]
async fn events_are_broadcast() {
    let (_, runner) = runner_with(&[(0, 1)]);
    let mut events = runner.events();
    runner.start().await.unwrap();

    assert!(matches!(events.recv().await.unwrap(), Event::SessionStarted { .. }));
    let completed = events.recv().await.unwrap();
    assert!(completed.is_run_end());
}

#[tokio::test(start_paused = true)]
async fn configuration_commands_publish_snapshots() {
    let (_, runner) = runner_with(&[(0, 5)]);
    let rx = runner.subscribe();
    let id = runner.add_segment().await;
    assert_eq!(rx.borrow().segments.len(), 2);

    assert!(runner.update_segment(id, SegmentUpdate::label("Closing")).await);
    assert_eq!(rx.borrow().segments[1].label, "Closing");

    assert!(runner.remove_segment(id).await);
    assert_eq!(rx.borrow().segments.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn overlapping_starts_leave_one_live_ticker() {
    let (count, runner) = runner_with(&[(0, 2)]);
    let (first, second) = tokio::join!(runner.start(), runner.start());
    assert!(first.is_ok() && second.is_ok());

    tokio::time::timeout(Duration::from_secs(10), runner.finished())
        .await
        .expect("run should finish after overlapping starts");
    assert_eq!(count.load(Ordering::SeqCst), 1);
}
