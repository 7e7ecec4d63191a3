use std::time::Duration;

use chrono::Local;
use clap::Args;
use meditimer_core::timer::SessionRunner;
use meditimer_core::{CompletionSignal, Config, Event, Segment, SegmentSpec, SegmentStatus, SessionSnapshot};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::debug;

use super::{format_hms, session_for};

#[derive(Args)]
pub struct RunArgs {
    /// Segments as M:SS[@label]; defaults to the configured plan
    pub segments: Vec<SegmentSpec>,
    /// Emit one JSON object per line instead of progress text
    #[arg(long)]
    pub json: bool,
    /// Do not read pause/stop commands from stdin
    #[arg(long)]
    pub no_input: bool,
}

/// Rings the terminal bell on every segment boundary.
struct Bell {
    enabled: bool,
}

impl CompletionSignal for Bell {
    fn segment_completed(&mut self, _segment: &Segment) {
        if self.enabled {
            eprint!("\x07");
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum Line<'a> {
    Snapshot(&'a SessionSnapshot),
    Event(&'a Event),
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let session = session_for(&args.segments, &config);
    let bell = Bell {
        enabled: config.chime.enabled,
    };
    let runner = SessionRunner::new(session, bell, config.tick_interval());

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = rt.block_on(drive(runner, args.json, !args.no_input));
    // A pending stdin read would otherwise hold shutdown open.
    rt.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn drive(
    runner: SessionRunner<Bell>,
    json: bool,
    read_input: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut events = runner.events();
    let mut snapshots = runner.subscribe();
    runner.start().await?;

    if read_input {
        tokio::spawn(read_commands(runner.clone()));
        if !json {
            eprintln!("{COMMAND_HELP}");
        }
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    loop {
        tokio::select! {
            _ = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                runner.stop().await;
            }
            received = events.recv() => {
                match received {
                    Ok(event) => print_event(&event, json)?,
                    Err(RecvError::Lagged(skipped)) => debug!(skipped, "event stream lagged"),
                    Err(RecvError::Closed) => {}
                }
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snap = snapshots.borrow_and_update().clone();
                if !snap.is_active {
                    // Events are sent before the snapshot that reflects them.
                    while let Ok(event) = events.try_recv() {
                        print_event(&event, json)?;
                    }
                    print_progress(&snap, json)?;
                    print_summary(&snap, json);
                    break;
                }
                print_progress(&snap, json)?;
            }
        }
    }
    Ok(())
}

const COMMAND_HELP: &str = "commands: p or Enter = pause/resume, s or q = stop";

/// A line typed on stdin while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    PauseResume,
    Stop,
}

impl Command {
    fn parse(line: &str) -> Option<Self> {
        match line.trim() {
            "p" | "" => Some(Self::PauseResume),
            "s" | "q" => Some(Self::Stop),
            _ => None,
        }
    }
}

async fn read_commands(runner: SessionRunner<Bell>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        match Command::parse(&line) {
            Some(Command::PauseResume) => {
                runner.pause_resume_current().await;
            }
            Some(Command::Stop) => {
                runner.stop().await;
                break;
            }
            None => eprintln!("unknown command: {} ({COMMAND_HELP})", line.trim()),
        }
    }
}

fn print_progress(snap: &SessionSnapshot, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(&Line::Snapshot(snap))?);
        return Ok(());
    }
    let Some(index) = snap.current_index else {
        return Ok(());
    };
    let Some(segment) = snap.segments.get(index) else {
        return Ok(());
    };
    let paused = if segment.status == SegmentStatus::Paused {
        "  (paused)"
    } else {
        ""
    };
    println!(
        "[{}/{}] {}  {}{}",
        index + 1,
        snap.segments.len(),
        display_label(segment),
        segment.remaining,
        paused
    );
    Ok(())
}

fn print_event(event: &Event, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string(&Line::Event(event))?);
        return Ok(());
    }
    match event {
        Event::SessionStarted {
            segment_count,
            total_secs,
            at,
        } => println!(
            "{} started {} segment(s), {} total",
            at.with_timezone(&Local).format("%H:%M:%S"),
            segment_count,
            format_hms(*total_secs)
        ),
        Event::SegmentCompleted {
            index, label, at, ..
        } => {
            let label = if label.is_empty() { "segment" } else { label.as_str() };
            println!(
                "{} completed {} ({})",
                at.with_timezone(&Local).format("%H:%M:%S"),
                label,
                index + 1
            );
        }
        Event::SegmentPaused { .. } => println!("paused"),
        Event::SegmentResumed { .. } => println!("resumed"),
        Event::SessionStopped { .. } => {}
    }
    Ok(())
}

fn print_summary(snap: &SessionSnapshot, json: bool) {
    if json {
        return;
    }
    let finished = snap
        .segments
        .iter()
        .all(|s| s.status == SegmentStatus::Completed);
    if finished {
        println!("Session complete");
    } else {
        println!("Session stopped");
    }
}

fn display_label(segment: &Segment) -> &str {
    if segment.label.is_empty() {
        "(unlabeled)"
    } else {
        &segment.label
    }
}
