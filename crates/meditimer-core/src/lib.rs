//! # Meditimer Core Library
//!
//! Core logic for a meditation interval timer: an ordered list of countdown
//! segments run back to back, with a cue at every segment boundary.
//!
//! ## Architecture
//!
//! - **Segment Store**: ordered segment definitions plus their live countdown
//! - **Sequencer**: a tick-driven state machine that requires the caller to
//!   invoke `tick()` once per second, advancing through segments and firing
//!   the completion signal exactly once per segment
//! - **Runner**: an optional tokio driver that ticks a session against a
//!   monotonic clock and publishes snapshots
//! - **Storage**: TOML-based configuration (tick interval, chime, default plan)
//!
//! ## Key Components
//!
//! - [`Session`]: explicit state container owned by the caller
//! - [`Sequencer`]: start / stop / pause-resume / tick
//! - [`SessionRunner`]: real-time driver
//! - [`Config`]: application configuration management

pub mod timer;
pub mod storage;
pub mod events;
pub mod error;

pub use timer::{
    CompletionSignal, Segment, SegmentDuration, SegmentId, SegmentSpec, SegmentStatus,
    SegmentUpdate, Sequencer, Session, SessionRunner, SessionSnapshot,
};
pub use storage::Config;
pub use events::Event;
pub use error::{ConfigError, CoreError, ValidationError};
