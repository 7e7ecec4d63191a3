mod clock;
mod duration;
mod runner;
mod segment;
mod sequencer;
mod session;
mod signal;
mod store;

pub use clock::TickClock;
pub use duration::{SegmentDuration, MAX_MINUTES, MAX_SECONDS};
pub use runner::SessionRunner;
pub use segment::{Segment, SegmentId, SegmentSpec, SegmentStatus, SegmentUpdate, DEFAULT_DURATION};
pub use sequencer::Sequencer;
pub use session::{Session, SessionSnapshot};
pub use signal::CompletionSignal;
pub use store::SegmentStore;
