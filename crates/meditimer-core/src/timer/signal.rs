use super::segment::Segment;

/// Cue fired once per completed segment (chime, vibration, bell).
///
/// Called synchronously from `tick()`. Implementations must return quickly
/// and hand any long-running work off to their own task.
pub trait CompletionSignal {
    fn segment_completed(&mut self, segment: &Segment);
}

impl<F> CompletionSignal for F
where
    F: FnMut(&Segment),
{
    fn segment_completed(&mut self, segment: &Segment) {
        self(segment)
    }
}
