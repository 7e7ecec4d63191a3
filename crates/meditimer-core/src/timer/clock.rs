use std::time::Duration;

/// Converts monotonic elapsed time into whole ticks.
///
/// The runner measures elapsed time from the run anchor and asks the clock
/// how many ticks are owed. A late wakeup yields several catch-up ticks
/// instead of silently losing time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickClock {
    period: Duration,
    emitted: u64,
}

impl TickClock {
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(Duration::from_millis(1)),
            emitted: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Ticks owed for `elapsed` since the anchor, marking them as emitted.
    pub fn due(&mut self, elapsed: Duration) -> u64 {
        let total = (elapsed.as_nanos() / self.period.as_nanos()) as u64;
        let owed = total.saturating_sub(self.emitted);
        self.emitted = self.emitted.max(total);
        owed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_whole_periods_only() {
        let mut clock = TickClock::new(Duration::from_secs(1));
        assert_eq!(clock.due(Duration::from_millis(999)), 0);
        assert_eq!(clock.due(Duration::from_millis(1_000)), 1);
        assert_eq!(clock.due(Duration::from_millis(1_500)), 0);
        assert_eq!(clock.emitted(), 1);
    }

    #[test]
    fn late_wakeup_catches_up() {
        let mut clock = TickClock::new(Duration::from_secs(1));
        assert_eq!(clock.due(Duration::from_secs(1)), 1);
        assert_eq!(clock.due(Duration::from_millis(4_200)), 3);
        assert_eq!(clock.emitted(), 4);
    }

    #[test]
    fn going_backwards_owes_nothing() {
        let mut clock = TickClock::new(Duration::from_secs(1));
        clock.due(Duration::from_secs(5));
        assert_eq!(clock.due(Duration::from_secs(2)), 0);
        assert_eq!(clock.emitted(), 5);
    }

    #[test]
    fn zero_period_is_clamped() {
        let clock = TickClock::new(Duration::ZERO);
        assert_eq!(clock.period(), Duration::from_millis(1));
    }
}
