//! Minute/second countdown values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Upper bound for the minutes field of a segment.
pub const MAX_MINUTES: u32 = 99;
/// Upper bound for the seconds field of a segment.
pub const MAX_SECONDS: u32 = 59;

/// A `(minutes, seconds)` pair.
///
/// Constructors clamp out-of-range fields, so `seconds` is always `0..=59`
/// and `minutes` is always `0..=99`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SegmentDuration {
    pub minutes: u32,
    pub seconds: u32,
}

impl SegmentDuration {
    pub const ZERO: Self = Self {
        minutes: 0,
        seconds: 0,
    };

    /// Build a duration, clamping each field to its allowed range.
    pub fn new(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: minutes.min(MAX_MINUTES),
            seconds: seconds.min(MAX_SECONDS),
        }
    }

    pub fn total_secs(&self) -> u64 {
        u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }

    pub fn is_zero(&self) -> bool {
        self.total_secs() == 0
    }

    /// Decrement by one second with minute/second borrow.
    ///
    /// Returns `None` when the value would go below zero.
    pub fn decrement(self) -> Option<Self> {
        match (self.minutes, self.seconds) {
            (0, 0) => None,
            (m, 0) => Some(Self {
                minutes: m - 1,
                seconds: 59,
            }),
            (m, s) => Some(Self {
                minutes: m,
                seconds: s - 1,
            }),
        }
    }

    pub fn min(self, other: Self) -> Self {
        if self.total_secs() <= other.total_secs() {
            self
        } else {
            other
        }
    }
}

impl fmt::Display for SegmentDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.minutes, self.seconds)
    }
}

impl FromStr for SegmentDuration {
    type Err = ValidationError;

    /// Accepts `M:SS` or a bare number of minutes.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |message: String| ValidationError::InvalidValue {
            field: "duration".into(),
            message,
        };
        let s = s.trim();
        let (min_part, sec_part) = match s.split_once(':') {
            Some((m, sec)) => (m, Some(sec)),
            None => (s, None),
        };

        let minutes: u32 = min_part
            .parse()
            .map_err(|_| invalid(format!("cannot parse minutes from '{s}'")))?;
        let seconds: u32 = match sec_part {
            Some(sec) => sec
                .parse()
                .map_err(|_| invalid(format!("cannot parse seconds from '{s}'")))?,
            None => 0,
        };

        if minutes > MAX_MINUTES {
            return Err(invalid(format!("minutes must be at most {MAX_MINUTES}")));
        }
        if seconds > MAX_SECONDS {
            return Err(invalid(format!("seconds must be at most {MAX_SECONDS}")));
        }
        Ok(Self { minutes, seconds })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrement_borrows_from_minutes() {
        let d = SegmentDuration::new(1, 0).decrement().unwrap();
        assert_eq!(d, SegmentDuration::new(0, 59));
    }

    #[test]
    fn decrement_at_zero_underflows() {
        assert_eq!(SegmentDuration::ZERO.decrement(), None);
        assert_eq!(
            SegmentDuration::new(0, 1).decrement(),
            Some(SegmentDuration::ZERO)
        );
    }

    #[test]
    fn new_clamps_fields() {
        let d = SegmentDuration::new(250, 75);
        assert_eq!(d.minutes, MAX_MINUTES);
        assert_eq!(d.seconds, MAX_SECONDS);
    }

    #[test]
    fn parses_minutes_and_seconds() {
        assert_eq!("5:00".parse::<SegmentDuration>().unwrap(), SegmentDuration::new(5, 0));
        assert_eq!("0:30".parse::<SegmentDuration>().unwrap(), SegmentDuration::new(0, 30));
        assert_eq!("12".parse::<SegmentDuration>().unwrap(), SegmentDuration::new(12, 0));
    }

    #[test]
    fn parse_rejects_out_of_range_and_garbage() {
        assert!("1:60".parse::<SegmentDuration>().is_err());
        assert!("100:00".parse::<SegmentDuration>().is_err());
        assert!("abc".parse::<SegmentDuration>().is_err());
        assert!("1:xx".parse::<SegmentDuration>().is_err());
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(SegmentDuration::new(3, 7).to_string(), "03:07");
    }
}
