use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::duration::SegmentDuration;
use crate::error::ValidationError;

/// Duration given to new segments: 5:00.
pub const DEFAULT_DURATION: SegmentDuration = SegmentDuration {
    minutes: 5,
    seconds: 0,
};

/// Opaque segment identifier, stable for the segment's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SegmentId(Uuid);

impl SegmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SegmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SegmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for SegmentId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStatus {
    Pending,
    Running,
    Paused,
    Completed,
}

/// One configured countdown unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub id: SegmentId,
    pub label: String,
    /// Reset value of the countdown.
    pub configured: SegmentDuration,
    /// Live countdown value, never above `configured`.
    pub remaining: SegmentDuration,
    pub status: SegmentStatus,
}

impl Segment {
    pub fn new(label: impl Into<String>, duration: SegmentDuration) -> Self {
        Self {
            id: SegmentId::new(),
            label: label.into(),
            configured: duration,
            remaining: duration,
            status: SegmentStatus::Pending,
        }
    }

    /// Put the segment back to `pending` with a full countdown.
    pub fn reset(&mut self) {
        self.status = SegmentStatus::Pending;
        self.remaining = self.configured;
    }
}

impl Default for Segment {
    fn default() -> Self {
        Self::new(String::new(), DEFAULT_DURATION)
    }
}

/// Partial update for a segment. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentUpdate {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub minutes: Option<u32>,
    #[serde(default)]
    pub seconds: Option<u32>,
}

impl SegmentUpdate {
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::default()
        }
    }

    pub fn duration(minutes: u32, seconds: u32) -> Self {
        Self {
            minutes: Some(minutes),
            seconds: Some(seconds),
            ..Self::default()
        }
    }

    pub fn touches_duration(&self) -> bool {
        self.minutes.is_some() || self.seconds.is_some()
    }
}

/// A segment definition in a plan, written `M:SS[@label]` on the command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSpec {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub minutes: u32,
    #[serde(default)]
    pub seconds: u32,
}

impl SegmentSpec {
    pub fn duration(&self) -> SegmentDuration {
        SegmentDuration::new(self.minutes, self.seconds)
    }

    pub fn to_segment(&self) -> Segment {
        Segment::new(self.label.clone(), self.duration())
    }
}

impl Default for SegmentSpec {
    fn default() -> Self {
        Self {
            label: String::new(),
            minutes: DEFAULT_DURATION.minutes,
            seconds: DEFAULT_DURATION.seconds,
        }
    }
}

impl FromStr for SegmentSpec {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (duration, label) = match s.split_once('@') {
            Some((d, l)) => (d, l.trim()),
            None => (s, ""),
        };
        let duration: SegmentDuration = duration.parse()?;
        Ok(Self {
            label: label.to_string(),
            minutes: duration.minutes,
            seconds: duration.seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_segment_is_five_minutes_pending() {
        let s = Segment::default();
        assert_eq!(s.configured, SegmentDuration::new(5, 0));
        assert_eq!(s.remaining, s.configured);
        assert_eq!(s.status, SegmentStatus::Pending);
        assert!(s.label.is_empty());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(Segment::default().id, Segment::default().id);
    }

    #[test]
    fn id_roundtrips_through_string() {
        let id = SegmentId::new();
        assert_eq!(id.to_string().parse::<SegmentId>().unwrap(), id);
    }

    #[test]
    fn spec_parses_label() {
        let spec: SegmentSpec = "10:30@Body scan".parse().unwrap();
        assert_eq!(spec.label, "Body scan");
        assert_eq!(spec.duration(), SegmentDuration::new(10, 30));

        let bare: SegmentSpec = "0:45".parse().unwrap();
        assert!(bare.label.is_empty());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&SegmentStatus::Completed).unwrap();
        assert_eq!(json, "\"completed\"");
    }
}
