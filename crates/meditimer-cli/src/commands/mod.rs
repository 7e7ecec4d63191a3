pub mod config;
pub mod run;
pub mod validate;

use meditimer_core::{Config, SegmentSpec, Session};

/// Session from explicit segments, or from the configured plan when none
/// were given.
pub(crate) fn session_for(segments: &[SegmentSpec], config: &Config) -> Session {
    if segments.is_empty() {
        config.new_session()
    } else {
        Session::from_plan(segments)
    }
}

/// `H:MM:SS` for totals that can exceed the 99:59 segment limit.
pub(crate) fn format_hms(total_secs: u64) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes:02}:{seconds:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_hms_switches_to_hours() {
        assert_eq!(format_hms(65), "01:05");
        assert_eq!(format_hms(3_725), "1:02:05");
    }

    #[test]
    fn explicit_segments_override_plan() {
        let config = Config::default();
        let specs: Vec<SegmentSpec> = vec!["0:30@A".parse().unwrap(), "1:00".parse().unwrap()];
        assert_eq!(session_for(&specs, &config).segments().len(), 2);
        assert_eq!(session_for(&[], &config).segments().len(), 1);
    }
}
