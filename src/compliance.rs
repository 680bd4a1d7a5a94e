use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::measurement::{Measurement, SystemState};
use crate::settings::ComplianceSettings;

/// One wet/dry cooling cycle reconstructed from the measurement series.
///
/// The wet phase runs while the sprayers are ON; the dry phase runs from
/// the OFF transition until the next ON. A cycle whose dry phase has not
/// been closed by a later ON is pending.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleEvent {
    pub start_time: DateTime<Utc>,
    pub wet_duration_secs: f64,
    /// Zero while the cycle is pending.
    pub dry_duration_secs: f64,
    pub is_pending: bool,
    pub is_wet_ok: bool,
    pub is_dry_ok: bool,
    pub is_valid: bool,
}

/// Reconstruct cycles from a chronologically sorted series and validate
/// them against the configured wet/dry tolerance windows.
///
/// Events are derived in chronological order and returned newest-first
/// for display. Consecutive ON (or OFF) readings are debounced; a series
/// that starts mid-ON simply opens its first wet phase there. Empty input
/// yields an empty list.
pub fn analyze_cycles(series: &[Measurement], settings: &ComplianceSettings) -> Vec<CycleEvent> {
    let mut events = Vec::new();
    let mut on_start: Option<DateTime<Utc>> = None;

    for (i, m) in series.iter().enumerate() {
        match m.system_state(&settings.on_codes) {
            SystemState::On => {
                if on_start.is_none() {
                    on_start = Some(m.timestamp);
                }
            }
            SystemState::Off => {
                let Some(start) = on_start.take() else {
                    continue;
                };
                let wet_duration_secs =
                    (m.timestamp - start).num_milliseconds() as f64 / 1000.0;

                // The dry phase closes at the next ON reading, if any.
                let next_on = series[i + 1..].iter().find(|n| {
                    n.system_state(&settings.on_codes) == SystemState::On
                });

                let (dry_duration_secs, is_pending) = match next_on {
                    Some(n) => (
                        (n.timestamp - m.timestamp).num_milliseconds() as f64 / 1000.0,
                        false,
                    ),
                    None => (0.0, true),
                };

                let is_wet_ok = wet_duration_secs >= settings.wet_min_secs
                    && wet_duration_secs <= settings.wet_max_secs;
                let is_dry_ok = !is_pending
                    && dry_duration_secs >= settings.dry_min_secs
                    && dry_duration_secs <= settings.dry_max_secs;

                debug!(
                    start = %start,
                    wet = wet_duration_secs,
                    dry = dry_duration_secs,
                    pending = is_pending,
                    "closed wet phase"
                );

                events.push(CycleEvent {
                    start_time: start,
                    wet_duration_secs,
                    dry_duration_secs,
                    is_pending,
                    is_wet_ok,
                    is_dry_ok,
                    is_valid: is_wet_ok && is_dry_ok,
                });
            }
        }
    }

    events.reverse();
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64, state: i64) -> Measurement {
        Measurement {
            id: secs.to_string(),
            timestamp: Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
            raw_state: Some(state),
            temperature: Some(28.0),
            humidity: Some(60.0),
            ith_index: Some(72.0),
        }
    }

    fn settings() -> ComplianceSettings {
        ComplianceSettings::default()
    }

    #[test]
    fn test_valid_cycle() {
        // ON at t=0, OFF at t=40, next ON at t=460 (dry 420s).
        let series = vec![at(0, 3), at(40, 0), at(460, 3)];
        let events = analyze_cycles(&series, &settings());
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.wet_duration_secs, 40.0);
        assert_eq!(e.dry_duration_secs, 420.0);
        assert!(!e.is_pending);
        assert!(e.is_wet_ok);
        assert!(e.is_dry_ok);
        assert!(e.is_valid);
    }

    #[test]
    fn test_short_wet_pending_dry() {
        // ON at t=0, OFF at t=20, no further ON.
        let series = vec![at(0, 3), at(20, 0)];
        let events = analyze_cycles(&series, &settings());
        assert_eq!(events.len(), 1);
        let e = &events[0];
        assert_eq!(e.wet_duration_secs, 20.0);
        assert!(e.is_pending);
        assert_eq!(e.dry_duration_secs, 0.0);
        assert!(!e.is_wet_ok);
        assert!(!e.is_dry_ok);
        assert!(!e.is_valid);
    }

    #[test]
    fn test_consecutive_readings_debounced() {
        // Repeated ON readings keep the original start; repeated OFF
        // readings do not emit extra events.
        let series = vec![
            at(0, 3),
            at(10, 3),
            at(20, 3),
            at(40, 0),
            at(60, 0),
            at(460, 3),
        ];
        let events = analyze_cycles(&series, &settings());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].wet_duration_secs, 40.0);
        assert_eq!(events[0].dry_duration_secs, 420.0);
    }

    #[test]
    fn test_series_starting_off_is_ignored_until_first_on() {
        let series = vec![at(0, 0), at(30, 0), at(60, 3), at(100, 0), at(460, 3)];
        let events = analyze_cycles(&series, &settings());
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].wet_duration_secs, 40.0);
        assert_eq!(events[0].dry_duration_secs, 360.0);
        assert!(events[0].is_valid);
    }

    #[test]
    fn test_newest_first_ordering() {
        let series = vec![
            at(0, 3),
            at(40, 0),
            at(460, 3),
            at(500, 0),
            at(920, 3),
        ];
        let events = analyze_cycles(&series, &settings());
        assert_eq!(events.len(), 2);
        assert!(events[0].start_time > events[1].start_time);
    }

    #[test]
    fn test_dry_too_long_is_invalid() {
        // Dry phase of 700s exceeds the 600s ceiling.
        let series = vec![at(0, 3), at(40, 0), at(740, 3)];
        let events = analyze_cycles(&series, &settings());
        assert_eq!(events.len(), 1);
        assert!(events[0].is_wet_ok);
        assert!(!events[0].is_dry_ok);
        assert!(!events[0].is_valid);
    }

    #[test]
    fn test_on_codes_table_is_respected() {
        let mut s = settings();
        let series = vec![at(0, 13), at(40, 0), at(460, 13)];
        // Default table treats only code 3 as ON.
        assert!(analyze_cycles(&series, &s).is_empty());
        s.on_codes = vec![3, 13];
        let events = analyze_cycles(&series, &s);
        assert_eq!(events.len(), 1);
        assert!(events[0].is_valid);
    }

    #[test]
    fn test_empty_series() {
        assert!(analyze_cycles(&[], &settings()).is_empty());
    }

    #[test]
    fn test_trailing_on_without_off_emits_nothing() {
        let series = vec![at(0, 3), at(40, 3)];
        assert!(analyze_cycles(&series, &settings()).is_empty());
    }
}
