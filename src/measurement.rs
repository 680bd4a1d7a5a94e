use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Six-way system mode reported by the cooling controller.
///
/// Raw codes come in pairs (`0`/`10`, `1`/`11`, ...) where the second
/// decade signals a degraded reading of the same mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SystemMode {
    Off,
    Min,
    Med,
    Max,
    Rain,
    Manual,
}

impl SystemMode {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 | 10 => Some(SystemMode::Off),
            1 | 11 => Some(SystemMode::Min),
            2 | 12 => Some(SystemMode::Med),
            3 | 13 => Some(SystemMode::Max),
            4 => Some(SystemMode::Rain),
            5 => Some(SystemMode::Manual),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SystemMode::Off => "OFF",
            SystemMode::Min => "MIN",
            SystemMode::Med => "MED",
            SystemMode::Max => "MAX",
            SystemMode::Rain => "LLUVIA",
            SystemMode::Manual => "MANUAL",
        }
    }

    /// Background band color (RGBA) for the chart.
    pub fn band_color(&self) -> &'static str {
        match self {
            SystemMode::Off => "rgba(76, 175, 80, 0.2)",
            SystemMode::Min => "rgba(255, 235, 59, 0.2)",
            SystemMode::Med => "rgba(255, 152, 0, 0.2)",
            SystemMode::Max => "rgba(244, 67, 54, 0.2)",
            SystemMode::Rain => "rgba(33, 150, 243, 0.2)",
            SystemMode::Manual => "rgba(0, 0, 0, 0.1)",
        }
    }
}

/// Binary system state used by cycle-compliance analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemState {
    On,
    Off,
}

/// A canonical, immutable sensor reading.
///
/// Raw values are preserved as reported; out-of-range values are only
/// clamped later at scaling time. Fields the feed omitted stay `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    /// Opaque record key from the external store.
    pub id: String,
    pub timestamp: DateTime<Utc>,
    /// Raw integer state code as reported by the controller.
    pub raw_state: Option<i64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub ith_index: Option<f64>,
}

impl Measurement {
    pub fn mode(&self) -> Option<SystemMode> {
        self.raw_state.and_then(SystemMode::from_code)
    }

    /// Whether this reading can participate in chart series and cycle
    /// analysis: temperature, humidity and ITH must all be finite.
    pub fn is_chartable(&self) -> bool {
        [self.temperature, self.humidity, self.ith_index]
            .iter()
            .all(|v| v.map(f64::is_finite).unwrap_or(false))
    }

    /// Resolve the binary state against an explicit ON-code table.
    pub fn system_state(&self, on_codes: &[i64]) -> SystemState {
        match self.raw_state {
            Some(code) if on_codes.contains(&code) => SystemState::On,
            _ => SystemState::Off,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn measurement(state: Option<i64>, temp: Option<f64>, hum: Option<f64>, ith: Option<f64>) -> Measurement {
        Measurement {
            id: "k".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 9, 29, 10, 36, 43).unwrap(),
            raw_state: state,
            temperature: temp,
            humidity: hum,
            ith_index: ith,
        }
    }

    #[test]
    fn test_mode_from_code_pairs() {
        assert_eq!(SystemMode::from_code(0), Some(SystemMode::Off));
        assert_eq!(SystemMode::from_code(10), Some(SystemMode::Off));
        assert_eq!(SystemMode::from_code(3), Some(SystemMode::Max));
        assert_eq!(SystemMode::from_code(13), Some(SystemMode::Max));
        assert_eq!(SystemMode::from_code(4), Some(SystemMode::Rain));
        assert_eq!(SystemMode::from_code(5), Some(SystemMode::Manual));
        assert_eq!(SystemMode::from_code(99), None);
        assert_eq!(SystemMode::from_code(-1), None);
    }

    #[test]
    fn test_chartable_requires_all_finite() {
        assert!(measurement(Some(3), Some(28.0), Some(60.0), Some(72.0)).is_chartable());
        assert!(!measurement(Some(3), Some(28.0), None, Some(72.0)).is_chartable());
        assert!(!measurement(Some(3), Some(f64::NAN), Some(60.0), Some(72.0)).is_chartable());
        assert!(!measurement(Some(3), Some(28.0), Some(f64::INFINITY), Some(72.0)).is_chartable());
    }

    #[test]
    fn test_system_state_follows_on_table() {
        let m = measurement(Some(13), Some(28.0), Some(60.0), Some(72.0));
        assert_eq!(m.system_state(&[3]), SystemState::Off);
        assert_eq!(m.system_state(&[3, 13]), SystemState::On);

        let off = measurement(Some(0), None, None, None);
        assert_eq!(off.system_state(&[3]), SystemState::Off);

        let unknown = measurement(None, None, None, None);
        assert_eq!(unknown.system_state(&[3]), SystemState::Off);
    }
}
