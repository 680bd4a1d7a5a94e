use chrono::{DateTime, Utc};

/// Clamped linear value-to-pixel scale with an inverted range, so the
/// domain minimum lands at the bottom of the chart (`y = height`).
#[derive(Debug, Clone, Copy)]
pub struct LinearScale {
    domain_min: f64,
    domain_max: f64,
    height: f64,
}

impl LinearScale {
    pub fn new(domain_min: f64, domain_max: f64, height: f64) -> Self {
        Self {
            domain_min,
            domain_max,
            height,
        }
    }

    /// Temperature axis, 0-50 degrees.
    pub fn temperature(height: f64) -> Self {
        Self::new(0.0, 50.0, height)
    }

    /// Shared humidity/ITH axis, 0-100.
    pub fn right_axis(height: f64) -> Self {
        Self::new(0.0, 100.0, height)
    }

    /// Out-of-range values are clamped for display; the measurement
    /// itself keeps the original value.
    pub fn apply(&self, value: f64) -> f64 {
        let clamped = value.max(self.domain_min).min(self.domain_max);
        self.height - ((clamped - self.domain_min) / (self.domain_max - self.domain_min)) * self.height
    }
}

/// Linear time-to-pixel scale over `[0, width]`.
#[derive(Debug, Clone, Copy)]
pub struct TimeScale {
    start_ms: i64,
    range_ms: i64,
    width: f64,
}

impl TimeScale {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>, width: f64) -> Self {
        Self {
            start_ms: start.timestamp_millis(),
            range_ms: end.timestamp_millis() - start.timestamp_millis(),
            width,
        }
    }

    pub fn range_ms(&self) -> i64 {
        self.range_ms
    }

    /// A single-instant series maps to the horizontal center rather than
    /// degenerating to x=0 or NaN.
    pub fn apply(&self, t: DateTime<Utc>) -> f64 {
        if self.range_ms == 0 {
            return self.width / 2.0;
        }
        ((t.timestamp_millis() - self.start_ms) as f64 / self.range_ms as f64) * self.width
    }
}
