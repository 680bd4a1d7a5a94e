use chrono::{DateTime, Datelike, Duration, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Fixed left-axis tick values (temperature, degrees).
pub const TEMP_TICKS: [f64; 6] = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0];

/// Fixed right-axis tick values (humidity and ITH, percent/index).
pub const RIGHT_AXIS_TICKS: [f64; 6] = [0.0, 20.0, 40.0, 60.0, 80.0, 100.0];

const MONTHS: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XTick {
    pub x: f64,
    pub label: String,
}

fn hour_minute(t: DateTime<Utc>) -> String {
    format!("{}:{:02}", t.hour(), t.minute())
}

fn month_day(t: DateTime<Utc>) -> String {
    format!("{} {}", MONTHS[t.month0() as usize], t.day())
}

/// Evenly spaced X-axis ticks: `5 * zoom` steps (floored), labeled
/// month/day when the series spans more than 24 hours, else hour:minute.
/// A zero-span series gets a single centered tick.
pub fn x_ticks(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    chart_width: f64,
    zoom: f64,
) -> Vec<XTick> {
    let range = end - start;
    if range.is_zero() {
        return vec![XTick {
            x: chart_width / 2.0,
            label: hour_minute(start),
        }];
    }

    let span_over_24h = range > Duration::hours(24);
    let steps = (5.0 * zoom).floor().max(1.0) as usize;
    let range_ms = range.num_milliseconds();

    (0..=steps)
        .map(|i| {
            let fraction = i as f64 / steps as f64;
            let t = start + Duration::milliseconds((range_ms as f64 * fraction) as i64);
            let label = if span_over_24h {
                month_day(t)
            } else {
                hour_minute(t)
            };
            XTick {
                x: fraction * chart_width,
                label,
            }
        })
        .collect()
}
