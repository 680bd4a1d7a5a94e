use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::chart::{downsample, ChartGeometry, ChartViewport};
use crate::compliance::{analyze_cycles, CycleEvent};
use crate::measurement::Measurement;
use crate::normalizer::{normalize, NormalizeReport};
use crate::settings::Settings;
use crate::stress::StressTier;

/// Requested date window for a snapshot computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateWindow {
    Day(NaiveDate),
    Range(NaiveDate, NaiveDate),
    /// The calendar month containing the reference date.
    CurrentMonth,
}

impl DateWindow {
    /// Inclusive UTC bounds: midnight of the first day through
    /// 23:59:59.999 of the last. `today` anchors `CurrentMonth` so the
    /// computation stays a pure function of its inputs.
    pub fn bounds(&self, today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let (first, last) = match *self {
            DateWindow::Day(d) => (d, d),
            DateWindow::Range(start, end) => (start, end),
            DateWindow::CurrentMonth => {
                let first = today.with_day(1).unwrap_or(today);
                let last = first
                    .checked_add_months(chrono::Months::new(1))
                    .and_then(|next| next.pred_opt())
                    .unwrap_or(today);
                (first, last)
            }
        };
        let start = Utc.from_utc_datetime(&first.and_hms_opt(0, 0, 0).unwrap());
        let end = Utc.from_utc_datetime(&last.and_hms_opt(23, 59, 59).unwrap())
            + Duration::milliseconds(999);
        (start, end)
    }

    pub fn contains(&self, t: DateTime<Utc>, today: NaiveDate) -> bool {
        let (start, end) = self.bounds(today);
        t >= start && t <= end
    }
}

/// One windowed measurement with its heat-stress classification.
/// Readings without a usable ITH value carry no tier.
#[derive(Debug, Clone)]
pub struct ClassifiedPoint {
    pub measurement: Measurement,
    pub tier: Option<StressTier>,
}

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("feed is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feed root must be an object of record key to field bag")]
    NotAnObject,
}

/// Parse a raw feed snapshot (JSON object of record key -> field bag).
pub fn parse_feed(bytes: &[u8]) -> Result<Map<String, Value>, FeedError> {
    let value: Value = serde_json::from_slice(bytes)?;
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(FeedError::NotAnObject),
    }
}

/// All derived views for one immutable feed snapshot.
///
/// Recomputed from scratch on every call; identical inputs produce
/// identical outputs and the raw feed is never mutated.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Canonical windowed series, ascending, classified per point.
    /// Non-chartable readings are kept here for raw listings.
    pub points: Vec<ClassifiedPoint>,
    pub report: NormalizeReport,
    /// Newest-first cycle events over the windowed chartable series.
    pub cycles: Vec<CycleEvent>,
    /// `None` when the window holds nothing plottable.
    pub chart: Option<ChartGeometry>,
}

impl Snapshot {
    pub fn compute(
        raw: &Map<String, Value>,
        window: Option<DateWindow>,
        today: NaiveDate,
        viewport: &ChartViewport,
        settings: &Settings,
    ) -> Self {
        let (all, report) = normalize(raw);

        let windowed: Vec<Measurement> = match window {
            Some(w) => all
                .into_iter()
                .filter(|m| w.contains(m.timestamp, today))
                .collect(),
            None => all,
        };
        debug!(kept = windowed.len(), "windowed measurements");

        let chartable: Vec<Measurement> = windowed
            .iter()
            .filter(|m| m.is_chartable())
            .cloned()
            .collect();

        let cycles = analyze_cycles(&chartable, &settings.compliance);

        let clamped = ChartViewport {
            zoom: viewport.zoom.clamp(1.0, settings.chart.zoom_ceiling),
            ..*viewport
        };
        let plotted = downsample(&chartable, settings.chart.max_points);
        let chart = ChartGeometry::build(&plotted, &clamped);

        let points = windowed
            .into_iter()
            .map(|m| {
                let tier = m
                    .ith_index
                    .filter(|v| v.is_finite())
                    .map(StressTier::classify);
                ClassifiedPoint { measurement: m, tier }
            })
            .collect::<Vec<_>>();

        info!(
            points = points.len(),
            cycles = cycles.len(),
            dropped = report.dropped_no_date,
            "snapshot computed"
        );

        Snapshot {
            points,
            report,
            cycles,
            chart,
        }
    }
}
