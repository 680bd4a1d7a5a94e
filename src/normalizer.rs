use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::measurement::Measurement;

/// Counts reported alongside a normalization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Records seen in the raw feed.
    pub total: usize,
    /// Records dropped because no usable date was found anywhere.
    pub dropped_no_date: usize,
    /// Records kept but unusable for charting/compliance (missing or
    /// non-finite temperature/humidity/ITH).
    pub non_chartable: usize,
}

/// Resolve a field that the feed may spell capitalized or lowercase.
/// The capitalized variant wins when both are present.
fn resolve<'a>(bag: &'a Map<String, Value>, upper: &str, lower: &str) -> Option<&'a Value> {
    bag.get(upper).or_else(|| bag.get(lower))
}

/// Numeric fields arrive as JSON numbers or as numeric strings.
fn coerce_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn coerce_i64(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parse the handful of date spellings the feed produces. Record keys are
/// usually ISO 8601 timestamps themselves, so the same parser covers the
/// key fallback.
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&naive));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0)?));
    }
    None
}

/// Normalize a raw feed snapshot (record key -> field bag) into canonical
/// measurements sorted ascending by timestamp.
///
/// Records with no parseable date are dropped and counted; nothing in here
/// is a hard failure.
pub fn normalize(raw: &Map<String, Value>) -> (Vec<Measurement>, NormalizeReport) {
    let mut report = NormalizeReport {
        total: raw.len(),
        ..Default::default()
    };
    let mut measurements = Vec::with_capacity(raw.len());

    for (key, value) in raw {
        let Some(bag) = value.as_object() else {
            warn!(record = %key, "raw record is not an object, dropping");
            report.dropped_no_date += 1;
            continue;
        };

        let date_field = resolve(bag, "Date", "date").and_then(Value::as_str);
        let timestamp = date_field
            .and_then(parse_date)
            .or_else(|| parse_date(key));

        let Some(timestamp) = timestamp else {
            debug!(record = %key, "no usable date in record or key, dropping");
            report.dropped_no_date += 1;
            continue;
        };

        let m = Measurement {
            id: key.clone(),
            timestamp,
            raw_state: coerce_i64(resolve(bag, "Estado", "estado")),
            temperature: coerce_f64(resolve(bag, "Temperatura", "temperatura")),
            humidity: coerce_f64(resolve(bag, "Humedad", "humedad")),
            ith_index: coerce_f64(resolve(bag, "Indice", "indice")),
        };
        if !m.is_chartable() {
            report.non_chartable += 1;
        }
        measurements.push(m);
    }

    measurements.sort_by_key(|m| m.timestamp);

    if report.dropped_no_date > 0 {
        warn!(
            dropped = report.dropped_no_date,
            total = report.total,
            "dropped records without a usable date"
        );
    }

    (measurements, report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn as_map(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_capitalized_keys_preferred() {
        let raw = as_map(json!({
            "2025-09-29T10:00:00Z": {
                "Temperatura": 28, "temperatura": 99,
                "Humedad": 60, "Indice": 72, "Estado": 3
            }
        }));
        let (ms, report) = normalize(&raw);
        assert_eq!(ms.len(), 1);
        assert_eq!(ms[0].temperature, Some(28.0));
        assert_eq!(ms[0].raw_state, Some(3));
        assert_eq!(report.dropped_no_date, 0);
    }

    #[test]
    fn test_missing_fields_do_not_drop_record() {
        // Missing humidity: kept, flagged non-chartable.
        let raw = as_map(json!({
            "2025-09-29T10:00:00Z": { "Estado": 3, "Temperatura": 28 }
        }));
        let (ms, report) = normalize(&raw);
        assert_eq!(ms.len(), 1);
        assert_eq!(ms[0].raw_state, Some(3));
        assert_eq!(ms[0].temperature, Some(28.0));
        assert_eq!(ms[0].humidity, None);
        assert_eq!(report.non_chartable, 1);
    }

    #[test]
    fn test_date_falls_back_to_record_key() {
        let raw = as_map(json!({
            "2025-09-29T10:36:43Z": { "Estado": 0 }
        }));
        let (ms, _) = normalize(&raw);
        assert_eq!(ms.len(), 1);
        assert_eq!(ms[0].timestamp.to_rfc3339(), "2025-09-29T10:36:43+00:00");
    }

    #[test]
    fn test_unparseable_date_is_dropped_and_counted() {
        let raw = as_map(json!({
            "not-a-date": { "Estado": 3, "date": "also not a date" },
            "2025-09-29T10:00:00Z": { "Estado": 0 }
        }));
        let (ms, report) = normalize(&raw);
        assert_eq!(ms.len(), 1);
        assert_eq!(report.total, 2);
        assert_eq!(report.dropped_no_date, 1);
    }

    #[test]
    fn test_output_sorted_ascending() {
        let raw = as_map(json!({
            "b": { "date": "2025-09-29T12:00:00Z" },
            "a": { "date": "2025-09-29T08:00:00Z" },
            "c": { "date": "2025-09-29T10:00:00Z" }
        }));
        let (ms, _) = normalize(&raw);
        let ids: Vec<_> = ms.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn test_numeric_strings_coerced() {
        let raw = as_map(json!({
            "2025-09-29T10:00:00Z": {
                "estado": "13", "humedad": "61.5", "indice": 75, "temperatura": "29"
            }
        }));
        let (ms, _) = normalize(&raw);
        assert_eq!(ms[0].raw_state, Some(13));
        assert_eq!(ms[0].humidity, Some(61.5));
        assert_eq!(ms[0].temperature, Some(29.0));
    }

    #[test]
    fn test_empty_feed() {
        let (ms, report) = normalize(&Map::new());
        assert!(ms.is_empty());
        assert_eq!(report, NormalizeReport::default());
    }
}
