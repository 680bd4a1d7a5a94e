pub mod bands;
pub mod downsample;
pub mod scale;
pub mod ticks;

pub use bands::{merge_state_bands, StateBand};
pub use downsample::downsample;
pub use scale::{LinearScale, TimeScale};
pub use ticks::{x_ticks, XTick, RIGHT_AXIS_TICKS, TEMP_TICKS};

use serde::{Deserialize, Serialize};

use crate::measurement::Measurement;

/// Target pixel area and zoom multiplier for the chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChartViewport {
    pub width: f64,
    pub height: f64,
    pub zoom: f64,
}

impl ChartViewport {
    /// Horizontal zoom stretches the drawable width.
    pub fn effective_width(&self) -> f64 {
        self.width * self.zoom
    }
}

/// One plotted vertex: shared x, one y per series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: f64,
    pub y_temp: f64,
    pub y_humidity: f64,
    pub y_ith: f64,
    /// Index into the series the geometry was built from.
    pub index: usize,
}

/// Ordered polyline vertices; the first is a move, the rest are line-tos.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<(f64, f64)>,
}

impl Polyline {
    /// SVG path-data encoding ("M x y L x y ...").
    pub fn path_data(&self) -> String {
        let mut d = String::new();
        for (i, (x, y)) in self.points.iter().enumerate() {
            if i == 0 {
                d.push_str(&format!("M {} {}", x, y));
            } else {
                d.push_str(&format!(" L {} {}", x, y));
            }
        }
        d
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YTick {
    pub value: f64,
    pub y: f64,
}

/// Rendering-ready chart geometry: no drawing happens here, only
/// coordinates, runs and labels for the UI layer to paint.
#[derive(Debug, Clone)]
pub struct ChartGeometry {
    pub points: Vec<ChartPoint>,
    pub temp_path: Polyline,
    pub humidity_path: Polyline,
    pub ith_path: Polyline,
    pub state_bands: Vec<StateBand>,
    pub x_ticks: Vec<XTick>,
    pub y_temp_ticks: Vec<YTick>,
    pub y_right_ticks: Vec<YTick>,
    pub temp_scale: LinearScale,
    pub right_scale: LinearScale,
    pub time_scale: TimeScale,
}

impl ChartGeometry {
    /// Build geometry for a chronologically sorted series. Readings with
    /// missing or non-finite values are skipped. Returns `None` when
    /// nothing is plottable.
    pub fn build(series: &[Measurement], viewport: &ChartViewport) -> Option<Self> {
        let plottable: Vec<&Measurement> =
            series.iter().filter(|m| m.is_chartable()).collect();
        if plottable.is_empty() {
            return None;
        }

        let width = viewport.effective_width();
        let height = viewport.height;

        let temp_scale = LinearScale::temperature(height);
        let right_scale = LinearScale::right_axis(height);
        let first = plottable.first().unwrap().timestamp;
        let last = plottable.last().unwrap().timestamp;
        let time_scale = TimeScale::new(first, last, width);

        let mut points = Vec::with_capacity(plottable.len());
        let mut temp_path = Polyline::default();
        let mut humidity_path = Polyline::default();
        let mut ith_path = Polyline::default();

        for (index, m) in plottable.iter().enumerate() {
            let x = time_scale.apply(m.timestamp);
            // is_chartable guarantees the values are present and finite
            let y_temp = temp_scale.apply(m.temperature.unwrap_or_default());
            let y_humidity = right_scale.apply(m.humidity.unwrap_or_default());
            let y_ith = right_scale.apply(m.ith_index.unwrap_or_default());

            temp_path.points.push((x, y_temp));
            humidity_path.points.push((x, y_humidity));
            ith_path.points.push((x, y_ith));
            points.push(ChartPoint {
                x,
                y_temp,
                y_humidity,
                y_ith,
                index,
            });
        }

        let band_input: Vec<(f64, &str)> = plottable
            .iter()
            .zip(points.iter())
            .map(|(m, p)| {
                let color = m.mode().map(|mode| mode.band_color()).unwrap_or("transparent");
                (p.x, color)
            })
            .collect();
        let state_bands = merge_state_bands(&band_input);

        let x_ticks = x_ticks(first, last, width, viewport.zoom);
        let y_temp_ticks = TEMP_TICKS
            .iter()
            .map(|&value| YTick {
                value,
                y: temp_scale.apply(value),
            })
            .collect();
        let y_right_ticks = RIGHT_AXIS_TICKS
            .iter()
            .map(|&value| YTick {
                value,
                y: right_scale.apply(value),
            })
            .collect();

        Some(Self {
            points,
            temp_path,
            humidity_path,
            ith_path,
            state_bands,
            x_ticks,
            y_temp_ticks,
            y_right_ticks,
            temp_scale,
            right_scale,
            time_scale,
        })
    }

    /// Nearest vertex by horizontal distance to a pointer x-coordinate.
    /// No match unless the distance is under `hit_radius` pixels.
    pub fn nearest_point(&self, pointer_x: f64, hit_radius: f64) -> Option<&ChartPoint> {
        let nearest = self.points.iter().min_by(|a, b| {
            (a.x - pointer_x)
                .abs()
                .total_cmp(&(b.x - pointer_x).abs())
        })?;
        if (nearest.x - pointer_x).abs() < hit_radius {
            Some(nearest)
        } else {
            None
        }
    }
}
