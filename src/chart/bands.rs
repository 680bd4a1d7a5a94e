use serde::{Deserialize, Serialize};

/// A contiguous background segment sharing one system-state color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateBand {
    pub x: f64,
    pub width: f64,
    pub color: String,
}

/// Merge per-interval background colors into the minimal run-length
/// encoded band list.
///
/// Each interval between consecutive points takes the color of its
/// *starting* point; adjacent intervals with the same color collapse into
/// one band. Concatenating the result reproduces the exact per-interval
/// coloring. Fewer than two points produce no intervals.
pub fn merge_state_bands(points: &[(f64, &str)]) -> Vec<StateBand> {
    let mut bands = Vec::new();
    if points.len() < 2 {
        return bands;
    }

    let mut current = StateBand {
        x: points[0].0,
        width: 0.0,
        color: points[0].1.to_string(),
    };

    for pair in points.windows(2) {
        let (x, color) = pair[0];
        let next_x = pair[1].0;
        let w = next_x - x;

        if color == current.color {
            current.width += w;
        } else {
            if current.width > 0.0 {
                bands.push(current);
            }
            current = StateBand {
                x,
                width: w,
                color: color.to_string(),
            };
        }
    }

    if current.width > 0.0 {
        bands.push(current);
    }

    bands
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alternating_runs_merge() {
        // Six intervals colored A,A,B,B,B,A collapse into three bands.
        let points = vec![
            (0.0, "A"),
            (10.0, "A"),
            (20.0, "B"),
            (30.0, "B"),
            (40.0, "B"),
            (50.0, "A"),
            (60.0, "A"),
        ];
        let bands = merge_state_bands(&points);
        assert_eq!(bands.len(), 3);
        assert_eq!(bands[0], StateBand { x: 0.0, width: 20.0, color: "A".into() });
        assert_eq!(bands[1], StateBand { x: 20.0, width: 30.0, color: "B".into() });
        assert_eq!(bands[2], StateBand { x: 50.0, width: 10.0, color: "A".into() });

        // Total band width equals total interval width.
        let total: f64 = bands.iter().map(|b| b.width).sum();
        assert_eq!(total, 60.0);
    }

    #[test]
    fn test_single_color_single_band() {
        let points = vec![(0.0, "A"), (5.0, "A"), (12.0, "A")];
        let bands = merge_state_bands(&points);
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].x, 0.0);
        assert_eq!(bands[0].width, 12.0);
    }

    #[test]
    fn test_interval_color_comes_from_start_point() {
        // The last point's color never opens an interval of its own.
        let points = vec![(0.0, "A"), (10.0, "B")];
        let bands = merge_state_bands(&points);
        assert_eq!(bands.len(), 1);
        assert_eq!(bands[0].color, "A");
    }

    #[test]
    fn test_too_few_points() {
        assert!(merge_state_bands(&[]).is_empty());
        assert!(merge_state_bands(&[(0.0, "A")]).is_empty());
    }

    #[test]
    fn test_uneven_spacing_preserves_coverage() {
        let points = vec![(0.0, "A"), (3.0, "B"), (4.0, "B"), (9.5, "A"), (11.0, "A")];
        let bands = merge_state_bands(&points);
        let total: f64 = bands.iter().map(|b| b.width).sum();
        assert!((total - 11.0).abs() < 1e-9);
        // Bands tile the x range without gaps.
        let mut cursor = 0.0;
        for band in &bands {
            assert!((band.x - cursor).abs() < 1e-9);
            cursor += band.width;
        }
    }
}
