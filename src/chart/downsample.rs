/// Reduce a series to at most `budget` representative points.
///
/// Keeps every Nth point with `N = ceil(len / budget)`, always starting
/// with the first point, preserving order. Running it again on its own
/// output is a no-op.
pub fn downsample<T: Clone>(series: &[T], budget: usize) -> Vec<T> {
    if budget == 0 || series.is_empty() {
        return Vec::new();
    }
    if series.len() <= budget {
        return series.to_vec();
    }
    let stride = series.len().div_ceil(budget);
    series
        .iter()
        .step_by(stride)
        .cloned()
        .collect()
}
