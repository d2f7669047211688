//! Robust trend estimation (Theil-Sen).
//!
//! The slope is the median of all pairwise slopes, so a single outlier year
//! cannot flip the trend. Quadratic in the number of points; budget series
//! have one point per year.

/// Median of a slice, `None` when empty. Non-finite values must be filtered
/// by the caller.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median pairwise slope `Δvalue / Δyear` over pairs of distinct years.
///
/// Returns `0.0` when fewer than two finite points remain or all points
/// share the same year. Input order does not matter.
pub fn theil_sen_slope(years: &[i32], values: &[f64]) -> f64 {
    let points: Vec<(f64, f64)> = years
        .iter()
        .zip(values)
        .filter(|(_, v)| v.is_finite())
        .map(|(y, v)| (f64::from(*y), *v))
        .collect();

    if points.len() < 2 {
        return 0.0;
    }

    let mut slopes = Vec::with_capacity(points.len() * (points.len() - 1) / 2);
    for (i, &(x_i, y_i)) in points.iter().enumerate() {
        for &(x_j, y_j) in &points[i + 1..] {
            let dx = x_j - x_i;
            if dx == 0.0 {
                continue;
            }
            slopes.push((y_j - y_i) / dx);
        }
    }

    median(&slopes).unwrap_or(0.0)
}
