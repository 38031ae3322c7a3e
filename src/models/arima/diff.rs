//! Differencing and its inverses.

/// Apply `d` passes of first differencing.
///
/// Each pass maps `x[i] - x[i-1]` and drops the undefined first element, so
/// the result is `d` elements shorter (empty once the series runs out).
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.is_empty() {
            break;
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Rebuild a series from its first value and first differences.
///
/// Inverse of `difference(series, 1)`: `undifference(s[0], &difference(s, 1)) == s`.
pub fn undifference(first: f64, diffs: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(diffs.len() + 1);
    let mut level = first;
    out.push(level);
    for &step in diffs {
        level += step;
        out.push(level);
    }
    out
}

/// Continue a series on its original scale from values forecast at difference order `d`.
///
/// # Arguments
/// * `differenced` - Values following the end of the `d`-times differenced series
/// * `original` - The observed series the differences were taken from
/// * `d` - Differencing order
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    let mut result = differenced.to_vec();

    for level in (0..d).rev() {
        let anchor = difference(original, level).last().copied().unwrap_or(0.0);
        let mut running = anchor;
        for value in result.iter_mut() {
            running += *value;
            *value = running;
        }
    }

    result
}
