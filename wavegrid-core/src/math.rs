//! Scalar helpers shared by the updater and the scene

/// Affinely remap `x` from `[a1, a2]` to `[b1, b2]`.
///
/// The result is not clamped; values outside the source interval extrapolate.
#[inline]
pub fn linear_map(x: f64, a1: f64, a2: f64, b1: f64, b2: f64) -> f64 {
    b1 + (x - a1) * (b2 - b1) / (a2 - a1)
}

/// Euclidean distance between `(x1, y1)` and `(x2, y2)`
#[inline]
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    ((x1 - x2).powi(2) + (y1 - y2).powi(2)).sqrt()
}
