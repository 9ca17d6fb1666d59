//! Core traits for wavegrid

/// Elements whose vertical offset the wave updater may drive.
///
/// The updater never owns grid elements; it only reads and writes this one
/// coordinate.
pub trait VerticalOffset {
    /// Current vertical offset
    fn vertical_offset(&self) -> f64;

    /// Replace the vertical offset
    fn set_vertical_offset(&mut self, y: f64);
}

impl VerticalOffset for f64 {
    fn vertical_offset(&self) -> f64 {
        *self
    }

    fn set_vertical_offset(&mut self, y: f64) {
        *self = y;
    }
}

impl VerticalOffset for f32 {
    fn vertical_offset(&self) -> f64 {
        *self as f64
    }

    fn set_vertical_offset(&mut self, y: f64) {
        *self = y as f32;
    }
}

/// A read-only 2D scalar field sampled by the wave updater.
///
/// Implementations must be deterministic: the same `(x, y)` always yields the
/// same value for the lifetime of the field.
pub trait NoiseField {
    /// Sample the field, roughly in `[-1, 1]`
    fn sample(&self, x: f64, y: f64) -> f64;
}

impl<F> NoiseField for F
where
    F: Fn(f64, f64) -> f64,
{
    fn sample(&self, x: f64, y: f64) -> f64 {
        self(x, y)
    }
}
