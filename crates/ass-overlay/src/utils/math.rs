//! Math utilities for interpolation and geometry

/// Linear interpolation
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (b - a).mul_add(t, a)
}

/// Fraction of `value` between `start` and `end`, clamped to `0.0..=1.0`
///
/// A zero-length window counts as already finished.
#[must_use]
pub fn progress(value: f64, start: f64, end: f64) -> f64 {
    if end <= start {
        return if value < start { 0.0 } else { 1.0 };
    }
    ((value - start) / (end - start)).clamp(0.0, 1.0)
}

/// Compare two floats with the tolerance used for frame-level change detection
#[must_use]
pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

/// Axis-aligned rectangle in script pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a rectangle
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Smallest rectangle containing both
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let left = self.x.min(other.x);
        let top = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Self::new(left, top, right - left, bottom - top)
    }

    /// Grow every side by `amount`
    #[must_use]
    pub fn inflate(&self, amount: f64) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            2.0f64.mul_add(amount, self.width),
            2.0f64.mul_add(amount, self.height),
        )
    }
}
