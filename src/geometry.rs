//! Geometry primitives and the pure helpers the gesture engine is built on.
//!
//! Everything here is side-effect free. Angles are in degrees at the API
//! boundary; [`angle_components`] converts once so callers can reuse the
//! cosine/sine pair for both bounding-box and point rotation.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A point or offset in 2D space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// The origin / zero offset.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length of this point taken as an offset.
    #[must_use]
    pub fn distance(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Whether both components are exactly zero.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Point {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

/// A width/height pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Zero size, used as "not measured yet".
    pub const ZERO: Self = Self { width: 0.0, height: 0.0 };

    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Half of this size, per axis.
    #[must_use]
    pub fn half(self) -> Self {
        self.scale(0.5)
    }

    /// Both axes multiplied by `factor`.
    #[must_use]
    pub fn scale(self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }

    /// Both axes grown by `amount`.
    #[must_use]
    pub fn inflate(self, amount: f64) -> Self {
        Self::new(self.width + amount, self.height + amount)
    }

    /// The center point of a box with this size anchored at the origin.
    #[must_use]
    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// The shorter of the two dimensions.
    #[must_use]
    pub fn min_dimension(self) -> f64 {
        self.width.min(self.height)
    }
}

/// Which corner region of an item a point falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    /// Top-left handle: remove control.
    TopStart,
    /// Top-right handle: optional host control.
    TopEnd,
    /// Bottom-left handle: optional host control.
    BottomStart,
    /// Bottom-right handle: rotate and zoom.
    BottomEnd,
    /// Anywhere outside the four corner regions.
    Other,
}

/// Axis-aligned bounding size of a `width × height` rectangle rotated by the
/// angle whose cosine and sine are given.
#[must_use]
pub fn rotated_bounding_size(width: f64, height: f64, cos: f64, sin: f64) -> Size {
    let cos = cos.abs();
    let sin = sin.abs();
    Size::new(width * cos + height * sin, width * sin + height * cos)
}

/// Apply the 2D rotation matrix for `(cos, sin)` to `offset`.
#[must_use]
pub fn rotate_point(offset: Point, cos: f64, sin: f64) -> Point {
    Point::new(offset.x * cos - offset.y * sin, offset.x * sin + offset.y * cos)
}

/// Cosine and sine of an angle given in degrees.
#[must_use]
pub fn angle_components(degrees: f64) -> (f64, f64) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    (cos, sin)
}

/// Fold an angular difference in degrees into `(-180, 180]`.
#[must_use]
pub fn normalize_degrees(diff: f64) -> f64 {
    let mut diff = diff % 360.0;
    if diff > 180.0 {
        diff -= 360.0;
    } else if diff <= -180.0 {
        diff += 360.0;
    }
    diff
}

/// Classify `point` (local to a box of `size` anchored at the origin) into a
/// corner region.
///
/// A point is in a corner when it lies within `threshold` of both edges that
/// meet there. `threshold` must stay below half of `size.min_dimension()`;
/// larger values make the regions overlap and are rejected at configuration
/// time (see [`crate::error::TouchError::HandleOverlap`]).
#[must_use]
pub fn classify_corner(point: Point, size: Size, threshold: f64) -> Corner {
    let left = point.x <= threshold;
    let right = point.x >= size.width - threshold;
    let top = point.y <= threshold;
    let bottom = point.y >= size.height - threshold;
    match (left, right, top, bottom) {
        (true, _, true, _) => Corner::TopStart,
        (_, true, true, _) => Corner::TopEnd,
        (true, _, _, true) => Corner::BottomStart,
        (_, true, _, true) => Corner::BottomEnd,
        _ => Corner::Other,
    }
}

/// Clamp `value` into `[min, max]` without panicking when the span is
/// inverted; the lower bound wins in that case.
#[must_use]
pub fn clamp_span(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}
