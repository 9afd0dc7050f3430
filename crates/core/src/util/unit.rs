use derive_more::{Add, AddAssign, Display, Mul, Neg, Sub};
use serde::{Deserialize, Serialize};

/// A 2D point in Cartesian space. One unit is the distance between the
/// centers of two adjacent hexagons at the lowest level of the grid.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    Display,
    PartialEq,
    Neg,
    Add,
    Sub,
    Mul,
    AddAssign,
    Serialize,
    Deserialize,
)]
#[display(fmt = "({}, {})", "self.x", "self.y")]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point. Cheaper than the real
    /// distance, and just as good for comparisons.
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Distance from the origin
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }
}

impl From<nalgebra::Vector2<f64>> for Point2 {
    fn from(other: nalgebra::Vector2<f64>) -> Self {
        Self::new(other.x, other.y)
    }
}

impl From<Point2> for nalgebra::Vector2<f64> {
    fn from(other: Point2) -> Self {
        Self::new(other.x, other.y)
    }
}

/// A point in polar form. The angle is in radians, counter-clockwise from the
/// positive x axis, in the range `(-π, π]`.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Serialize)]
#[display(fmt = "{}∠{}", magnitude, angle)]
pub struct Polar {
    pub magnitude: f64,
    pub angle: f64,
}

impl From<Point2> for Polar {
    fn from(point: Point2) -> Self {
        Self {
            magnitude: point.magnitude(),
            angle: point.y.atan2(point.x),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_point_math() {
        let a = Point2::new(1.0, 2.0);
        let b = Point2::new(4.0, 6.0);
        assert_eq!(a + b, Point2::new(5.0, 8.0));
        assert_eq!(b - a, Point2::new(3.0, 4.0));
        assert_eq!(a * 2.0, Point2::new(2.0, 4.0));
        assert_eq!(a.distance_squared(b), 25.0);
        assert_eq!((b - a).magnitude(), 5.0);
    }

    #[test]
    fn test_polar() {
        let polar = Polar::from(Point2::new(0.0, 2.0));
        assert_approx_eq!(polar.magnitude, 2.0);
        assert_approx_eq!(polar.angle, FRAC_PI_2);
    }
}
