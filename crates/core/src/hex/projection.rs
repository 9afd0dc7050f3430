//! Projections from hex addresses into 2D space, and back again via
//! [HexAddress::nearest].

use crate::{
    hex::HexAddress,
    util::unit::{Point2, Polar},
};
use nalgebra::{Matrix2, Matrix2x3, Matrix3, Vector2, Vector3};

const HALF_SQRT_3: f64 = 0.866_025_403_784_438_6;
const SQRT_3: f64 = 2.0 * HALF_SQRT_3;

/// Cartesian offset of each single-digit address at the lowest level, indexed
/// by digit. These double as complex-number rotations, since direction `d` is
/// direction 1 rotated by `(d - 1) * 60°`.
const UNIT_VECTORS: [Point2; 7] = [
    Point2::new(0.0, 0.0),
    Point2::new(1.0, 0.0),
    Point2::new(0.5, HALF_SQRT_3),
    Point2::new(-0.5, HALF_SQRT_3),
    Point2::new(-1.0, 0.0),
    Point2::new(-0.5, -HALF_SQRT_3),
    Point2::new(0.5, -HALF_SQRT_3),
];

impl HexAddress {
    /// Get the true geometric position of this cell's center. Neighboring
    /// cells at the lowest level are exactly 1 unit apart. Each level up, the
    /// basis grows by √7 and rotates by `atan(√3/2)`.
    pub fn to_cartesian(self) -> Point2 {
        let level_step = Matrix2::new(2.0, -SQRT_3, SQRT_3, 2.0);
        let mut basis = Vector2::new(1.0, 0.0);
        let mut position: Vector2<f64> = Vector2::zeros();
        for (level, digit) in self.digits().enumerate() {
            if level > 0 {
                basis = level_step * basis;
            }
            if digit != 0 {
                position += rotation(digit) * basis;
            }
        }
        position.into()
    }

    /// [Self::to_cartesian], in polar form. The origin maps to magnitude and
    /// angle both 0.
    pub fn to_polar(self) -> Polar {
        self.to_cartesian().into()
    }

    /// Get this cell's position in the display layout. This is **not** a true
    /// geometric position. It comes from a redundant 3-axis representation
    /// that keeps every cell on integer coordinates, which makes it suitable
    /// for packing cells into a pixel raster. Adjacent lowest-level cells are
    /// at most one step apart on each axis.
    pub fn to_display(self) -> Point2 {
        let level_step = Matrix3::new(
            4.0, -5.0, 1.0, //
            1.0, 4.0, -5.0, //
            -5.0, 1.0, 4.0,
        ) / 3.0;
        let projection =
            Matrix2x3::new(1.0, 1.0, -2.0, -1.0, 2.0, -1.0) / 3.0;

        let mut basis = Vector3::new(1.0, 0.0, -1.0);
        let mut position: Vector3<f64> = Vector3::zeros();
        for (level, digit) in self.digits().enumerate() {
            if level > 0 {
                basis = level_step * basis;
            }
            if digit == 0 {
                continue;
            }
            // Digits cycle through the three axes, alternating sign
            let turn = (digit - 1) as usize;
            let mut offset = basis;
            for _ in 0..(turn % 3) {
                offset = Vector3::new(offset.y, offset.z, offset.x);
            }
            if turn % 2 == 0 {
                position += offset;
            } else {
                position -= offset;
            }
        }

        let projected = projection * position;
        // Everything lands on integers, modulo float error from the thirds
        Point2::new(projected.x.round(), projected.y.round())
    }

    /// Find the address of the cell whose center is closest to the given
    /// point. See [Self::nearest].
    pub fn nearest_xy(x: f64, y: f64) -> Self {
        Self::nearest(Point2::new(x, y))
    }

    /// Find the address of the cell whose center is closest to the given
    /// point. The point is broken down along two lattice axes (60° apart),
    /// the whole steps along each axis are taken with scalar multiplication,
    /// then the leftover fractional offset snaps to whichever of the four
    /// surrounding lattice points is closest.
    pub fn nearest(point: Point2) -> Self {
        let r1 = point.x - point.y / SQRT_3;
        let r2 = 2.0 * point.y / SQRT_3;

        let dir1: u8 = if r1 >= 0.0 { 1 } else { 4 };
        let dir2: u8 = if r2 >= 0.0 { 2 } else { 5 };
        let (steps1, frac1) = split(r1.abs());
        let (steps2, frac2) = split(r2.abs());

        let u1 = UNIT_VECTORS[dir1 as usize];
        let u2 = UNIT_VECTORS[dir2 as usize];
        let remainder = u1 * frac1 + u2 * frac2;

        let a1 = Self::from_packed_unchecked(dir1 as u64);
        let a2 = Self::from_packed_unchecked(dir2 as u64);
        let corners = [
            (Point2::ORIGIN, Self::ORIGIN),
            (u1, a1),
            (u2, a2),
            (u1 + u2, a1 + a2),
        ];
        let mut correction = Self::ORIGIN;
        let mut best = f64::INFINITY;
        for (corner, address) in corners {
            let distance = remainder.distance_squared(corner);
            if distance < best {
                best = distance;
                correction = address;
            }
        }

        a1 * steps1 + a2 * steps2 + correction
    }
}

/// Rotation matrix for the given direction digit. Rotating a vector by this
/// is the same as complex multiplication by the digit's unit vector.
fn rotation(digit: u8) -> Matrix2<f64> {
    let unit = UNIT_VECTORS[digit as usize];
    Matrix2::new(unit.x, -unit.y, unit.y, unit.x)
}

/// Split a non-negative value into whole and fractional parts
fn split(value: f64) -> (i64, f64) {
    let whole = value.trunc();
    (whole as i64, value - whole)
}
