use anyhow::anyhow;
use derive_more::Display;
use std::{
    fmt::{Debug, Display},
    ops,
};

/// A type of value that we can create ranges of, where a range has a min and
/// max. Anything copyable, ordered, and subtractable qualifies, which covers
/// both the float ranges used for Cartesian bounds and the integer ranges used
/// for display bounds.
pub trait Rangeable:
    Copy + Debug + Display + PartialOrd + ops::Sub<Self, Output = Self>
{
}

impl<T> Rangeable for T where
    T: Copy + Debug + Display + PartialOrd + ops::Sub<T, Output = T>
{
}

/// A range between two numeric values, inclusive on both ends.
#[derive(Copy, Clone, Debug, PartialEq, Display)]
#[display(fmt = "[{}, {}]", min, max)]
pub struct NumRange<T: Rangeable> {
    pub min: T,
    pub max: T,
}

impl<T: Rangeable> NumRange<T> {
    pub const fn new(min: T, max: T) -> Self {
        Self { min, max }
    }

    /// A zero-width range that holds exactly one value. Useful as the starting
    /// point for [Self::include].
    pub const fn point(value: T) -> Self {
        Self::new(value, value)
    }

    /// Max minus min
    pub fn span(&self) -> T {
        self.max - self.min
    }

    /// Check if a value is in this range. Ranges are inclusive on both ends.
    pub fn contains(&self, value: T) -> bool {
        self.min <= value && value <= self.max
    }

    /// Checks if the value is in this range. If it isn't, return an error.
    pub fn ensure_contains(&self, value: T) -> anyhow::Result<()> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(anyhow!("value {} is not in range {}", value, self))
        }
    }

    /// Force a value into this range. If it's already in the range, return
    /// that value. If it's outside the range, return the bound (lower or upper)
    /// that's closest to the value.
    pub fn clamp(&self, value: T) -> T {
        if value < self.min {
            self.min
        } else if value > self.max {
            self.max
        } else {
            value
        }
    }

    /// Grow this range just enough that it contains the given value
    pub fn include(&mut self, value: T) {
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Apply a conversion to both ends of the range
    pub fn map<U: Rangeable>(self, f: impl Fn(T) -> U) -> NumRange<U> {
        NumRange::new(f(self.min), f(self.max))
    }
}

/// An axis-aligned bounding box, made up of one range per axis
#[derive(Copy, Clone, Debug, PartialEq, Display)]
#[display(fmt = "{} x {}", x, y)]
pub struct Bounds2<T: Rangeable> {
    pub x: NumRange<T>,
    pub y: NumRange<T>,
}

impl<T: Rangeable> Bounds2<T> {
    /// A zero-size box around a single point
    pub const fn point(x: T, y: T) -> Self {
        Self {
            x: NumRange::point(x),
            y: NumRange::point(y),
        }
    }

    /// Grow this box just enough that it contains the given point
    pub fn include(&mut self, x: T, y: T) {
        self.x.include(x);
        self.y.include(y);
    }

    /// Apply a conversion to all four bounds
    pub fn map<U: Rangeable>(self, f: impl Fn(T) -> U) -> Bounds2<U> {
        Bounds2 {
            x: self.x.map(&f),
            y: self.y.map(&f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp() {
        let range = NumRange::new(0.0, 255.0);
        assert_eq!(range.clamp(-3.0), 0.0);
        assert_eq!(range.clamp(17.5), 17.5);
        assert_eq!(range.clamp(300.0), 255.0);
    }

    #[test]
    fn test_ensure_contains() {
        let range = NumRange::new(3, 6);
        assert!(range.ensure_contains(3).is_ok());
        assert!(range.ensure_contains(6).is_ok());
        let err = range.ensure_contains(7).unwrap_err();
        assert_eq!(err.to_string(), "value 7 is not in range [3, 6]");
    }

    #[test]
    fn test_include() {
        let mut bounds = Bounds2::point(0, 0);
        bounds.include(3, -2);
        bounds.include(-1, 5);
        assert_eq!(bounds.x, NumRange::new(-1, 3));
        assert_eq!(bounds.y, NumRange::new(-2, 5));
        assert_eq!(bounds.x.span(), 4);
        assert_eq!(bounds.to_string(), "[-1, 3] x [-2, 5]");
    }
}
