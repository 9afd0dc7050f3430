//! Interpolation kernels used by both resampling passes.

use log::warn;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use strum::{Display, EnumIter, EnumString};

/// A separable 2D weighting function. Every kernel is built from a 1D profile
/// `f`, with `weight(x, y) = f(x) * f(y)`. All profiles peak at `f(0) = 1`,
/// are never negative, and are zero for `|t| >= 1`.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Eq,
    PartialEq,
    Hash,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Kernel {
    /// Tent function, `1 - |t|`
    Linear,
    /// Smoothstep-shaped cubic, `2|t|³ - 3t² + 1`. Flat at both the peak and
    /// the edge of the support.
    Cubic,
    /// Sinc windowed by a wider sinc, truncated to `|t| < 1`
    Lanczos,
    /// Cubic B-spline, squeezed so its support of 2 fits into `|t| < 1`
    BSpline,
}

impl Kernel {
    /// Map a numeric technique code onto a kernel. `0`, `1`, and `2` are
    /// linear, cubic, and Lanczos respectively. Everything else is B-spline,
    /// with a warning for anything other than `3`.
    pub fn from_technique(technique: u32) -> Self {
        match technique {
            0 => Self::Linear,
            1 => Self::Cubic,
            2 => Self::Lanczos,
            3 => Self::BSpline,
            _ => {
                warn!(
                    "Unknown interpolation technique {}, using {}",
                    technique,
                    Self::BSpline
                );
                Self::BSpline
            }
        }
    }

    /// The numeric code for this kernel. Inverse of [Self::from_technique].
    pub fn technique(self) -> u32 {
        match self {
            Self::Linear => 0,
            Self::Cubic => 1,
            Self::Lanczos => 2,
            Self::BSpline => 3,
        }
    }

    /// Evaluate the 1D profile at `t`
    pub fn profile(self, t: f64) -> f64 {
        let t = t.abs();
        if t >= 1.0 {
            return 0.0;
        }

        match self {
            Self::Linear => 1.0 - t,
            Self::Cubic => 2.0 * t.powi(3) - 3.0 * t.powi(2) + 1.0,
            Self::Lanczos => sinc(t) * sinc(t / 2.0),
            Self::BSpline => {
                // Standard B-spline is defined over [0, 2) and peaks at 2/3.
                // Stretch the input and scale the output to fit our support.
                let a = 2.0 * t;
                let b_spline = if a < 1.0 {
                    (3.0 * a.powi(3) - 6.0 * a.powi(2) + 4.0) / 6.0
                } else {
                    (-a.powi(3) + 6.0 * a.powi(2) - 12.0 * a + 8.0) / 6.0
                };
                b_spline * 1.5
            }
        }
    }

    /// Evaluate the 2D kernel at offset `(x, y)` from the sample point
    pub fn weight(self, x: f64, y: f64) -> f64 {
        self.profile(x) * self.profile(y)
    }
}

impl Default for Kernel {
    fn default() -> Self {
        Self::Linear
    }
}

/// Normalized sinc, `sin(πx) / πx`
fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        (PI * x).sin() / (PI * x)
    }
}
