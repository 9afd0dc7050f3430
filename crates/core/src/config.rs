use crate::kernel::Kernel;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use validator::Validate;

/// Configuration that defines a hex grid and its lookup tables. Two grids
/// built from the same config will always be identical, so a grid only needs
/// to be rebuilt when this changes.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GridConfig {
    /// Number of levels in the grid. A grid of order `n` has `7^n` cells.
    /// Order 3 is 343 cells, order 6 is 117,649.
    #[validate(range(min = 3, max = 6))]
    pub order: u32,

    /// Size of one output pixel, in hex units (the distance between two
    /// adjacent cells at the lowest level). When converting from square to
    /// hex, one hex unit spans `1 / scale` source pixels. Smaller values mean
    /// a bigger output raster.
    #[validate(range(min = 0.001))]
    pub scale: f64,

    /// How far (in hex units, on each axis) a cell can be from an output
    /// pixel and still contribute to it. Anything above 1 widens the
    /// neighbor search from 7 cells to 49.
    #[validate(range(min = 0.0))]
    pub radius: f64,
}

impl GridConfig {
    /// Number of cells in the grid
    pub fn size(&self) -> usize {
        7usize.pow(self.order)
    }

    /// Number of cells in the grid plus one more ring of clusters around it,
    /// which is enough to hold every neighbor of every cell
    pub fn extended_size(&self) -> usize {
        self.size() * 7
    }

    /// Number of neighbor offsets checked around each output pixel
    pub fn neighbor_count(&self) -> usize {
        if self.radius > 1.0 {
            49
        } else {
            7
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            order: 5,
            scale: 1.0,
            radius: 1.0,
        }
    }
}

/// How the hex grid is presented in the output frame
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    Eq,
    PartialEq,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DisplayMode {
    /// Each cell is drawn as a single pixel at its display position, which
    /// shows the grid's structure directly
    Hexagonal,
    /// The cells are resampled back into a regular square image
    Square,
}

impl DisplayMode {
    /// Map a numeric flag onto a mode. 0 is hexagonal, anything else square.
    pub fn from_flag(flag: u32) -> Self {
        if flag == 0 {
            Self::Hexagonal
        } else {
            Self::Square
        }
    }
}

impl Default for DisplayMode {
    fn default() -> Self {
        Self::Square
    }
}

/// Everything needed to resample a frame. The grid portion determines the
/// lookup tables, the rest can change from frame to frame.
#[derive(
    Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize, Validate,
)]
#[serde(default)]
pub struct ResampleConfig {
    /// Interpolation kernel for both resampling passes
    pub kernel: Kernel,

    pub display_mode: DisplayMode,

    // Tables have to come last for TOML
    #[validate]
    pub grid: GridConfig,
}
