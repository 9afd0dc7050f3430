//! Hexsamp resamples square-pixel images onto a hierarchical hexagonal grid,
//! and back again. The grid is an aperture-7 tiling: each cell is a cluster of
//! seven smaller cells, all the way down. See [hex] for how cells are
//! addressed.
//!
//! ```no_run
//! use hexsamp::{DisplayMode, GridConfig, Kernel, Resampler};
//!
//! let mut resampler = Resampler::new(GridConfig::default(), 640, 480)?;
//! let src = vec![0u8; 640 * 480 * 3];
//! let mut dst = vec![0u8; 640 * 480 * 3];
//! resampler.process(
//!     &src,
//!     640,
//!     480,
//!     &mut dst,
//!     Kernel::Cubic,
//!     DisplayMode::Square,
//! )?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! Building a [Resampler] precomputes every lookup table for the grid, which
//! can take a while for larger orders. Processing frames after that is cheap.

mod config;
mod grid;
pub mod hex;
mod kernel;
pub mod resample;
mod util;

pub use crate::{
    config::{DisplayMode, GridConfig, ResampleConfig},
    grid::HexGrid,
    hex::HexAddress,
    kernel::Kernel,
    resample::Resampler,
    util::{
        range::{Bounds2, NumRange},
        unit::{Point2, Polar},
    },
};
