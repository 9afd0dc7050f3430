//! Precomputed lookup tables for a hex grid. Building these is expensive,
//! but once they exist, neither resampling pass needs to touch any address
//! arithmetic.

use crate::{
    config::GridConfig,
    hex::HexAddress,
    timed,
    util::{
        range::{Bounds2, NumRange},
        try_alloc,
        unit::Point2,
    },
};
use anyhow::{anyhow, Context};
use log::{debug, info};
use validator::Validate;

/// All the lookup tables for a single grid configuration. Tables are indexed
/// by linear hex index (see [HexAddress::to_index]) unless noted otherwise.
#[derive(Clone, Debug)]
pub struct HexGrid {
    config: GridConfig,

    /// Cartesian position of every cell in the extended grid
    cartesian: Vec<Point2>,
    /// Bounding box of the cartesian positions of the regular grid (not the
    /// extended portion), rounded to whole units
    cartesian_bounds: Bounds2<f64>,

    /// Display position of every cell in the regular grid. Always
    /// non-negative, with y pointing down.
    display: Vec<(u32, u32)>,
    /// Bounding box of [Self::display]. Minimum is always `(0, 0)`.
    display_bounds: Bounds2<i64>,

    /// Output raster dimensions, `(width, height)`
    raster_size: (usize, usize),
    /// Index of the cell nearest to each output raster pixel, row-major with
    /// row 0 at the **bottom** of the grid
    nearest: Vec<u32>,

    /// Offsets checked around each cell, i.e. the width of each row in
    /// [Self::neighbors]
    neighbor_count: usize,
    /// For every extended cell `i`, the indexes of `i + j` for each offset
    /// `j` in `[0, neighbor_count)`. Flattened, row-major.
    neighbors: Vec<u32>,
}

impl HexGrid {
    /// Build all lookup tables for the given config. This is slow for larger
    /// orders, so it should only happen when the config changes. Fails if the
    /// config is invalid, or if any of the tables can't be allocated.
    pub fn new(config: &GridConfig) -> anyhow::Result<Self> {
        config.validate().context("invalid grid config")?;
        info!(
            "Building order {} hex grid ({} cells, scale {}, radius {})",
            config.order,
            config.size(),
            config.scale,
            config.radius
        );

        let (cartesian, cartesian_bounds) = timed!(
            "Cartesian positions",
            build_cartesian(config)
        )?;
        debug!("Cartesian bounds: {}", cartesian_bounds);

        let (display, display_bounds) =
            timed!("Display positions", build_display(config))?;
        debug!("Display bounds: {}", display_bounds);

        let raster_size = raster_size(&cartesian_bounds, config.scale)?;
        debug!("Output raster: {}x{}", raster_size.0, raster_size.1);
        let nearest = timed!(
            "Nearest cell lookup",
            build_nearest(&cartesian_bounds, raster_size, config.scale)
        )?;

        let neighbor_count = config.neighbor_count();
        let neighbors = timed!(
            "Neighbor lookup",
            build_neighbors(config.extended_size(), neighbor_count)
        )?;
        debug!(
            "Neighbor table: {} cells x {} offsets",
            config.extended_size(),
            neighbor_count
        );

        Ok(Self {
            config: *config,
            cartesian,
            cartesian_bounds,
            display,
            display_bounds,
            raster_size,
            nearest,
            neighbor_count,
            neighbors,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn order(&self) -> u32 {
        self.config.order
    }

    /// Number of cells in the (non-extended) grid
    pub fn size(&self) -> usize {
        self.display.len()
    }

    pub fn scale(&self) -> f64 {
        self.config.scale
    }

    pub fn radius(&self) -> f64 {
        self.config.radius
    }

    pub fn neighbor_count(&self) -> usize {
        self.neighbor_count
    }

    /// Cartesian position of the given cell. Works for any index in the
    /// extended grid.
    pub fn cartesian(&self, index: usize) -> Point2 {
        self.cartesian[index]
    }

    /// Bounding box of all cells in the grid, rounded to whole units
    pub fn cartesian_bounds(&self) -> Bounds2<f64> {
        self.cartesian_bounds
    }

    /// Display position of the given cell, as `(x, y)` with y pointing down
    pub fn display(&self, index: usize) -> (u32, u32) {
        self.display[index]
    }

    /// Dimensions of the display layout, `(width, height)`
    pub fn display_size(&self) -> (usize, usize) {
        (
            self.display_bounds.x.span() as usize + 1,
            self.display_bounds.y.span() as usize + 1,
        )
    }

    /// Dimensions of the square raster that [crate::resample::hex_to_square]
    /// produces, `(width, height)`
    pub fn raster_size(&self) -> (usize, usize) {
        self.raster_size
    }

    /// Get the point in hex space sampled by a raster pixel. Row 0 is the
    /// bottom of the grid.
    pub fn raster_point(&self, x: usize, y: usize) -> Point2 {
        Point2::new(
            self.cartesian_bounds.x.min + x as f64 * self.config.scale,
            self.cartesian_bounds.y.min + y as f64 * self.config.scale,
        )
    }

    /// Index of the cell nearest to a raster pixel. Row 0 is the bottom of
    /// the grid. Panics if the pixel is outside the raster.
    pub fn nearest_index(&self, x: usize, y: usize) -> usize {
        self.nearest[y * self.raster_size.0 + x] as usize
    }

    /// Indexes of the cells around the given cell, starting with the cell
    /// itself. Any of these may fall outside the non-extended grid. Returns
    /// an empty slice for cells beyond the extended grid.
    pub fn neighbors(&self, index: usize) -> &[u32] {
        index
            .checked_mul(self.neighbor_count)
            .and_then(|start| {
                let end = start.checked_add(self.neighbor_count)?;
                self.neighbors.get(start..end)
            })
            .unwrap_or(&[])
    }
}

fn build_cartesian(
    config: &GridConfig,
) -> anyhow::Result<(Vec<Point2>, Bounds2<f64>)> {
    let mut cartesian = try_alloc(config.extended_size(), "cartesian table")?;
    let mut bounds = Bounds2::point(0.0, 0.0);
    for index in 0..config.extended_size() {
        let position = HexAddress::from_index(index)?.to_cartesian();
        if index < config.size() {
            bounds.include(position.x, position.y);
        }
        cartesian.push(position);
    }
    Ok((cartesian, bounds.map(f64::round)))
}

fn build_display(
    config: &GridConfig,
) -> anyhow::Result<(Vec<(u32, u32)>, Bounds2<i64>)> {
    let mut raw: Vec<(i64, i64)> = try_alloc(config.size(), "display table")?;
    let mut bounds = Bounds2::point(0, 0);
    for index in 0..config.size() {
        let position = HexAddress::from_index(index)?.to_display();
        let (x, y) = deskew(position.x as i64, position.y as i64);
        bounds.include(x, y);
        raw.push((x, y));
    }

    // Shift so the minimum is at the origin, and flip so y points down
    let mut display = try_alloc(config.size(), "display table")?;
    let mut shifted_bounds = Bounds2::point(0, 0);
    for (x, y) in raw {
        let x = x - bounds.x.min;
        let y = bounds.y.max - y;
        shifted_bounds.include(x, y);
        display.push((
            u32::try_from(x).context("display x out of range")?,
            u32::try_from(y).context("display y out of range")?,
        ));
    }
    Ok((display, shifted_bounds))
}

/// Display positions come out skewed, with each row offset from the one
/// below it. Pull the rows back into a rectangle.
fn deskew(x: i64, y: i64) -> (i64, i64) {
    let shift = if y > 1 {
        ((y - 1) as f64 / 2.0).round() as i64
    } else if y < 0 {
        (y as f64 / 2.0).round() as i64
    } else {
        0
    };
    (x - shift, y)
}

fn raster_size(
    bounds: &Bounds2<f64>,
    scale: f64,
) -> anyhow::Result<(usize, usize)> {
    let dim =
        |range: NumRange<f64>| (range.span() / scale).round() as usize + 1;
    let size = (dim(bounds.x), dim(bounds.y));
    match size.0.checked_mul(size.1) {
        Some(_) => Ok(size),
        None => Err(anyhow!(
            "output raster {}x{} is too large",
            size.0,
            size.1
        )),
    }
}

fn build_nearest(
    bounds: &Bounds2<f64>,
    (width, height): (usize, usize),
    scale: f64,
) -> anyhow::Result<Vec<u32>> {
    let mut nearest = try_alloc(width * height, "nearest cell table")?;
    for y in 0..height {
        for x in 0..width {
            let address = HexAddress::nearest_xy(
                bounds.x.min + x as f64 * scale,
                bounds.y.min + y as f64 * scale,
            );
            nearest.push(u32::try_from(address.to_index()).with_context(
                || format!("nearest cell {} has no 32-bit index", address),
            )?);
        }
    }
    Ok(nearest)
}

fn build_neighbors(
    extended_size: usize,
    neighbor_count: usize,
) -> anyhow::Result<Vec<u32>> {
    let len = extended_size
        .checked_mul(neighbor_count)
        .ok_or_else(|| anyhow!("neighbor table is too large"))?;
    let mut neighbors = try_alloc(len, "neighbor table")?;
    let offsets = (0..neighbor_count)
        .map(HexAddress::from_index)
        .collect::<anyhow::Result<Vec<_>>>()?;
    for index in 0..extended_size {
        let address = HexAddress::from_index(index)?;
        for &offset in &offsets {
            let neighbor = address + offset;
            neighbors.push(u32::try_from(neighbor.to_index()).with_context(
                || format!("neighbor cell {} has no 32-bit index", neighbor),
            )?);
        }
    }
    Ok(neighbors)
}
