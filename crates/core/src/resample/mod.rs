//! The two resampling passes, and [Resampler], which strings them together
//! into a frame-by-frame pipeline.

mod buffer;
mod to_hex;
mod to_square;

pub use buffer::{HexBuffer, Rgb, SquareBuffer, CHANNELS};
pub use to_hex::square_to_hex;
pub use to_square::hex_to_square;

use crate::{
    config::{DisplayMode, GridConfig},
    grid::HexGrid,
    kernel::Kernel,
    timed,
};
use log::{debug, info};

/// Owns a [HexGrid] plus all the working buffers needed to push frames
/// through it. Building one of these is the expensive part. After that, each
/// call to [Resampler::process] only does table lookups and arithmetic on
/// pixels. To change the grid config, build a new one.
#[derive(Clone, Debug)]
pub struct Resampler {
    grid: HexGrid,
    output_width: usize,
    output_height: usize,
    /// Input frame, cropped or padded to the output dimensions
    frame: SquareBuffer,
    cells: HexBuffer,
    /// Output of the hex to square pass, before it's placed in the frame
    raster: SquareBuffer,
}

impl Resampler {
    /// Build the grid for the given config, and allocate buffers for frames
    /// of the given size. Fails if the config is invalid or if anything can't
    /// be allocated.
    pub fn new(
        config: GridConfig,
        output_width: usize,
        output_height: usize,
    ) -> anyhow::Result<Self> {
        let grid = timed!("Grid precomputation", log::Level::Info, {
            HexGrid::new(&config)
        })?;
        let (raster_width, raster_height) = grid.raster_size();
        let resampler = Self {
            frame: SquareBuffer::new(output_width, output_height)?,
            cells: HexBuffer::new(grid.size())?,
            raster: SquareBuffer::new(raster_width, raster_height)?,
            grid,
            output_width,
            output_height,
        };
        info!(
            "Resampler ready for {}x{} frames",
            output_width, output_height
        );
        Ok(resampler)
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn output_size(&self) -> (usize, usize) {
        (self.output_width, self.output_height)
    }

    /// The hex cells from the most recent call to [Self::process]
    pub fn cells(&self) -> &HexBuffer {
        &self.cells
    }

    /// Push one frame through the grid. `src` and `dst` are raw RGB buffers,
    /// 3 bytes per pixel, row-major. `dst` must match the output size this
    /// resampler was built with, while `src` can be any size. Only the
    /// top-left corner of `src` that fits in the output size is used.
    ///
    /// In [DisplayMode::Hexagonal], each cell becomes one pixel at its display
    /// position. In [DisplayMode::Square], the cells are resampled back into a
    /// square image. Either way the result is centered in `dst`, and any part
    /// of `dst` that it doesn't cover is black.
    pub fn process(
        &mut self,
        src: &[u8],
        src_width: usize,
        src_height: usize,
        dst: &mut [u8],
        kernel: Kernel,
        display_mode: DisplayMode,
    ) -> anyhow::Result<()> {
        buffer::check_len(self.output_width, self.output_height, dst.len())?;
        self.frame.clear();
        self.frame.copy_from_raw(src, src_width, src_height)?;

        timed!(
            "Square to hex",
            square_to_hex(
                &self.frame,
                &self.grid,
                &mut self.cells,
                1.0 / self.grid.scale(),
                kernel,
            )
        )?;

        dst.fill(0);
        match display_mode {
            DisplayMode::Hexagonal => self.draw_cells(dst),
            DisplayMode::Square => {
                timed!(
                    "Hex to square",
                    hex_to_square(
                        &self.cells,
                        &self.grid,
                        &mut self.raster,
                        kernel
                    )
                )?;
                self.draw_raster(dst);
            }
        }
        Ok(())
    }

    /// Draw each cell as a single pixel in the display layout
    fn draw_cells(&self, dst: &mut [u8]) {
        let (layout_width, layout_height) = self.grid.display_size();
        let base_x = centering_offset(self.output_width, layout_width);
        let base_y = centering_offset(self.output_height, layout_height);
        for (index, cell) in self.cells.cells().iter().enumerate() {
            let (x, y) = self.grid.display(index);
            self.put(dst, base_x + x as i64, base_y + y as i64, *cell);
        }
    }

    /// Copy the square raster into the frame, clipping whatever doesn't fit
    fn draw_raster(&self, dst: &mut [u8]) {
        let (width, height) = (self.raster.width(), self.raster.height());
        let base_x = centering_offset(self.output_width, width);
        let base_y = centering_offset(self.output_height, height);
        for y in 0..height {
            for x in 0..width {
                self.put(
                    dst,
                    base_x + x as i64,
                    base_y + y as i64,
                    self.raster.get(x, y),
                );
            }
        }
    }

    /// Write one pixel into the output frame. Out of bounds is a no-op.
    fn put(&self, dst: &mut [u8], x: i64, y: i64, pixel: Rgb) {
        if x < 0
            || y < 0
            || x >= self.output_width as i64
            || y >= self.output_height as i64
        {
            return;
        }
        let start = (y as usize * self.output_width + x as usize) * CHANNELS;
        dst[start..start + CHANNELS].copy_from_slice(&pixel);
    }
}

/// Tables and buffers are all owned `Vec`s, so they free themselves. This
/// only marks the end of the grid's lifetime in the logs.
impl Drop for Resampler {
    fn drop(&mut self) {
        debug!(
            "Releasing order {} grid tables",
            self.grid.order()
        );
    }
}

/// Offset that centers something of size `inner` inside `outer`. Negative if
/// it doesn't fit.
fn centering_offset(outer: usize, inner: usize) -> i64 {
    (outer as i64 - inner as i64) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resampler(width: usize, height: usize) -> Resampler {
        Resampler::new(
            GridConfig {
                order: 3,
                scale: 1.0,
                radius: 1.0,
            },
            width,
            height,
        )
        .unwrap()
    }

    #[test]
    fn test_centering_offset() {
        assert_eq!(centering_offset(32, 21), 5);
        assert_eq!(centering_offset(21, 21), 0);
        assert_eq!(centering_offset(10, 21), -5);
    }

    #[test]
    fn test_wrong_dst_len() {
        let mut resampler = resampler(16, 16);
        let src = vec![0; 16 * 16 * 3];
        let mut dst = vec![0; 16 * 16 * 3 - 1];
        let result = resampler.process(
            &src,
            16,
            16,
            &mut dst,
            Kernel::Linear,
            DisplayMode::Square,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_src_len() {
        let mut resampler = resampler(16, 16);
        let src = vec![0; 10];
        let mut dst = vec![0; 16 * 16 * 3];
        let result = resampler.process(
            &src,
            16,
            16,
            &mut dst,
            Kernel::Linear,
            DisplayMode::Square,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_huge_src_width() {
        let mut resampler = resampler(16, 16);
        let mut dst = vec![0; 16 * 16 * 3];
        let result = resampler.process(
            &[0; 3],
            usize::MAX / 2,
            1,
            &mut dst,
            Kernel::Linear,
            DisplayMode::Square,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_small_output_clips() {
        // Raster is 21x21, so it gets clipped on every side
        let mut resampler = resampler(8, 8);
        let src = vec![255; 8 * 8 * 3];
        let mut dst = vec![0; 8 * 8 * 3];
        resampler
            .process(&src, 8, 8, &mut dst, Kernel::Cubic, DisplayMode::Square)
            .unwrap();
        resampler
            .process(
                &src,
                8,
                8,
                &mut dst,
                Kernel::Cubic,
                DisplayMode::Hexagonal,
            )
            .unwrap();
    }
}
