use crate::{
    grid::HexGrid,
    kernel::Kernel,
    resample::buffer::{Accumulator, HexBuffer, SquareBuffer},
};
use anyhow::ensure;

/// Rebuild a square image from the hex grid. The output must be exactly
/// [HexGrid::raster_size]. Every output pixel is a weighted average of the
/// cells around the cell nearest to it, limited to cells within the grid's
/// radius on both axes.
pub fn hex_to_square(
    src: &HexBuffer,
    grid: &HexGrid,
    dst: &mut SquareBuffer,
    kernel: Kernel,
) -> anyhow::Result<()> {
    ensure!(
        src.len() == grid.size(),
        "hex buffer has {} cells, but grid has {}",
        src.len(),
        grid.size()
    );
    let (width, height) = grid.raster_size();
    ensure!(
        dst.width() == width && dst.height() == height,
        "output is {}x{}, but grid raster is {}x{}",
        dst.width(),
        dst.height(),
        width,
        height
    );

    let radius = grid.radius();
    let cells = src.cells();
    for y in 0..height {
        for x in 0..width {
            let point = grid.raster_point(x, y);
            let mut acc = Accumulator::default();
            for &neighbor in grid.neighbors(grid.nearest_index(x, y)) {
                let neighbor = neighbor as usize;
                if neighbor >= cells.len() {
                    continue;
                }
                let offset = point - grid.cartesian(neighbor);
                if offset.x.abs() <= radius && offset.y.abs() <= radius {
                    acc.add(cells[neighbor], kernel.weight(offset.x, offset.y));
                }
            }
            // Raster rows go up, image rows go down
            dst.set(x, height - y - 1, acc.finish());
        }
    }

    Ok(())
}
