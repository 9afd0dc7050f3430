use crate::{
    grid::HexGrid,
    kernel::Kernel,
    resample::buffer::{Accumulator, HexBuffer, SquareBuffer},
};
use anyhow::ensure;

/// Sample a square image into every cell of the hex grid. The grid is
/// centered on the image, and one hex unit covers `pixels_per_unit` source
/// pixels. Each cell takes a weighted average of the 3x3 block of pixels
/// around its center. Cells that fall off the image entirely come out black.
pub fn square_to_hex(
    src: &SquareBuffer,
    grid: &HexGrid,
    dst: &mut HexBuffer,
    pixels_per_unit: f64,
    kernel: Kernel,
) -> anyhow::Result<()> {
    ensure!(
        dst.len() == grid.size(),
        "hex buffer has {} cells, but grid has {}",
        dst.len(),
        grid.size()
    );

    let center_x = src.width() as f64 / 2.0;
    let center_y = src.height() as f64 / 2.0;
    let width = src.width() as i64;
    let height = src.height() as i64;

    for (index, cell) in dst.cells_mut().iter_mut().enumerate() {
        let position = grid.cartesian(index);
        // Image rows go down, hex y goes up
        let col = center_x + pixels_per_unit * position.x;
        let row = center_y - pixels_per_unit * position.y;
        let col_center = col.round() as i64;
        let row_center = row.round() as i64;

        let mut acc = Accumulator::default();
        for x in (col_center - 1)..=(col_center + 1) {
            if x < 0 || x >= width {
                continue;
            }
            for y in (row_center - 1)..=(row_center + 1) {
                if y < 0 || y >= height {
                    continue;
                }
                let dx = (col - x as f64).abs();
                let dy = (row - y as f64).abs();
                let weight = kernel.weight(dx, dy) * area_factor(dx, dy);
                acc.add(src.get(x as usize, y as usize), weight);
            }
        }
        *cell = acc.finish();
    }

    Ok(())
}

/// Pixels whose center is more than half a pixel away from the sample point
/// only partially overlap it, so taper their weight linearly on each axis
fn area_factor(dx: f64, dy: f64) -> f64 {
    let partial = |d: f64| d > 0.5 && d < 1.0;
    if !(partial(dx) || partial(dy)) {
        return 1.0;
    }
    let mut factor = 1.0;
    if dx > 0.5 {
        factor *= 1.5 - dx;
    }
    if dy > 0.5 {
        factor *= 1.5 - dy;
    }
    factor
}
