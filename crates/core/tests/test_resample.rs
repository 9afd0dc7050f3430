use hexsamp::{
    resample::{hex_to_square, square_to_hex, HexBuffer, Rgb, SquareBuffer},
    DisplayMode, GridConfig, HexGrid, Kernel, Resampler,
};
use strum::IntoEnumIterator;

const FLAT: Rgb = [128, 64, 200];
const LEFT: Rgb = [20, 40, 60];
const RIGHT: Rgb = [255, 0, 0];

fn order_3(radius: f64) -> GridConfig {
    GridConfig {
        order: 3,
        scale: 1.0,
        radius,
    }
}

fn solid_image(width: usize, height: usize, color: Rgb) -> Vec<u8> {
    color
        .iter()
        .copied()
        .cycle()
        .take(width * height * 3)
        .collect()
}

/// Left half is one color, right half is another. The boundary is between
/// columns `width / 2 - 1` and `width / 2`.
fn split_image(width: usize, height: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity(width * height * 3);
    for _ in 0..height {
        for x in 0..width {
            data.extend_from_slice(if x < width / 2 { &LEFT } else { &RIGHT });
        }
    }
    data
}

fn pixel(data: &[u8], width: usize, x: usize, y: usize) -> Rgb {
    let start = (y * width + x) * 3;
    [data[start], data[start + 1], data[start + 2]]
}

#[test]
fn test_flat_color_is_preserved() {
    let grid = HexGrid::new(&order_3(1.0)).unwrap();
    let src =
        SquareBuffer::from_raw(32, 32, solid_image(32, 32, FLAT)).unwrap();
    let mut cells = HexBuffer::new(grid.size()).unwrap();
    // Grid stays inside the image at all of these scales
    for &pixels_per_unit in &[1.0, 0.5, 1.4] {
        for kernel in Kernel::iter() {
            square_to_hex(&src, &grid, &mut cells, pixels_per_unit, kernel)
                .unwrap();
            for (index, cell) in cells.cells().iter().enumerate() {
                assert_eq!(
                    *cell, FLAT,
                    "cell {} with {} at {} px/unit",
                    index, kernel, pixels_per_unit
                );
            }
        }
    }
}

#[test]
fn test_zero_is_fixed_point() {
    for &radius in &[1.0, 2.0] {
        let grid = HexGrid::new(&order_3(radius)).unwrap();
        let cells = HexBuffer::new(grid.size()).unwrap();
        let (width, height) = grid.raster_size();
        for kernel in Kernel::iter() {
            let mut dst = SquareBuffer::from_raw(
                width,
                height,
                solid_image(width, height, [1, 2, 3]),
            )
            .unwrap();
            hex_to_square(&cells, &grid, &mut dst, kernel).unwrap();
            assert!(
                dst.as_bytes().iter().all(|&b| b == 0),
                "non-zero output with {} at radius {}",
                kernel,
                radius
            );
        }
    }
}

#[test]
fn test_round_trip_boundary() {
    let size = 32;
    let src = split_image(size, size);
    let mut dst = vec![0; size * size * 3];
    let mut resampler = Resampler::new(order_3(1.0), size, size).unwrap();
    let (raster_width, raster_height) = resampler.grid().raster_size();
    let base_x = (size - raster_width) / 2;
    let base_y = (size - raster_height) / 2;

    for kernel in Kernel::iter() {
        resampler
            .process(&src, size, size, &mut dst, kernel, DisplayMode::Square)
            .unwrap();

        // Far from the boundary, colors come through untouched
        let row = base_y + raster_height / 2;
        assert_eq!(pixel(&dst, size, base_x, row), LEFT, "{}", kernel);
        assert_eq!(
            pixel(&dst, size, base_x + raster_width - 1, row),
            RIGHT,
            "{}",
            kernel
        );

        // Edge rows of the raster only partially overlap the grid, so only
        // check the middle half
        for y in (base_y + raster_height / 4)..(base_y + 3 * raster_height / 4)
        {
            let boundary = (base_x..base_x + raster_width)
                .find(|&x| pixel(&dst, size, x, y)[0] >= 128)
                .unwrap_or_else(|| panic!("no boundary in row {}", y));
            assert!(
                (boundary as i64 - size as i64 / 2).abs() <= 1,
                "boundary at {} in row {} with {}",
                boundary,
                y,
                kernel
            );
        }

        // Outside the raster is black
        assert_eq!(pixel(&dst, size, 0, 0), [0, 0, 0]);
        assert_eq!(pixel(&dst, size, size - 1, size - 1), [0, 0, 0]);
    }
}

#[test]
fn test_hexagonal_display() {
    let size = 32;
    let src = solid_image(size, size, FLAT);
    let mut dst = vec![0; size * size * 3];
    let mut resampler = Resampler::new(order_3(1.0), size, size).unwrap();
    resampler
        .process(
            &src,
            size,
            size,
            &mut dst,
            Kernel::Linear,
            DisplayMode::Hexagonal,
        )
        .unwrap();

    // One pixel per cell, the rest is background
    let pixels: Vec<Rgb> = dst.chunks(3).map(|p| [p[0], p[1], p[2]]).collect();
    let lit = pixels.iter().filter(|&&p| p == FLAT).count();
    let dark = pixels.iter().filter(|&&p| p == [0, 0, 0]).count();
    assert_eq!(lit, resampler.grid().size());
    assert_eq!(lit + dark, size * size);
}

#[test]
fn test_smaller_source_is_padded() {
    // Source only covers the top-left quarter of the frame
    let mut resampler = Resampler::new(order_3(1.0), 32, 32).unwrap();
    let src = solid_image(16, 16, FLAT);
    let mut dst = vec![0; 32 * 32 * 3];
    resampler
        .process(&src, 16, 16, &mut dst, Kernel::Linear, DisplayMode::Square)
        .unwrap();

    // The origin cell lands on pixel (16, 16), just outside the source
    let (width, height) = resampler.grid().raster_size();
    let center = pixel(&dst, 32, 5 + width / 2, 5 + height / 2);
    assert_ne!(center, FLAT);
    assert_eq!(resampler.cells().get(0), Some([0, 0, 0]));
}

#[test]
fn test_full_intensity_is_clamped() {
    // Every kernel and radius has to land exactly on 255 at full
    // intensity, never a wrapped-around value
    for &radius in &[1.0, 2.0] {
        let grid = HexGrid::new(&order_3(radius)).unwrap();
        let mut cells = HexBuffer::new(grid.size()).unwrap();
        cells.cells_mut().fill([255; 3]);
        let (width, height) = grid.raster_size();
        for kernel in Kernel::iter() {
            let mut dst = SquareBuffer::new(width, height).unwrap();
            hex_to_square(&cells, &grid, &mut dst, kernel).unwrap();
            assert_eq!(dst.get(width / 2, height / 2), [255; 3]);
            for pixel in dst.as_bytes().chunks(3) {
                // Corners of the raster can fall outside the grid entirely
                assert!(
                    pixel == [255; 3] || pixel == [0; 3],
                    "pixel {:?} with {} at radius {}",
                    pixel,
                    kernel,
                    radius
                );
            }
        }
    }
}
