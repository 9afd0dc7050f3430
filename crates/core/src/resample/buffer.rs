use crate::util::{range::NumRange, try_alloc};
use anyhow::ensure;

/// One pixel or cell: red, green, blue
pub type Rgb = [u8; 3];

/// Bytes per pixel in a raw interleaved buffer
pub const CHANNELS: usize = 3;

/// Every channel value has to land in here
const CHANNEL_RANGE: NumRange<f64> = NumRange::new(0.0, 255.0);

/// A square-grid image: row-major, 3 interleaved channels per pixel, row 0 at
/// the top.
#[derive(Clone, Debug, PartialEq)]
pub struct SquareBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl SquareBuffer {
    /// Allocate an all-black image
    pub fn new(width: usize, height: usize) -> anyhow::Result<Self> {
        let len = width
            .checked_mul(height)
            .and_then(|pixels| pixels.checked_mul(CHANNELS))
            .ok_or_else(|| {
                anyhow::anyhow!("image {}x{} is too large", width, height)
            })?;
        let mut data = try_alloc(len, "square pixel buffer")?;
        data.resize(len, 0);
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap existing raw pixel data. The data must be exactly
    /// `width * height * 3` bytes.
    pub fn from_raw(
        width: usize,
        height: usize,
        data: Vec<u8>,
    ) -> anyhow::Result<Self> {
        check_len(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Get one pixel. Panics if out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Rgb {
        let start = self.offset(x, y);
        [self.data[start], self.data[start + 1], self.data[start + 2]]
    }

    /// Overwrite one pixel. Panics if out of bounds.
    pub fn set(&mut self, x: usize, y: usize, pixel: Rgb) {
        let start = self.offset(x, y);
        self.data[start..start + CHANNELS].copy_from_slice(&pixel);
    }

    /// Set every pixel to black
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Overwrite the top-left corner of this image with the top-left corner
    /// of a raw source image. Whatever doesn't overlap is left untouched.
    pub fn copy_from_raw(
        &mut self,
        src: &[u8],
        src_width: usize,
        src_height: usize,
    ) -> anyhow::Result<()> {
        check_len(src_width, src_height, src.len())?;
        let row_len = src_width.min(self.width) * CHANNELS;
        for y in 0..src_height.min(self.height) {
            let src_start = y * src_width * CHANNELS;
            let dst_start = y * self.width * CHANNELS;
            self.data[dst_start..dst_start + row_len]
                .copy_from_slice(&src[src_start..src_start + row_len]);
        }
        Ok(())
    }

    fn offset(&self, x: usize, y: usize) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({}, {}) out of bounds for {}x{} image",
            x,
            y,
            self.width,
            self.height
        );
        (y * self.width + x) * CHANNELS
    }
}

/// Make sure a raw buffer is the right length for its dimensions
pub(crate) fn check_len(
    width: usize,
    height: usize,
    len: usize,
) -> anyhow::Result<()> {
    let expected = width
        .checked_mul(height)
        .and_then(|pixels| pixels.checked_mul(CHANNELS));
    ensure!(
        expected == Some(len),
        "buffer of {} bytes doesn't match {}x{} image ({} channels)",
        len,
        width,
        height,
        CHANNELS
    );
    Ok(())
}

/// One color per hex cell, indexed by linear hex index
#[derive(Clone, Debug, PartialEq)]
pub struct HexBuffer {
    cells: Vec<Rgb>,
}

impl HexBuffer {
    /// Allocate an all-black buffer with the given number of cells
    pub fn new(size: usize) -> anyhow::Result<Self> {
        let mut cells = try_alloc(size, "hex cell buffer")?;
        cells.resize(size, [0; CHANNELS]);
        Ok(Self { cells })
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[Rgb] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Rgb] {
        &mut self.cells
    }

    /// Get a cell's color, or `None` if it's beyond the grid
    pub fn get(&self, index: usize) -> Option<Rgb> {
        self.cells.get(index).copied()
    }
}

/// Running weighted sum for a single output pixel or cell
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct Accumulator {
    sums: [f64; CHANNELS],
    weight: f64,
}

impl Accumulator {
    pub fn add(&mut self, pixel: Rgb, weight: f64) {
        for (sum, &channel) in self.sums.iter_mut().zip(pixel.iter()) {
            *sum += weight * channel as f64;
        }
        self.weight += weight;
    }

    /// Normalize by the total weight and round to the nearest integer, with
    /// halves going away from zero. If nothing contributed any weight, the
    /// raw sums are used instead. Values outside `[0, 255]` are clamped.
    pub fn finish(&self) -> Rgb {
        let mut output = [0; CHANNELS];
        for (out, &sum) in output.iter_mut().zip(self.sums.iter()) {
            let value = if self.weight > 0.0 {
                sum / self.weight
            } else {
                sum
            };
            *out = CHANNEL_RANGE.clamp(value.round()) as u8;
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_buffer() {
        let mut buffer = SquareBuffer::new(4, 3).unwrap();
        assert_eq!(buffer.as_bytes().len(), 36);
        buffer.set(3, 2, [1, 2, 3]);
        assert_eq!(buffer.get(3, 2), [1, 2, 3]);
        assert_eq!(&buffer.as_bytes()[33..], &[1, 2, 3]);
        buffer.clear();
        assert_eq!(buffer.get(3, 2), [0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_square_buffer_out_of_bounds() {
        let buffer = SquareBuffer::new(4, 3).unwrap();
        buffer.get(4, 0);
    }

    #[test]
    fn test_from_raw() {
        assert!(SquareBuffer::from_raw(2, 2, vec![0; 12]).is_ok());
        let err = SquareBuffer::from_raw(2, 2, vec![0; 11]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "buffer of 11 bytes doesn't match 2x2 image (3 channels)"
        );
    }

    #[test]
    fn test_copy_from_raw() {
        // Source is bigger on x, smaller on y
        let src: Vec<u8> = (0..9).map(|i| i as u8 + 1).collect();
        let mut buffer = SquareBuffer::new(2, 2).unwrap();
        buffer.copy_from_raw(&src, 3, 1).unwrap();
        assert_eq!(buffer.get(0, 0), [1, 2, 3]);
        assert_eq!(buffer.get(1, 0), [4, 5, 6]);
        assert_eq!(buffer.get(0, 1), [0, 0, 0]);

        assert!(buffer.copy_from_raw(&src, 2, 2).is_err());
    }

    #[test]
    fn test_check_len_overflow() {
        assert!(check_len(usize::MAX / 2, 1, 3).is_err());
        assert!(check_len(usize::MAX, usize::MAX, 0).is_err());
        let mut buffer = SquareBuffer::new(2, 2).unwrap();
        assert!(buffer.copy_from_raw(&[0; 3], usize::MAX / 2, 1).is_err());
    }

    #[test]
    fn test_hex_buffer() {
        let mut buffer = HexBuffer::new(343).unwrap();
        assert_eq!(buffer.len(), 343);
        buffer.cells_mut()[342] = [9, 9, 9];
        assert_eq!(buffer.get(342), Some([9, 9, 9]));
        assert_eq!(buffer.get(343), None);
    }

    #[test]
    fn test_accumulator() {
        let mut acc = Accumulator::default();
        acc.add([10, 20, 30], 1.0);
        acc.add([20, 40, 61], 1.0);
        assert_eq!(acc.finish(), [15, 30, 46]);
    }

    #[test]
    fn test_accumulator_zero_weight() {
        assert_eq!(Accumulator::default().finish(), [0, 0, 0]);
        let mut acc = Accumulator::default();
        acc.add([100, 7, 3], 0.0);
        assert_eq!(acc.finish(), [0, 0, 0]);
    }

    #[test]
    fn test_accumulator_clamp() {
        let acc = Accumulator {
            sums: [300.0, 1000.0, 255.6],
            weight: 0.0,
        };
        assert_eq!(acc.finish(), [255, 255, 255]);

        let acc = Accumulator {
            sums: [-4.0, 254.4, 12.5],
            weight: 0.0,
        };
        assert_eq!(acc.finish(), [0, 254, 13]);
    }
}
