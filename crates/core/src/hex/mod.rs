//! Hexagonal addressing on an aperture-7 hierarchical grid.
//!
//! Every cell is identified by a [HexAddress], which is a sequence of digits
//! in `[0, 6]`. The rightmost (least significant) digit picks one of seven
//! cells in a small cluster: 0 is the center, and 1-6 are the six cells
//! around it, counter-clockwise starting from the positive x axis. Each
//! cluster of seven is itself a cell at the next level up, so the next digit
//! over picks one of seven clusters, and so on. A grid of order `n` is every
//! address with at most `n` digits, which comes out to `7^n` cells.
//!
//! ```text
//!          3   2
//!        4   0   1
//!          5   6
//! ```
//!
//! Each level up, the cluster basis grows by a factor of √7 and rotates
//! slightly, so the grid as a whole doesn't line up with any one axis. That
//! makes the Cartesian position of a cell a bit more involved to compute (see
//! [HexAddress::to_cartesian]), but it means that the whole grid can be
//! navigated with nothing but digit arithmetic:
//!
//! - Addition works like ripple-carry addition, except the digit table is
//!   hexagonal and a carry can spill into multiple levels.
//! - Negation is a half turn, which maps every non-zero digit `d` to `d ± 3`.
//! - Scalar multiplication is repeated doubling.
//!
//! Addresses can also be converted to and from a linear index, which is just
//! the digits read as a base-7 number. Indexes are what we use to store
//! per-cell data in flat arrays.

mod address;
mod arithmetic;
mod projection;

pub use address::HexAddress;
pub use arithmetic::Doublings;
