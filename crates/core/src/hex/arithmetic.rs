//! Addition, negation, and scalar multiplication of hex addresses. All of
//! these operate directly on the digits, so there's no floating point math
//! involved and results are always exact.

use crate::hex::HexAddress;
use std::{cmp, ops, sync::OnceLock};

/// Digit combination table. `ADDITION[a][b]` is the result of adding the
/// single-digit addresses `a` and `b`, packed as two decimal digits: the ones
/// place is the digit that stays at the current level, the tens place is the
/// carry into the next level up.
const ADDITION: [[u8; 7]; 7] = [
    [0, 1, 2, 3, 4, 5, 6],
    [1, 63, 15, 2, 0, 6, 64],
    [2, 15, 14, 26, 3, 0, 1],
    [3, 2, 26, 25, 31, 4, 0],
    [4, 0, 3, 31, 36, 42, 5],
    [5, 6, 0, 4, 42, 41, 53],
    [6, 64, 1, 0, 5, 53, 52],
];

/// Number of entries in the doubling table. Entry `n` is direction 1 doubled
/// `n` times.
const DOUBLING_DEPTH: usize = 9;

/// Doubling table for direction 1, built from [HexAddress::double] the first
/// time it's needed. The other five directions are rotations of this.
fn doubling_table() -> &'static [HexAddress; DOUBLING_DEPTH] {
    static TABLE: OnceLock<[HexAddress; DOUBLING_DEPTH]> = OnceLock::new();
    TABLE.get_or_init(|| {
        let mut table = [HexAddress::from_packed_unchecked(1); DOUBLING_DEPTH];
        for depth in 1..DOUBLING_DEPTH {
            table[depth] = table[depth - 1].double();
        }
        table
    })
}

impl HexAddress {
    /// Rotate this address counter-clockwise about the origin by
    /// `steps * 60°`. Every non-zero digit moves to the next direction over;
    /// zero digits stay put since the center of a cell doesn't move.
    pub fn rotate(self, steps: u8) -> Self {
        let steps = steps % 6;
        if steps == 0 {
            return self;
        }
        let len = self.digit_count() as usize;
        let mut digits = self.unpack(len);
        for digit in digits.iter_mut().take(len) {
            if *digit != 0 {
                *digit = (*digit - 1 + steps) % 6 + 1;
            }
        }
        Self::pack(&digits[..len])
    }

    /// Add this address to itself
    pub fn double(self) -> Self {
        self + self
    }

    /// Get an iterator of this address doubled over and over: `a, 2a, 4a, …`.
    /// Unit directions pull from a precomputed table for the first few
    /// levels, everything else goes through regular addition.
    pub fn doublings(self) -> Doublings {
        let direction = if self.digit_count() == 1 && !self.is_origin() {
            Some(self.packed() as u8)
        } else {
            None
        };
        Doublings {
            current: self,
            depth: 0,
            direction,
        }
    }
}

/// Iterator returned by [HexAddress::doublings]. Never terminates.
#[derive(Clone, Debug)]
pub struct Doublings {
    current: HexAddress,
    depth: usize,
    /// Set when the starting address is one of the six unit directions
    direction: Option<u8>,
}

impl Iterator for Doublings {
    type Item = HexAddress;

    fn next(&mut self) -> Option<Self::Item> {
        let output = self.current;
        self.depth += 1;
        self.current = match self.direction {
            Some(direction) if self.depth < DOUBLING_DEPTH => {
                doubling_table()[self.depth].rotate(direction - 1)
            }
            _ => self.current.double(),
        };
        Some(output)
    }
}

impl ops::Neg for HexAddress {
    type Output = Self;

    /// Reflect through the origin, which is a half turn
    fn neg(self) -> Self::Output {
        self.rotate(3)
    }
}

impl ops::Add for HexAddress {
    type Output = Self;

    /// Ripple-carry addition over the [ADDITION] table. A carry out of one
    /// level is added into every level above it until something absorbs it.
    /// The result gets one more digit than the longer operand, up to
    /// [HexAddress::MAX_DIGITS]. Anything that carries past that is dropped.
    fn add(self, rhs: Self) -> Self::Output {
        let len = cmp::min(
            cmp::max(self.digit_count(), rhs.digit_count()) + 1,
            Self::MAX_DIGITS,
        ) as usize;
        let mut lhs = self.unpack(len);
        let rhs = rhs.unpack(len);
        let mut sum = [0u8; Self::MAX_DIGITS as usize];

        for i in 0..len {
            let combined = ADDITION[lhs[i] as usize][rhs[i] as usize];
            sum[i] = combined % 10;

            let mut carry = combined / 10;
            for digit in lhs[i + 1..len].iter_mut() {
                if carry == 0 {
                    break;
                }
                let combined = ADDITION[*digit as usize][carry as usize];
                *digit = combined % 10;
                carry = combined / 10;
            }
        }

        Self::pack(&sum[..len])
    }
}

impl ops::Sub for HexAddress {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self + -rhs
    }
}

impl ops::Mul<i64> for HexAddress {
    type Output = Self;

    /// Scalar multiplication by binary decomposition of the factor. We
    /// collect `a, 2a, 4a, …` up to the largest power of two that fits in
    /// `k`, then add back in the smaller powers from the top down until
    /// they sum to `k`.
    fn mul(self, k: i64) -> Self::Output {
        let (base, k) = if k < 0 {
            (-self, k.unsigned_abs())
        } else {
            (self, k as u64)
        };
        match k {
            0 => return Self::ORIGIN,
            1 => return base,
            _ => {}
        }

        let mut doublings = base.doublings();
        let mut factors: Vec<(HexAddress, u64)> = Vec::new();
        let mut power = 1u64;
        let mut product = base;
        while power <= k / 2 {
            // The iterator never ends, so this always hits
            if let Some(factor) = doublings.next() {
                factors.push((factor, power));
            }
            power *= 2;
        }
        if let Some(largest) = doublings.next() {
            product = largest;
        }

        let mut remaining = k - power;
        for &(factor, factor_power) in factors.iter().rev() {
            if remaining == 0 {
                break;
            }
            if factor_power <= remaining {
                product = product + factor;
                remaining -= factor_power;
            }
        }
        product
    }
}
