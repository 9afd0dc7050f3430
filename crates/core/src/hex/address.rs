//! This sub-module contains the [HexAddress] type itself, along with its
//! conversions to and from linear indexes and packed digit values. The
//! arithmetic and projections live in sibling modules.

use crate::util::range::NumRange;
use anyhow::{anyhow, bail, ensure, Context};
use derive_more::Display;
use serde::Serialize;

/// A cell address in the aperture-7 hexagonal tiling. See the module-level
/// docs in [crate::hex] for a description of the addressing scheme.
///
/// The digits are stored packed into a `u64`, one digit per **decimal** place,
/// least significant digit in the ones place. So the address with digits
/// `[6, 3]` (most significant first) is stored as `63`. Decimal packing means
/// digits can be pulled out with `% 10` and `/ 10`, and the places never hold
/// 7, 8 or 9. The digit count is cached alongside the value. It never counts
/// leading zeros, except that the origin has exactly 1 digit.
#[derive(
    Copy,
    Clone,
    Debug,
    Display,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
)]
#[display(fmt = "{}", value)]
pub struct HexAddress {
    value: u64,
    digits: u32,
}

impl HexAddress {
    /// The center cell of the grid
    pub const ORIGIN: Self = Self {
        value: 0,
        digits: 1,
    };

    /// The most digits an address can have. A `u64` has room for 19 full
    /// decimal places.
    pub const MAX_DIGITS: u32 = 19;

    /// The largest value any single digit can hold
    pub const MAX_DIGIT: u8 = 6;

    /// Build an address from its linear index, i.e. the base-7 number formed
    /// by its digits. Indexes `0..7^n` are exactly the addresses of an order
    /// `n` grid. Returns an error if the index needs more than
    /// [Self::MAX_DIGITS] digits.
    pub fn from_index(index: usize) -> anyhow::Result<Self> {
        if index == 0 {
            return Ok(Self::ORIGIN);
        }

        let mut remaining = index as u64;
        let mut value = 0u64;
        let mut place = 1u64;
        let mut digits = 0u32;
        while remaining > 0 {
            ensure!(
                digits < Self::MAX_DIGITS,
                "index {} has more than {} base-7 digits",
                index,
                Self::MAX_DIGITS
            );
            value += place * (remaining % 7);
            remaining /= 7;
            // Can't overflow: we just checked that this is at most place 10^18
            place = place.saturating_mul(10);
            digits += 1;
        }

        Ok(Self { value, digits })
    }

    /// Build an address from an already-packed digit value, e.g. `63` for the
    /// digits `[6, 3]`. Returns an error if any decimal digit of the value is
    /// greater than 6, or if there are too many digits.
    pub fn from_packed(packed: u64) -> anyhow::Result<Self> {
        let mut remaining = packed;
        while remaining > 0 {
            let digit = remaining % 10;
            if digit > Self::MAX_DIGIT as u64 {
                bail!(
                    "packed address {} contains invalid digit {}; \
                    digits must be in [0, {}]",
                    packed,
                    digit,
                    Self::MAX_DIGIT
                );
            }
            remaining /= 10;
        }

        let address = Self::from_packed_unchecked(packed);
        ensure!(
            address.digits <= Self::MAX_DIGITS,
            "packed address {} has more than {} digits",
            packed,
            Self::MAX_DIGITS
        );
        Ok(address)
    }

    /// Build an address from a packed value that is **known** to be valid.
    /// This skips digit validation, so it should only be fed the output of
    /// our own arithmetic. The digit count is the number of decimal digits in
    /// the value, so any leading zeros are dropped.
    pub(crate) const fn from_packed_unchecked(packed: u64) -> Self {
        let mut digits = 1;
        let mut remaining = packed / 10;
        while remaining > 0 {
            digits += 1;
            remaining /= 10;
        }
        Self {
            value: packed,
            digits,
        }
    }

    /// The address one step from the origin in the given direction. Direction
    /// 0 is the origin itself, and 1-6 go counter-clockwise starting from the
    /// positive x axis. Returns an error for anything above 6.
    pub fn direction(digit: u8) -> anyhow::Result<Self> {
        NumRange::new(0, Self::MAX_DIGIT)
            .ensure_contains(digit)
            .context("invalid direction")?;
        Ok(Self::from_packed_unchecked(digit as u64))
    }

    /// The packed digit value. See the struct-level docs.
    pub fn packed(self) -> u64 {
        self.value
    }

    /// The number of digits in this address, which is also the order of the
    /// smallest grid that contains it (with the exception of the origin, which
    /// has one digit but is in every grid).
    pub fn digit_count(self) -> u32 {
        self.digits
    }

    /// Is this the origin cell?
    pub fn is_origin(self) -> bool {
        self.value == 0
    }

    /// Iterate over the digits of this address, **least** significant first.
    /// The iterator always yields exactly [Self::digit_count] values.
    pub fn digits(self) -> impl Iterator<Item = u8> {
        let mut remaining = self.value;
        (0..self.digits).map(move |_| {
            let digit = (remaining % 10) as u8;
            remaining /= 10;
            digit
        })
    }

    /// Convert this address to its linear index, which is its digits read as
    /// a base-7 number. This is the inverse of [Self::from_index].
    pub fn to_index(self) -> usize {
        self.digits()
            .fold((0, 1), |(sum, place), digit| {
                (sum + digit as usize * place, place * 7)
            })
            .0
    }

    /// Unpack the lowest `len` digits into a fixed array, least significant
    /// first. Places beyond the digit count are zero.
    pub(crate) fn unpack(self, len: usize) -> [u8; Self::MAX_DIGITS as usize] {
        let mut digits = [0; Self::MAX_DIGITS as usize];
        let mut remaining = self.value;
        for digit in digits.iter_mut().take(len) {
            *digit = (remaining % 10) as u8;
            remaining /= 10;
        }
        digits
    }

    /// Pack an array of digits (least significant first) back into an
    /// address. Leading zeros are dropped.
    pub(crate) fn pack(digits: &[u8]) -> Self {
        let value = digits
            .iter()
            .rev()
            .fold(0u64, |sum, &digit| sum * 10 + digit as u64);
        Self::from_packed_unchecked(value)
    }
}

/// Signed conversion, for callers that hold indexes in signed integers.
/// Negative values don't correspond to any cell, so they're rejected.
impl TryFrom<i64> for HexAddress {
    type Error = anyhow::Error;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        let index = usize::try_from(index)
            .map_err(|_| anyhow!("invalid hex index {}; must be >= 0", index))?;
        Self::from_index(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_index() {
        assert_eq!(HexAddress::from_index(0).unwrap(), HexAddress::ORIGIN);

        let address = HexAddress::from_index(6).unwrap();
        assert_eq!(address.packed(), 6);
        assert_eq!(address.digit_count(), 1);

        let address = HexAddress::from_index(7).unwrap();
        assert_eq!(address.packed(), 10);
        assert_eq!(address.digit_count(), 2);

        // 342 = 7^3 - 1, the last cell of an order 3 grid
        let address = HexAddress::from_index(342).unwrap();
        assert_eq!(address.packed(), 666);
        assert_eq!(address.digit_count(), 3);
    }

    #[test]
    fn test_from_index_too_big() {
        let max = 7usize.pow(HexAddress::MAX_DIGITS) - 1;
        let address = HexAddress::from_index(max).unwrap();
        assert_eq!(address.digit_count(), HexAddress::MAX_DIGITS);
        assert_eq!(address.to_index(), max);
        assert!(HexAddress::from_index(max + 1).is_err());
    }

    #[test]
    fn test_index_round_trip() {
        for order in 1..=5 {
            for index in 0..7usize.pow(order) {
                let address = HexAddress::from_index(index).unwrap();
                assert_eq!(address.to_index(), index, "address {}", address);
                assert!(address.digit_count() <= order);
            }
        }
    }

    #[test]
    fn test_from_packed() {
        let address = HexAddress::from_packed(645).unwrap();
        assert_eq!(address.digit_count(), 3);
        assert_eq!(address.digits().collect::<Vec<_>>(), vec![5, 4, 6]);
        assert_eq!(address.to_index(), 6 * 49 + 4 * 7 + 5);

        assert_eq!(HexAddress::from_packed(0).unwrap(), HexAddress::ORIGIN);
        assert!(HexAddress::from_packed(17).is_err());
        assert!(HexAddress::from_packed(90).is_err());
        assert!(HexAddress::from_packed(u64::MAX).is_err());
    }

    #[test]
    fn test_try_from_signed() {
        assert_eq!(
            HexAddress::try_from(8i64).unwrap(),
            HexAddress::from_packed(11).unwrap()
        );
        let err = HexAddress::try_from(-1i64).unwrap_err();
        assert_eq!(err.to_string(), "invalid hex index -1; must be >= 0");
    }

    #[test]
    fn test_direction() {
        for digit in 0..=6 {
            let address = HexAddress::direction(digit).unwrap();
            assert_eq!(address.to_index(), digit as usize);
        }
        let err = HexAddress::direction(7).unwrap_err();
        assert_eq!(
            format!("{:#}", err),
            "invalid direction: value 7 is not in range [0, 6]"
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(HexAddress::from_index(49).unwrap().to_string(), "100");
        assert_eq!(HexAddress::ORIGIN.to_string(), "0");
    }

    #[test]
    fn test_pack_unpack() {
        let address = HexAddress::from_packed(3021).unwrap();
        let digits = address.unpack(6);
        assert_eq!(&digits[..6], &[1, 2, 0, 3, 0, 0]);
        assert_eq!(HexAddress::pack(&digits[..6]), address);
    }
}
