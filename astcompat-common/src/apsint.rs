//! Width-tagged integer with signedness
//!
//! The value type of integral constant evaluation. The value is held as a
//! `BigInt` and always lies in the range of its width and signedness; every
//! constructor other than `checked` reduces modulo `2^width` the way two's
//! complement truncation does.

use num_bigint::BigInt;
use num_traits::{One, Signed, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApsInt {
    value: BigInt,
    bit_width: u32,
    is_unsigned: bool,
}

impl ApsInt {
    /// Build from any integer, truncating it to `bit_width`
    pub fn new(value: impl Into<BigInt>, bit_width: u32, is_unsigned: bool) -> Self {
        debug_assert!(bit_width > 0, "zero bit width");
        let bit_width = bit_width.max(1);
        let modulus = BigInt::one() << bit_width as usize;
        let mut value = value.into() % &modulus;
        if value.is_negative() {
            value += &modulus;
        }
        if !is_unsigned && value > Self::max_value(bit_width, false) {
            value -= &modulus;
        }
        Self {
            value,
            bit_width,
            is_unsigned,
        }
    }

    pub fn from_i64(value: i64, bit_width: u32, is_unsigned: bool) -> Self {
        Self::new(value, bit_width, is_unsigned)
    }

    /// `value` if it is representable without truncation
    pub fn checked(value: impl Into<BigInt>, bit_width: u32, is_unsigned: bool) -> Option<Self> {
        let value = value.into();
        Self::fits(&value, bit_width, is_unsigned).then(|| Self {
            value,
            bit_width,
            is_unsigned,
        })
    }

    pub fn min_value(bit_width: u32, is_unsigned: bool) -> BigInt {
        if is_unsigned {
            BigInt::zero()
        } else {
            -(BigInt::one() << (bit_width.max(1) - 1) as usize)
        }
    }

    pub fn max_value(bit_width: u32, is_unsigned: bool) -> BigInt {
        let bits = if is_unsigned { bit_width } else { bit_width.max(1) - 1 };
        (BigInt::one() << bits as usize) - BigInt::one()
    }

    pub fn fits(value: &BigInt, bit_width: u32, is_unsigned: bool) -> bool {
        *value >= Self::min_value(bit_width, is_unsigned)
            && *value <= Self::max_value(bit_width, is_unsigned)
    }

    /// The value under its own signedness
    pub fn value(&self) -> &BigInt {
        &self.value
    }

    pub fn bit_width(&self) -> u32 {
        self.bit_width
    }

    pub fn is_unsigned(&self) -> bool {
        self.is_unsigned
    }

    pub fn is_signed(&self) -> bool {
        !self.is_unsigned
    }

    pub fn is_zero(&self) -> bool {
        self.value.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.value.is_negative()
    }

    pub fn to_i128(&self) -> Option<i128> {
        self.value.to_i128()
    }

    pub fn to_i64(&self) -> Option<i64> {
        self.value.to_i64()
    }

    pub fn to_f64(&self) -> Option<f64> {
        self.value.to_f64()
    }

    /// Integral conversion to another width and signedness
    pub fn convert(&self, bit_width: u32, is_unsigned: bool) -> Self {
        Self::new(self.value.clone(), bit_width, is_unsigned)
    }
}

impl fmt::Display for ApsInt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}
