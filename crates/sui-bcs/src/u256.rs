//! Wide unsigned integers (`u128` from arbitrary-precision input, `u256`).
//!
//! Wide values are written as fixed-width little-endian fields: take the minimal
//! big-endian magnitude, left-pad with zeros to the target width, then reverse.
//! Negative values and values with more significant bytes than the width are
//! rejected with [`BcsError::RangeError`].

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use num_bigint::{BigInt, BigUint, Sign};

use crate::error::{BcsError, BcsResult};

/// Encode an arbitrary-precision integer into a `width`-byte little-endian field.
pub fn encode_unsigned_le(value: &BigInt, width: usize) -> BcsResult<Vec<u8>> {
    if value.sign() == Sign::Minus {
        return Err(BcsError::range(format!(
            "negative value {} cannot be encoded as u{}",
            value,
            width * 8
        )));
    }
    let mut be = value.magnitude().to_bytes_be();
    // BigUint::to_bytes_be yields [0] for zero
    if be == [0] {
        be.clear();
    }
    if be.len() > width {
        return Err(BcsError::range(format!(
            "value {} has {} significant bytes, u{} holds {}",
            value,
            be.len(),
            width * 8,
            width
        )));
    }
    let mut out = vec![0u8; width - be.len()];
    out.extend_from_slice(&be);
    out.reverse();
    Ok(out)
}

/// Narrow an arbitrary-precision integer to `u128`, failing instead of truncating.
pub fn u128_from_big_int(value: &BigInt) -> BcsResult<u128> {
    let le = encode_unsigned_le(value, 16)?;
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&le);
    Ok(u128::from_le_bytes(bytes))
}

/// Parse decimal or `0x`-prefixed hex text into an arbitrary-precision integer.
pub fn parse_big_int(s: &str) -> BcsResult<BigInt> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };
    let magnitude = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        BigUint::parse_bytes(hex.as_bytes(), 16)
    } else {
        BigUint::parse_bytes(digits.as_bytes(), 10)
    }
    .ok_or_else(|| BcsError::invalid(format!("'{}' is not an integer", s)))?;
    let sign = if negative { Sign::Minus } else { Sign::Plus };
    Ok(BigInt::from_biguint(sign, magnitude))
}

/// A 256-bit unsigned integer stored as 32 little-endian bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256([u8; 32]);

impl U256 {
    pub const ZERO: U256 = U256([0u8; 32]);
    pub const MAX: U256 = U256([0xff; 32]);

    pub const fn from_le_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn to_le_bytes(&self) -> [u8; 32] {
        self.0
    }

    pub fn try_from_big_int(value: &BigInt) -> BcsResult<Self> {
        let le = encode_unsigned_le(value, 32)?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&le);
        Ok(Self(bytes))
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.0)
    }

    pub fn to_big_int(&self) -> BigInt {
        BigInt::from_biguint(Sign::Plus, self.to_biguint())
    }
}

impl From<u128> for U256 {
    fn from(value: u128) -> Self {
        let mut bytes = [0u8; 32];
        bytes[..16].copy_from_slice(&value.to_le_bytes());
        Self(bytes)
    }
}

impl From<u64> for U256 {
    fn from(value: u64) -> Self {
        U256::from(value as u128)
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.iter().rev().cmp(other.0.iter().rev())
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for U256 {
    type Err = BcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        U256::try_from_big_int(&parse_big_int(s)?)
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_biguint())
    }
}

impl fmt::Debug for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U256({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_unsigned_le_pads_and_reverses() {
        let bytes = encode_unsigned_le(&BigInt::from(0x0102u32), 16).unwrap();
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[..2], &[0x02, 0x01]);
        assert!(bytes[2..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_encode_zero() {
        assert_eq!(encode_unsigned_le(&BigInt::from(0), 16).unwrap(), vec![0u8; 16]);
    }

    #[test]
    fn test_negative_rejected() {
        let err = encode_unsigned_le(&BigInt::from(-1), 16).unwrap_err();
        assert!(matches!(err, BcsError::RangeError(_)));
    }

    #[test]
    fn test_too_wide_rejected() {
        let value = BigInt::from(1) << 128;
        let err = u128_from_big_int(&value).unwrap_err();
        assert!(matches!(err, BcsError::RangeError(_)));

        let max = (BigInt::from(1) << 128) - 1;
        assert_eq!(u128_from_big_int(&max).unwrap(), u128::MAX);
    }

    #[test]
    fn test_u256_parse_and_display() {
        let v: U256 = "0x1ff".parse().unwrap();
        assert_eq!(v.to_string(), "511");
        assert_eq!(v, U256::from(511u64));

        let max: U256 =
            "115792089237316195423570985008687907853269984665640564039457584007913129639935"
                .parse()
                .unwrap();
        assert_eq!(max, U256::MAX);

        assert!(matches!(
            "-5".parse::<U256>().unwrap_err(),
            BcsError::RangeError(_)
        ));
        assert!(matches!(
            "abc".parse::<U256>().unwrap_err(),
            BcsError::InvalidEncoding(_)
        ));
    }

    #[test]
    fn test_u256_ordering() {
        assert!(U256::from(1u64) < U256::from(256u64));
        assert!(U256::MAX > U256::from(u128::MAX));
    }
}
