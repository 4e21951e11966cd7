//! Account addresses and object ids.
//!
//! Sui addresses are 32-byte values, but they show up in several textual forms:
//! - Short form: "0x2" (type strings, framework packages)
//! - Full form: "0x0000000000000000000000000000000000000000000000000000000000000002"
//! - Without prefix: "2"
//!
//! [`SuiAddress::from_str`] is strict and only accepts the full 64-digit form, which
//! is what user-supplied recipients and senders must look like. The short form is
//! parsed with [`SuiAddress::from_hex_literal`].

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sui_txkit_bcs::{
    decode_address_hex, BcsDecode, BcsEncode, BcsError, BcsReader, BcsResult, BcsWriter,
};

pub const SUI_ADDRESS_LENGTH: usize = 32;

/// A 32-byte account address. Encoded as a fixed 32-byte field with no length prefix.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct SuiAddress([u8; SUI_ADDRESS_LENGTH]);

/// Object and package ids share the address representation.
pub type ObjectID = SuiAddress;

impl SuiAddress {
    pub const ZERO: Self = Self([0u8; SUI_ADDRESS_LENGTH]);

    pub const fn new(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Address whose last two bytes hold `value`, e.g. `0x2` or `0x403`.
    pub const fn from_u16(value: u16) -> Self {
        let mut bytes = [0u8; SUI_ADDRESS_LENGTH];
        bytes[30] = (value >> 8) as u8;
        bytes[31] = value as u8;
        Self(bytes)
    }

    pub fn random() -> Self {
        Self(rand::thread_rng().gen())
    }

    pub fn from_bytes(bytes: &[u8]) -> BcsResult<Self> {
        let array: [u8; SUI_ADDRESS_LENGTH] = bytes.try_into().map_err(|_| {
            BcsError::invalid(format!(
                "address must be {} bytes, got {}",
                SUI_ADDRESS_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(Self(array))
    }

    /// Parse a `0x`-prefixed hex literal of 1 to 64 digits, left-padding with zeros.
    pub fn from_hex_literal(literal: &str) -> BcsResult<Self> {
        let digits = literal
            .strip_prefix("0x")
            .ok_or_else(|| BcsError::invalid(format!("address literal '{}' must start with 0x", literal)))?;
        if digits.is_empty() || digits.len() > SUI_ADDRESS_LENGTH * 2 {
            return Err(BcsError::invalid(format!(
                "address literal '{}' must have 1 to 64 hex digits",
                literal
            )));
        }
        decode_address_hex(&format!("{:0>64}", digits))
            .map(Self)
            .map_err(|_| BcsError::invalid(format!("address literal '{}' is not hex", literal)))
    }

    pub fn as_bytes(&self) -> &[u8; SUI_ADDRESS_LENGTH] {
        &self.0
    }

    pub fn into_bytes(self) -> [u8; SUI_ADDRESS_LENGTH] {
        self.0
    }

    /// Full 64-digit lowercase hex, optionally `0x`-prefixed.
    pub fn to_canonical_string(&self, with_prefix: bool) -> String {
        if with_prefix {
            format!("0x{}", hex::encode(self.0))
        } else {
            hex::encode(self.0)
        }
    }

    /// Shortest `0x` form with leading zeros trimmed, e.g. `0x2`.
    pub fn to_short_string(&self) -> String {
        let full = hex::encode(self.0);
        let trimmed = full.trim_start_matches('0');
        if trimmed.is_empty() {
            "0x0".to_string()
        } else {
            format!("0x{}", trimmed)
        }
    }
}

impl FromStr for SuiAddress {
    type Err = BcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_address_hex(s).map(Self)
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string(true))
    }
}

impl fmt::Debug for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SuiAddress({})", self.to_short_string())
    }
}

impl From<[u8; SUI_ADDRESS_LENGTH]> for SuiAddress {
    fn from(bytes: [u8; SUI_ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for SuiAddress {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl BcsEncode for SuiAddress {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        w.write_fixed(&self.0);
        Ok(())
    }
}

impl BcsDecode for SuiAddress {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        r.read_fixed().map(Self)
    }
}

impl Serialize for SuiAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string(true))
    }
}

impl<'de> Deserialize<'de> for SuiAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// String normalization
// =============================================================================

/// Normalize an address string to lowercase with 0x prefix and full 64 hex characters.
///
/// # Examples
///
/// ```
/// use sui_txkit_types::address::normalize_address;
///
/// assert_eq!(
///     normalize_address("0x2"),
///     "0x0000000000000000000000000000000000000000000000000000000000000002"
/// );
/// ```
pub fn normalize_address(addr: &str) -> String {
    let addr = addr.trim();
    let hex = addr
        .strip_prefix("0x")
        .or_else(|| addr.strip_prefix("0X"))
        .unwrap_or(addr)
        .to_lowercase();
    format!("0x{:0>64}", hex)
}

/// Normalize an address string to its shortest form (`0x2`).
pub fn normalize_address_short(addr: &str) -> String {
    let normalized = normalize_address(addr);
    let hex = normalized.strip_prefix("0x").unwrap_or(&normalized);
    let trimmed = hex.trim_start_matches('0');
    if trimmed.is_empty() {
        "0x0".to_string()
    } else {
        format!("0x{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sui_txkit_bcs::{from_bytes, to_bytes};

    const FULL_TWO: &str = "0x0000000000000000000000000000000000000000000000000000000000000002";

    #[test]
    fn test_strict_parse() {
        let addr: SuiAddress = FULL_TWO.parse().unwrap();
        assert_eq!(addr, SuiAddress::from_u16(2));
        assert_eq!(addr.to_string(), FULL_TWO);

        assert!(matches!(
            "0x2".parse::<SuiAddress>().unwrap_err(),
            BcsError::InvalidEncoding(_)
        ));
        assert!(matches!(
            format!("0x{}", "g".repeat(64)).parse::<SuiAddress>().unwrap_err(),
            BcsError::InvalidEncoding(_)
        ));
    }

    #[test]
    fn test_hex_literal() {
        assert_eq!(SuiAddress::from_hex_literal("0x2").unwrap(), SuiAddress::from_u16(2));
        assert_eq!(
            SuiAddress::from_hex_literal("0x403").unwrap(),
            SuiAddress::from_u16(0x403)
        );
        assert_eq!(SuiAddress::from_hex_literal(FULL_TWO).unwrap(), SuiAddress::from_u16(2));
        assert!(SuiAddress::from_hex_literal("2").is_err());
        assert!(SuiAddress::from_hex_literal("0x").is_err());
        assert!(SuiAddress::from_hex_literal("0xzz").is_err());
        assert!(SuiAddress::from_hex_literal(&format!("0x1{}", "0".repeat(64))).is_err());
    }

    #[test]
    fn test_short_string() {
        assert_eq!(SuiAddress::from_u16(2).to_short_string(), "0x2");
        assert_eq!(SuiAddress::ZERO.to_short_string(), "0x0");
        assert_eq!(SuiAddress::from_u16(0xdee9).to_short_string(), "0xdee9");
    }

    #[test]
    fn test_fixed_width_encoding() {
        let addr = SuiAddress::new([0xab; 32]);
        let bytes = to_bytes(&addr).unwrap();
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes, vec![0xab; 32]);
        assert_eq!(from_bytes::<SuiAddress>(&bytes).unwrap(), addr);
        assert!(matches!(
            from_bytes::<SuiAddress>(&[0u8; 31]).unwrap_err(),
            BcsError::UnexpectedEof { .. }
        ));
    }

    #[test]
    fn test_json_roundtrip() {
        let addr = SuiAddress::from_u16(6);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"0x{:0>64}\"", "6"));
        let back: SuiAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("0x2"), FULL_TWO);
        assert_eq!(normalize_address("  0X2  "), FULL_TWO);
        assert_eq!(normalize_address_short(FULL_TWO), "0x2");
        assert_eq!(normalize_address_short("0x0"), "0x0");
    }
}
