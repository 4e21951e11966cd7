//! Byte, Base64 and Hex entry points.
//!
//! Every entry point takes an explicit codec: either the type's own
//! [`BcsEncode`]/[`BcsDecode`] impl, or a closure for the `*_with` variants.
//! Decoding always consumes the whole buffer; leftover bytes are an error.

use base64::Engine;

use crate::codec::{BcsDecode, BcsEncode};
use crate::error::{BcsError, BcsResult};
use crate::reader::BcsReader;
use crate::writer::BcsWriter;

// =============================================================================
// Bytes
// =============================================================================

pub fn to_bytes<T: BcsEncode + ?Sized>(value: &T) -> BcsResult<Vec<u8>> {
    let mut w = BcsWriter::new();
    value.encode(&mut w)?;
    Ok(w.into_bytes())
}

pub fn from_bytes<T: BcsDecode>(bytes: &[u8]) -> BcsResult<T> {
    let mut r = BcsReader::new(bytes);
    let value = T::decode(&mut r)?;
    r.finish()?;
    Ok(value)
}

/// Encode with a caller-supplied codec.
pub fn encode_with<F>(encode: F) -> BcsResult<Vec<u8>>
where
    F: FnOnce(&mut BcsWriter) -> BcsResult<()>,
{
    let mut w = BcsWriter::new();
    encode(&mut w)?;
    Ok(w.into_bytes())
}

/// Decode the whole buffer with a caller-supplied codec.
pub fn decode_with<T, F>(bytes: &[u8], decode: F) -> BcsResult<T>
where
    F: FnOnce(&mut BcsReader<'_>) -> BcsResult<T>,
{
    let mut r = BcsReader::new(bytes);
    let value = decode(&mut r)?;
    r.finish()?;
    Ok(value)
}

// =============================================================================
// Base64
// =============================================================================

/// Encode bytes to a standard (padded) Base64 string.
pub fn base64_encode(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

/// Decode a standard Base64 string, naming `context` in the error.
pub fn base64_decode(b64: &str, context: &str) -> BcsResult<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|e| BcsError::Encoding(format!("{} is not valid base64: {}", context, e)))
}

pub fn to_base64<T: BcsEncode + ?Sized>(value: &T) -> BcsResult<String> {
    Ok(base64_encode(&to_bytes(value)?))
}

pub fn from_base64<T: BcsDecode>(b64: &str) -> BcsResult<T> {
    from_bytes(&base64_decode(b64, "BCS payload")?)
}

// =============================================================================
// Hex
// =============================================================================

/// Lowercase hex, no prefix.
pub fn hex_encode(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex with or without a `0x` prefix, naming `context` in the error.
pub fn hex_decode(hex_str: &str, context: &str) -> BcsResult<Vec<u8>> {
    let trimmed = hex_str.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits)
        .map_err(|e| BcsError::Encoding(format!("{} is not valid hex '{}': {}", context, hex_str, e)))
}

pub fn to_hex<T: BcsEncode + ?Sized>(value: &T) -> BcsResult<String> {
    Ok(hex_encode(&to_bytes(value)?))
}

pub fn from_hex<T: BcsDecode>(hex_str: &str) -> BcsResult<T> {
    from_bytes(&hex_decode(hex_str, "BCS payload")?)
}

/// Parse a full-width account address: optional `0x` followed by exactly 64 hex digits.
///
/// Short forms such as `0x2` are rejected here; type-tag parsing has its own,
/// more lenient address rule.
pub fn decode_address_hex(s: &str) -> BcsResult<[u8; 32]> {
    let trimmed = s.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.len() != 64 {
        return Err(BcsError::invalid(format!(
            "address '{}' must have 64 hex characters, found {}",
            s,
            digits.len()
        )));
    }
    let bytes = hex::decode(digits)
        .map_err(|e| BcsError::invalid(format!("address '{}' is not hex: {}", s, e)))?;
    let mut out = [0u8; 32];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// Accept either `0x`-prefixed hex or Base64 text.
///
/// Used by the CLI and by callers that receive payloads from mixed sources.
pub fn decode_text(input: &str, context: &str) -> BcsResult<Vec<u8>> {
    let trimmed = input.trim();
    if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        hex_decode(trimmed, context)
    } else {
        base64_decode(trimmed, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_roundtrip() {
        let encoded = to_base64(&vec![1u64, 2]).unwrap();
        let decoded: Vec<u64> = from_base64(&encoded).unwrap();
        assert_eq!(decoded, vec![1, 2]);
    }

    #[test]
    fn test_hex_accepts_prefix() {
        assert_eq!(to_hex(&1u16).unwrap(), "0100");
        assert_eq!(from_hex::<u16>("0x0100").unwrap(), 1);
        assert_eq!(from_hex::<u16>("0100").unwrap(), 1);
    }

    #[test]
    fn test_from_bytes_rejects_trailing() {
        let err = from_bytes::<u8>(&[1, 2]).unwrap_err();
        assert_eq!(err, BcsError::TrailingBytes { remaining: 1 });
    }

    #[test]
    fn test_base64_decode_error_names_context() {
        let err = base64_decode("not-valid-base64!!!", "tx bytes").unwrap_err();
        assert!(err.to_string().contains("tx bytes"));
    }

    #[test]
    fn test_decode_address_hex_is_strict() {
        let full = format!("0x{}", "ab".repeat(32));
        assert_eq!(decode_address_hex(&full).unwrap(), [0xab; 32]);
        assert_eq!(decode_address_hex(&"ab".repeat(32)).unwrap(), [0xab; 32]);
        assert!(matches!(
            decode_address_hex("0x2").unwrap_err(),
            BcsError::InvalidEncoding(_)
        ));
        assert!(matches!(
            decode_address_hex(&format!("0x{}", "zz".repeat(32))).unwrap_err(),
            BcsError::InvalidEncoding(_)
        ));
    }

    #[test]
    fn test_decode_text_dispatch() {
        assert_eq!(decode_text("0x0102", "t").unwrap(), vec![1, 2]);
        assert_eq!(decode_text("AQI=", "t").unwrap(), vec![1, 2]);
    }

    #[test]
    fn test_encode_with_explicit_codec() {
        let bytes = encode_with(|w| {
            w.write_u8(1);
            w.write_u16(7);
            Ok(())
        })
        .unwrap();
        assert_eq!(bytes, vec![1, 7, 0]);
        let (a, b) = decode_with(&bytes, |r| Ok((r.read_u8()?, r.read_u16()?))).unwrap();
        assert_eq!((a, b), (1, 7));
    }
}
