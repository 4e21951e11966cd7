//! Forward-only byte cursor for decoding.

use crate::error::{BcsError, BcsResult};
use crate::u256::U256;

/// Forward-only decoder over a borrowed buffer. No seeking, no partial results:
/// a failed read leaves the caller with an error, never with a half-built value.
#[derive(Debug)]
pub struct BcsReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BcsReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Fails with [`BcsError::TrailingBytes`] if anything is left unread.
    pub fn finish(&self) -> BcsResult<()> {
        match self.remaining() {
            0 => Ok(()),
            remaining => Err(BcsError::TrailingBytes { remaining }),
        }
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_raw(&mut self, n: usize) -> BcsResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(BcsError::UnexpectedEof {
                offset: self.pos,
                needed: n,
                remaining: self.remaining(),
            });
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    pub fn read_fixed<const N: usize>(&mut self) -> BcsResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_raw(N)?);
        Ok(out)
    }

    // =========================================================================
    // Fixed-width primitives
    // =========================================================================

    pub fn read_u8(&mut self) -> BcsResult<u8> {
        Ok(self.read_raw(1)?[0])
    }

    pub fn read_u16(&mut self) -> BcsResult<u16> {
        Ok(u16::from_le_bytes(self.read_fixed()?))
    }

    pub fn read_u32(&mut self) -> BcsResult<u32> {
        Ok(u32::from_le_bytes(self.read_fixed()?))
    }

    pub fn read_u64(&mut self) -> BcsResult<u64> {
        Ok(u64::from_le_bytes(self.read_fixed()?))
    }

    pub fn read_u128(&mut self) -> BcsResult<u128> {
        Ok(u128::from_le_bytes(self.read_fixed()?))
    }

    pub fn read_u256(&mut self) -> BcsResult<U256> {
        Ok(U256::from_le_bytes(self.read_fixed()?))
    }

    pub fn read_bool(&mut self) -> BcsResult<bool> {
        let offset = self.pos;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(BcsError::invalid(format!(
                "bool at offset {} must be 0 or 1, got {}",
                offset, other
            ))),
        }
    }

    // =========================================================================
    // Variable-length
    // =========================================================================

    /// ULEB128 capped at 32 bits. A fifth byte with the continuation bit set, or a
    /// value above `u32::MAX`, fails with [`BcsError::Overflow`].
    pub fn read_uleb128(&mut self) -> BcsResult<u32> {
        let start = self.pos;
        let mut value: u64 = 0;
        let mut shift = 0u32;
        loop {
            if shift >= 35 {
                return Err(BcsError::Overflow { offset: start });
            }
            let byte = self.read_u8()?;
            value |= u64::from(byte & 0x7f) << shift;
            if byte & 0x80 == 0 {
                if shift > 0 && byte == 0 {
                    return Err(BcsError::invalid(format!(
                        "non-canonical ULEB128 at offset {}",
                        start
                    )));
                }
                return u32::try_from(value).map_err(|_| BcsError::Overflow { offset: start });
            }
            shift += 7;
        }
    }

    pub fn read_len(&mut self) -> BcsResult<usize> {
        Ok(self.read_uleb128()? as usize)
    }

    /// Length-prefixed byte run.
    pub fn read_bytes(&mut self) -> BcsResult<Vec<u8>> {
        let len = self.read_len()?;
        Ok(self.read_raw(len)?.to_vec())
    }

    /// Length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> BcsResult<String> {
        let offset = self.pos;
        let bytes = self.read_bytes()?;
        String::from_utf8(bytes).map_err(|e| {
            BcsError::invalid(format!("string at offset {} is not UTF-8: {}", offset, e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{from_bytes, to_bytes};
    use crate::writer::BcsWriter;
    use proptest::collection;
    use proptest::prelude::*;

    #[test]
    fn test_read_uleb128_values() {
        assert_eq!(BcsReader::new(&[0x00]).read_uleb128().unwrap(), 0);
        assert_eq!(BcsReader::new(&[0x7f]).read_uleb128().unwrap(), 127);
        assert_eq!(BcsReader::new(&[0x80, 0x01]).read_uleb128().unwrap(), 128);
        assert_eq!(
            BcsReader::new(&[0xff, 0xff, 0xff, 0xff, 0x0f])
                .read_uleb128()
                .unwrap(),
            u32::MAX
        );
    }

    #[test]
    fn test_read_uleb128_overflow() {
        let err = BcsReader::new(&[0x80, 0x80, 0x80, 0x80, 0x80, 0x01])
            .read_uleb128()
            .unwrap_err();
        assert_eq!(err, BcsError::Overflow { offset: 0 });

        // 5 bytes but above u32::MAX
        let err = BcsReader::new(&[0xff, 0xff, 0xff, 0xff, 0x1f])
            .read_uleb128()
            .unwrap_err();
        assert_eq!(err, BcsError::Overflow { offset: 0 });
    }

    #[test]
    fn test_read_uleb128_five_continuation_bytes() {
        // five bytes, continuation never clears
        let err = BcsReader::new(&[0x80; 5]).read_uleb128().unwrap_err();
        assert_eq!(err, BcsError::Overflow { offset: 0 });

        let mut r = BcsReader::new(&[0x01, 0x80, 0x80, 0x80, 0x80, 0x80]);
        r.read_u8().unwrap();
        assert_eq!(r.read_uleb128().unwrap_err(), BcsError::Overflow { offset: 1 });
    }

    #[test]
    fn test_read_uleb128_non_canonical() {
        let err = BcsReader::new(&[0x80, 0x00]).read_uleb128().unwrap_err();
        assert!(matches!(err, BcsError::InvalidEncoding(_)));
    }

    #[test]
    fn test_read_bool_rejects_other_bytes() {
        assert!(BcsReader::new(&[1]).read_bool().unwrap());
        assert!(!BcsReader::new(&[0]).read_bool().unwrap());
        assert!(matches!(
            BcsReader::new(&[2]).read_bool().unwrap_err(),
            BcsError::InvalidEncoding(_)
        ));
    }

    #[test]
    fn test_eof_reports_offset() {
        let mut r = BcsReader::new(&[1, 2, 3]);
        r.read_u8().unwrap();
        let err = r.read_u64().unwrap_err();
        assert_eq!(
            err,
            BcsError::UnexpectedEof {
                offset: 1,
                needed: 8,
                remaining: 2
            }
        );
    }

    #[test]
    fn test_truncated_uleb128_is_eof() {
        let err = BcsReader::new(&[0x80]).read_uleb128().unwrap_err();
        assert!(matches!(err, BcsError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_finish_detects_trailing() {
        let mut r = BcsReader::new(&[1, 2]);
        r.read_u8().unwrap();
        assert_eq!(r.finish().unwrap_err(), BcsError::TrailingBytes { remaining: 1 });
    }

    #[test]
    fn test_read_string_rejects_bad_utf8() {
        let err = BcsReader::new(&[2, 0xff, 0xfe]).read_string().unwrap_err();
        assert!(matches!(err, BcsError::InvalidEncoding(_)));
    }

    proptest! {
        #[test]
        fn test_uleb128_roundtrip(value in any::<u32>()) {
            let mut w = BcsWriter::new();
            w.write_uleb128(value);
            let bytes = w.into_bytes();
            prop_assert!(bytes.len() <= 5);
            let mut r = BcsReader::new(&bytes);
            prop_assert_eq!(r.read_uleb128().unwrap(), value);
            prop_assert!(r.is_empty());
        }

        #[test]
        fn test_composite_roundtrip(
            value in collection::vec(
                proptest::option::of((any::<u64>(), (any::<u128>(), ".{0,16}"))),
                0..32,
            )
        ) {
            let bytes = to_bytes(&value).unwrap();
            prop_assert_eq!(&to_bytes(&value).unwrap(), &bytes);
            let decoded: Vec<Option<(u64, (u128, String))>> = from_bytes(&bytes).unwrap();
            prop_assert_eq!(decoded, value);
        }

        // Decoding arbitrary input returns a value or an error, never panics.
        #[test]
        fn test_arbitrary_bytes_do_not_panic(bytes in collection::vec(any::<u8>(), 0..256)) {
            let _ = from_bytes::<Vec<Option<(u16, String)>>>(&bytes);
            let _ = from_bytes::<Vec<Vec<bool>>>(&bytes);
        }
    }
}
