//! Append-only byte sink for encoding.

use crate::error::{BcsError, BcsResult};
use crate::u256::U256;

/// Largest length/count the ULEB128 prefix may carry.
pub const MAX_ULEB128_VALUE: u64 = u32::MAX as u64;

/// Append-only encoder. Each encode call owns a fresh writer; writers are not shared.
#[derive(Debug, Default)]
pub struct BcsWriter {
    buf: Vec<u8>,
}

impl BcsWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    // =========================================================================
    // Fixed-width primitives
    // =========================================================================

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u128(&mut self, value: u128) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u256(&mut self, value: &U256) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(u8::from(value));
    }

    /// Raw bytes with no length prefix (addresses, pre-sized fields).
    pub fn write_fixed(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    // =========================================================================
    // Variable-length
    // =========================================================================

    /// ULEB128: 7 payload bits per byte, high bit set on every byte but the last.
    pub fn write_uleb128(&mut self, mut value: u32) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                return;
            }
            self.buf.push(byte | 0x80);
        }
    }

    /// Length or element count prefix. Fails if the count does not fit 32 bits.
    pub fn write_len(&mut self, len: usize) -> BcsResult<()> {
        if len as u64 > MAX_ULEB128_VALUE {
            return Err(BcsError::range(format!(
                "length {} exceeds the 32-bit ULEB128 limit",
                len
            )));
        }
        self.write_uleb128(len as u32);
        Ok(())
    }

    /// Length-prefixed byte run.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> BcsResult<()> {
        self.write_len(bytes.len())?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Length-prefixed UTF-8 string.
    pub fn write_str(&mut self, value: &str) -> BcsResult<()> {
        self.write_bytes(value.as_bytes())
    }
}
