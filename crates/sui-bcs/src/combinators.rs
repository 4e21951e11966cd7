//! Composite encodings parameterized by caller-supplied element codecs.
//!
//! | Shape | Encoding |
//! |-------|----------|
//! | `vector<T>` | ULEB128 count, then each element |
//! | `option<T>` | `0` for none, `1` + payload for some |
//! | enum | discriminant (width declared per type) + variant payload |
//! | struct | fields in declaration order, no framing |
//!
//! Element codecs are plain closures, so a caller can encode a `Vec<T>` with a
//! codec other than `T`'s own trait impl (e.g. digests as length-prefixed bytes).

use crate::error::{BcsError, BcsResult};
use crate::reader::BcsReader;
use crate::writer::BcsWriter;

/// Width of an enum discriminant on the wire.
///
/// Most transaction-graph unions use a single byte. The version wrapper around
/// transaction effects and the execution status use a 4-byte little-endian tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscriminantWidth {
    U8,
    U32,
}

pub fn encode_vec<T, F>(w: &mut BcsWriter, items: &[T], mut encode: F) -> BcsResult<()>
where
    F: FnMut(&mut BcsWriter, &T) -> BcsResult<()>,
{
    w.write_len(items.len())?;
    for item in items {
        encode(w, item)?;
    }
    Ok(())
}

/// Decode a counted sequence. Stops at the first element error.
pub fn decode_vec<T, F>(r: &mut BcsReader<'_>, mut decode: F) -> BcsResult<Vec<T>>
where
    F: FnMut(&mut BcsReader<'_>) -> BcsResult<T>,
{
    let len = r.read_len()?;
    // Every element takes at least one byte, so a count larger than the rest of the
    // buffer is already an EOF; avoid allocating for it.
    let mut items = Vec::with_capacity(len.min(r.remaining()));
    for _ in 0..len {
        items.push(decode(r)?);
    }
    Ok(items)
}

pub fn encode_option<T, F>(w: &mut BcsWriter, value: Option<&T>, encode: F) -> BcsResult<()>
where
    F: FnOnce(&mut BcsWriter, &T) -> BcsResult<()>,
{
    match value {
        None => {
            w.write_u8(0);
            Ok(())
        }
        Some(inner) => {
            w.write_u8(1);
            encode(w, inner)
        }
    }
}

pub fn decode_option<T, F>(r: &mut BcsReader<'_>, decode: F) -> BcsResult<Option<T>>
where
    F: FnOnce(&mut BcsReader<'_>) -> BcsResult<T>,
{
    let offset = r.offset();
    match r.read_u8()? {
        0 => Ok(None),
        1 => decode(r).map(Some),
        tag => Err(BcsError::invalid(format!(
            "option tag at offset {} must be 0 or 1, got {}",
            offset, tag
        ))),
    }
}

pub fn write_discriminant(
    w: &mut BcsWriter,
    width: DiscriminantWidth,
    tag: u32,
) -> BcsResult<()> {
    match width {
        DiscriminantWidth::U8 => {
            let byte = u8::try_from(tag)
                .map_err(|_| BcsError::range(format!("discriminant {} exceeds one byte", tag)))?;
            w.write_u8(byte);
        }
        DiscriminantWidth::U32 => w.write_u32(tag),
    }
    Ok(())
}

pub fn read_discriminant(r: &mut BcsReader<'_>, width: DiscriminantWidth) -> BcsResult<u32> {
    match width {
        DiscriminantWidth::U8 => r.read_u8().map(u32::from),
        DiscriminantWidth::U32 => r.read_u32(),
    }
}

/// Tagged union: discriminant then payload.
pub fn encode_enum<F>(
    w: &mut BcsWriter,
    width: DiscriminantWidth,
    tag: u32,
    payload: F,
) -> BcsResult<()>
where
    F: FnOnce(&mut BcsWriter) -> BcsResult<()>,
{
    write_discriminant(w, width, tag)?;
    payload(w)
}

/// Tagged union: read the discriminant and hand it to a per-variant decoder.
/// The decoder is expected to return [`BcsError::UnknownVariant`] for tags it
/// does not know.
pub fn decode_enum<T, F>(r: &mut BcsReader<'_>, width: DiscriminantWidth, decode: F) -> BcsResult<T>
where
    F: FnOnce(u32, &mut BcsReader<'_>) -> BcsResult<T>,
{
    let tag = read_discriminant(r, width)?;
    decode(tag, r)
}
