//! Static codec traits.
//!
//! Each type owns its canonical encode/decode pair. Composite impls (`Vec<T>`,
//! `Option<T>`, tuples) are built from the combinators and dispatch statically on
//! the element type, so a type without a codec is a compile error rather than a
//! lookup failure at run time.

use crate::combinators::{decode_option, decode_vec, encode_option, encode_vec};
use crate::error::BcsResult;
use crate::reader::BcsReader;
use crate::u256::U256;
use crate::writer::BcsWriter;

pub trait BcsEncode {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()>;
}

pub trait BcsDecode: Sized {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self>;
}

/// Types with both halves of the codec.
pub trait Bcs: BcsEncode + BcsDecode {}

impl<T: BcsEncode + BcsDecode> Bcs for T {}

macro_rules! fixed_width_codec {
    ($ty:ty, $write:ident, $read:ident) => {
        impl BcsEncode for $ty {
            fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
                w.$write(*self);
                Ok(())
            }
        }

        impl BcsDecode for $ty {
            fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
                r.$read()
            }
        }
    };
}

fixed_width_codec!(u8, write_u8, read_u8);
fixed_width_codec!(u16, write_u16, read_u16);
fixed_width_codec!(u32, write_u32, read_u32);
fixed_width_codec!(u64, write_u64, read_u64);
fixed_width_codec!(u128, write_u128, read_u128);
fixed_width_codec!(bool, write_bool, read_bool);

impl BcsEncode for U256 {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        w.write_u256(self);
        Ok(())
    }
}

impl BcsDecode for U256 {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        r.read_u256()
    }
}

impl BcsEncode for String {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        w.write_str(self)
    }
}

impl BcsEncode for str {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        w.write_str(self)
    }
}

impl BcsDecode for String {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        r.read_string()
    }
}

/// Fixed-size arrays carry no length prefix.
impl<const N: usize> BcsEncode for [u8; N] {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        w.write_fixed(self);
        Ok(())
    }
}

impl<const N: usize> BcsDecode for [u8; N] {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        r.read_fixed()
    }
}

impl<T: BcsEncode> BcsEncode for Vec<T> {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        encode_vec(w, self, |w, item| item.encode(w))
    }
}

impl<T: BcsDecode> BcsDecode for Vec<T> {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_vec(r, T::decode)
    }
}

impl<T: BcsEncode> BcsEncode for Option<T> {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        encode_option(w, self.as_ref(), |w, inner| inner.encode(w))
    }
}

impl<T: BcsDecode> BcsDecode for Option<T> {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_option(r, T::decode)
    }
}

impl<T: BcsEncode + ?Sized> BcsEncode for Box<T> {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        (**self).encode(w)
    }
}

impl<T: BcsDecode> BcsDecode for Box<T> {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        T::decode(r).map(Box::new)
    }
}

impl<T: BcsEncode + ?Sized> BcsEncode for &T {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        (**self).encode(w)
    }
}

impl<A: BcsEncode, B: BcsEncode> BcsEncode for (A, B) {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        self.0.encode(w)?;
        self.1.encode(w)
    }
}

impl<A: BcsDecode, B: BcsDecode> BcsDecode for (A, B) {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        Ok((A::decode(r)?, B::decode(r)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{from_bytes, to_bytes};

    #[test]
    fn test_vec_u8_matches_bytes_encoding() {
        let v: Vec<u8> = vec![1, 2, 3];
        let mut w = BcsWriter::new();
        w.write_bytes(&v).unwrap();
        assert_eq!(to_bytes(&v).unwrap(), w.into_bytes());
    }

    #[test]
    fn test_nested_composites() {
        let value: Vec<Option<(u8, String)>> = vec![Some((1, "a".to_string())), None];
        let bytes = to_bytes(&value).unwrap();
        assert_eq!(bytes, vec![2, 1, 1, 1, b'a', 0]);
        let decoded: Vec<Option<(u8, String)>> = from_bytes(&bytes).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_fixed_array_has_no_prefix() {
        let bytes = to_bytes(&[9u8; 4]).unwrap();
        assert_eq!(bytes, vec![9, 9, 9, 9]);
    }
}
