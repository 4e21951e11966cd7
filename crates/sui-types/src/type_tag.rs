//! Move type descriptors.
//!
//! [`TypeTag`] is both a wire type (type arguments of a MoveCall, the element type of
//! `MakeMoveVec`) and a run-time descriptor for pure arguments. The binary
//! discriminants keep their historical, non-monotonic order:
//!
//! | tag | type | tag | type |
//! |-----|------|-----|------|
//! | 0 | bool | 6 | vector |
//! | 1 | u8 | 7 | struct |
//! | 2 | u64 | 8 | u16 |
//! | 3 | u128 | 9 | u32 |
//! | 4 | address | 10 | u256 |
//! | 5 | signer | | |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sui_txkit_bcs::combinators::{decode_enum, decode_vec, encode_enum};
use sui_txkit_bcs::{
    BcsDecode, BcsEncode, BcsError, BcsReader, BcsResult, BcsWriter, DiscriminantWidth,
    MAX_TYPE_DEPTH,
};

use crate::address::SuiAddress;
use crate::type_parsing::{is_valid_identifier, parse_struct_tag, parse_type_tag};

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TypeTag {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    Signer,
    Vector(Box<TypeTag>),
    Struct(Box<StructTag>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StructTag {
    pub address: SuiAddress,
    pub module: String,
    pub name: String,
    pub type_params: Vec<TypeTag>,
}

impl TypeTag {
    pub fn vector(inner: TypeTag) -> Self {
        TypeTag::Vector(Box::new(inner))
    }

    pub fn is_primitive(&self) -> bool {
        !matches!(self, TypeTag::Vector(_) | TypeTag::Struct(_))
    }

    pub fn as_struct(&self) -> Option<&StructTag> {
        match self {
            TypeTag::Struct(s) => Some(s),
            _ => None,
        }
    }

    /// Print the type. Addresses come out in short form (`0x2`) regardless of how
    /// they were written when parsed; `normalize_addresses` switches every address
    /// to its full 32-byte form instead. The address value, not its spelling, is
    /// what the tag stores.
    pub fn to_canonical_string(&self, normalize_addresses: bool) -> String {
        let mut out = String::new();
        self.write_to(&mut out, normalize_addresses);
        out
    }

    fn write_to(&self, out: &mut String, normalize: bool) {
        let keyword = match self {
            TypeTag::Bool => "bool",
            TypeTag::U8 => "u8",
            TypeTag::U16 => "u16",
            TypeTag::U32 => "u32",
            TypeTag::U64 => "u64",
            TypeTag::U128 => "u128",
            TypeTag::U256 => "u256",
            TypeTag::Address => "address",
            TypeTag::Signer => "signer",
            TypeTag::Vector(inner) => {
                out.push_str("vector<");
                inner.write_to(out, normalize);
                out.push('>');
                return;
            }
            TypeTag::Struct(s) => {
                s.write_to(out, normalize);
                return;
            }
        };
        out.push_str(keyword);
    }
}

impl StructTag {
    /// `true` if this is `address::module::name`, ignoring type parameters.
    pub fn is(&self, address: &SuiAddress, module: &str, name: &str) -> bool {
        self.address == *address && self.module == module && self.name == name
    }

    pub fn to_canonical_string(&self, normalize_addresses: bool) -> String {
        let mut out = String::new();
        self.write_to(&mut out, normalize_addresses);
        out
    }

    fn write_to(&self, out: &mut String, normalize: bool) {
        if normalize {
            out.push_str(&self.address.to_canonical_string(true));
        } else {
            out.push_str(&self.address.to_short_string());
        }
        out.push_str("::");
        out.push_str(&self.module);
        out.push_str("::");
        out.push_str(&self.name);
        if !self.type_params.is_empty() {
            out.push('<');
            for (i, param) in self.type_params.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                param.write_to(out, normalize);
            }
            out.push('>');
        }
    }
}

/// Short-address form, see [`TypeTag::to_canonical_string`].
impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string(false))
    }
}

impl fmt::Display for StructTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical_string(false))
    }
}

impl FromStr for TypeTag {
    type Err = BcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_type_tag(s)
    }
}

impl FromStr for StructTag {
    type Err = BcsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_struct_tag(s)
    }
}

// =============================================================================
// Binary form
// =============================================================================

impl BcsEncode for TypeTag {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        let tag = match self {
            TypeTag::Bool => 0,
            TypeTag::U8 => 1,
            TypeTag::U64 => 2,
            TypeTag::U128 => 3,
            TypeTag::Address => 4,
            TypeTag::Signer => 5,
            TypeTag::Vector(_) => 6,
            TypeTag::Struct(_) => 7,
            TypeTag::U16 => 8,
            TypeTag::U32 => 9,
            TypeTag::U256 => 10,
        };
        encode_enum(w, DiscriminantWidth::U8, tag, |w| match self {
            TypeTag::Vector(inner) => inner.encode(w),
            TypeTag::Struct(s) => s.encode(w),
            _ => Ok(()),
        })
    }
}

impl BcsDecode for TypeTag {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_type_tag(r, 0)
    }
}

/// Vector and struct tags recurse; `depth` counts the enclosing levels.
fn decode_type_tag(r: &mut BcsReader<'_>, depth: usize) -> BcsResult<TypeTag> {
    let offset = r.offset();
    decode_enum(r, DiscriminantWidth::U8, |tag, r| {
        Ok(match tag {
            0 => TypeTag::Bool,
            1 => TypeTag::U8,
            2 => TypeTag::U64,
            3 => TypeTag::U128,
            4 => TypeTag::Address,
            5 => TypeTag::Signer,
            6 => TypeTag::Vector(Box::new(decode_type_tag(r, descend(depth, offset)?)?)),
            7 => TypeTag::Struct(Box::new(decode_struct_tag(r, descend(depth, offset)?)?)),
            8 => TypeTag::U16,
            9 => TypeTag::U32,
            10 => TypeTag::U256,
            other => return Err(BcsError::unknown_variant("TypeTag", other)),
        })
    })
}

fn descend(depth: usize, offset: usize) -> BcsResult<usize> {
    if depth >= MAX_TYPE_DEPTH {
        return Err(BcsError::invalid(format!(
            "type tag at offset {} nests deeper than {} levels",
            offset, MAX_TYPE_DEPTH
        )));
    }
    Ok(depth + 1)
}

impl BcsEncode for StructTag {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        self.address.encode(w)?;
        w.write_str(&self.module)?;
        w.write_str(&self.name)?;
        self.type_params.encode(w)
    }
}

impl BcsDecode for StructTag {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_struct_tag(r, 0)
    }
}

fn decode_struct_tag(r: &mut BcsReader<'_>, depth: usize) -> BcsResult<StructTag> {
    let address = SuiAddress::decode(r)?;
    let module = decode_identifier(r)?;
    let name = decode_identifier(r)?;
    let type_params = decode_vec(r, |r| decode_type_tag(r, depth))?;
    Ok(StructTag {
        address,
        module,
        name,
        type_params,
    })
}

fn decode_identifier(r: &mut BcsReader<'_>) -> BcsResult<String> {
    let offset = r.offset();
    let ident = r.read_string()?;
    if !is_valid_identifier(&ident) {
        return Err(BcsError::invalid(format!(
            "'{}' at offset {} is not a valid Move identifier",
            ident, offset
        )));
    }
    Ok(ident)
}

// Type tags travel as their string form in JSON output.

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TypeTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::SUI_FRAMEWORK;
    use sui_txkit_bcs::{from_bytes, to_bytes};

    fn sui_type() -> TypeTag {
        "0x2::sui::SUI".parse().unwrap()
    }

    fn coin_type(inner: TypeTag) -> TypeTag {
        TypeTag::Struct(Box::new(StructTag {
            address: SUI_FRAMEWORK,
            module: "coin".to_string(),
            name: "Coin".to_string(),
            type_params: vec![inner],
        }))
    }

    #[test]
    fn test_historical_discriminants() {
        assert_eq!(to_bytes(&TypeTag::Bool).unwrap(), vec![0]);
        assert_eq!(to_bytes(&TypeTag::U64).unwrap(), vec![2]);
        assert_eq!(to_bytes(&TypeTag::U16).unwrap(), vec![8]);
        assert_eq!(to_bytes(&TypeTag::U32).unwrap(), vec![9]);
        assert_eq!(to_bytes(&TypeTag::U256).unwrap(), vec![10]);
        assert_eq!(to_bytes(&TypeTag::vector(TypeTag::U8)).unwrap(), vec![6, 1]);
    }

    #[test]
    fn test_struct_tag_encoding() {
        let bytes = to_bytes(&sui_type()).unwrap();
        let mut expected = vec![7];
        expected.extend_from_slice(SUI_FRAMEWORK.as_bytes());
        expected.extend_from_slice(&[3, b's', b'u', b'i', 3, b'S', b'U', b'I', 0]);
        assert_eq!(bytes, expected);
        assert_eq!(from_bytes::<TypeTag>(&bytes).unwrap(), sui_type());
    }

    #[test]
    fn test_nested_roundtrip() {
        let tag = TypeTag::vector(coin_type(sui_type()));
        let bytes = to_bytes(&tag).unwrap();
        assert_eq!(from_bytes::<TypeTag>(&bytes).unwrap(), tag);
    }

    #[test]
    fn test_decode_nesting_limit() {
        let mut at_limit = vec![6u8; MAX_TYPE_DEPTH];
        at_limit.push(1);
        assert!(from_bytes::<TypeTag>(&at_limit).is_ok());

        let mut deep_vector = vec![6u8; 100_000];
        deep_vector.push(1);
        assert!(matches!(
            from_bytes::<TypeTag>(&deep_vector).unwrap_err(),
            BcsError::InvalidEncoding(_)
        ));

        let mut deep_struct = Vec::new();
        for _ in 0..200 {
            deep_struct.push(7);
            deep_struct.extend_from_slice(SUI_FRAMEWORK.as_bytes());
            deep_struct.extend_from_slice(&[1, b'm', 1, b'S', 1]);
        }
        deep_struct.push(1);
        assert!(matches!(
            from_bytes::<TypeTag>(&deep_struct).unwrap_err(),
            BcsError::InvalidEncoding(_)
        ));
    }

    #[test]
    fn test_full_width_input_prints_short() {
        let full = "0x0000000000000000000000000000000000000000000000000000000000000002::sui::SUI";
        let tag: TypeTag = full.parse().unwrap();
        assert_eq!(tag, sui_type());
        assert_eq!(tag.to_string(), "0x2::sui::SUI");
        assert_eq!(tag.to_canonical_string(true), full);
    }

    #[test]
    fn test_unknown_discriminant() {
        assert_eq!(
            from_bytes::<TypeTag>(&[11]).unwrap_err(),
            BcsError::UnknownVariant {
                type_name: "TypeTag",
                tag: 11
            }
        );
    }

    #[test]
    fn test_decode_rejects_bad_identifier() {
        let mut bytes = vec![7];
        bytes.extend_from_slice(SUI_FRAMEWORK.as_bytes());
        bytes.extend_from_slice(&[3, b'1', b'a', b'b', 1, b'X', 0]);
        assert!(matches!(
            from_bytes::<TypeTag>(&bytes).unwrap_err(),
            BcsError::InvalidEncoding(_)
        ));
    }

    #[test]
    fn test_normalized_printing() {
        let tag = coin_type(sui_type());
        let full = tag.to_canonical_string(true);
        assert!(full.starts_with("0x0000000000000000000000000000000000000000000000000000000000000002::coin::Coin<"));
        assert_eq!(full.parse::<TypeTag>().unwrap(), tag);
    }
}
