//! Dynamically typed "pure" values.
//!
//! A pure transaction input is the BCS encoding of a primitive, a vector or an
//! option. When the Move type is only known as text (for example after a
//! function-signature lookup), [`resolve_pure_type`] turns the type string into
//! a [`PureType`] that can encode and decode [`PureValue`]s at run time.
//!
//! Grammar (closed; anything else is [`BcsError::UnknownType`]):
//!
//! ```text
//! pure   := "bool" | "u8" | "u16" | "u32" | "u64" | "u128" | "u256"
//!         | "address" | "string"
//!         | "vector<" pure ">" | "option<" pure ">"
//! ```
//!
//! Struct types are never resolvable here.

use std::fmt;

use num_bigint::BigInt;
use serde_json::Value;
use tracing::trace;

use crate::codec::BcsEncode;
use crate::combinators::{decode_option, decode_vec, encode_option, encode_vec};
use crate::encoding::{decode_address_hex, decode_with, hex_decode, to_bytes};
use crate::error::{BcsError, BcsResult};
use crate::reader::BcsReader;
use crate::u256::{parse_big_int, u128_from_big_int, U256};
use crate::writer::BcsWriter;

// =============================================================================
// Types
// =============================================================================

/// Deepest nesting of `vector`, `option` or struct type arguments accepted when a
/// type is parsed from text or decoded from bytes.
pub const MAX_TYPE_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PureType {
    Bool,
    U8,
    U16,
    U32,
    U64,
    U128,
    U256,
    Address,
    String,
    Vector(Box<PureType>),
    Option(Box<PureType>),
}

impl PureType {
    /// Parse a type name in the pure grammar.
    pub fn parse(type_str: &str) -> BcsResult<Self> {
        Self::parse_nested(type_str, 0)
    }

    fn parse_nested(type_str: &str, depth: usize) -> BcsResult<Self> {
        let s = type_str.trim();
        let ty = match s {
            "bool" => PureType::Bool,
            "u8" => PureType::U8,
            "u16" => PureType::U16,
            "u32" => PureType::U32,
            "u64" => PureType::U64,
            "u128" => PureType::U128,
            "u256" => PureType::U256,
            "address" => PureType::Address,
            "string" => PureType::String,
            _ => {
                if let Some(inner) = strip_generic(s, "vector") {
                    PureType::Vector(Box::new(PureType::parse_nested(inner, nest(depth)?)?))
                } else if let Some(inner) = strip_generic(s, "option") {
                    PureType::Option(Box::new(PureType::parse_nested(inner, nest(depth)?)?))
                } else {
                    return Err(BcsError::UnknownType(s.to_string()));
                }
            }
        };
        Ok(ty)
    }

    /// Check that `value` has this type, then write it.
    pub fn encode(&self, value: &PureValue, w: &mut BcsWriter) -> BcsResult<()> {
        self.check(value)?;
        value.encode(w)
    }

    pub fn decode(&self, r: &mut BcsReader<'_>) -> BcsResult<PureValue> {
        let value = match self {
            PureType::Bool => PureValue::Bool(r.read_bool()?),
            PureType::U8 => PureValue::U8(r.read_u8()?),
            PureType::U16 => PureValue::U16(r.read_u16()?),
            PureType::U32 => PureValue::U32(r.read_u32()?),
            PureType::U64 => PureValue::U64(r.read_u64()?),
            PureType::U128 => PureValue::U128(r.read_u128()?),
            PureType::U256 => PureValue::U256(r.read_u256()?),
            PureType::Address => PureValue::Address(r.read_fixed()?),
            PureType::String => PureValue::String(r.read_string()?),
            PureType::Vector(inner) => PureValue::Vector(decode_vec(r, |r| inner.decode(r))?),
            PureType::Option(inner) => {
                PureValue::Option(decode_option(r, |r| inner.decode(r))?.map(Box::new))
            }
        };
        Ok(value)
    }

    /// Structural type check, recursing into vectors and options.
    pub fn check(&self, value: &PureValue) -> BcsResult<()> {
        let ok = match (self, value) {
            (PureType::Bool, PureValue::Bool(_))
            | (PureType::U8, PureValue::U8(_))
            | (PureType::U16, PureValue::U16(_))
            | (PureType::U32, PureValue::U32(_))
            | (PureType::U64, PureValue::U64(_))
            | (PureType::U128, PureValue::U128(_))
            | (PureType::U256, PureValue::U256(_))
            | (PureType::Address, PureValue::Address(_))
            | (PureType::String, PureValue::String(_)) => true,
            (PureType::Vector(inner), PureValue::Vector(items)) => {
                for item in items {
                    inner.check(item)?;
                }
                true
            }
            (PureType::Option(_), PureValue::Option(None)) => true,
            (PureType::Option(inner), PureValue::Option(Some(item))) => {
                inner.check(item)?;
                true
            }
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(BcsError::invalid(format!(
                "value {} does not have type {}",
                value.kind(),
                self
            )))
        }
    }
}

impl fmt::Display for PureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PureType::Bool => write!(f, "bool"),
            PureType::U8 => write!(f, "u8"),
            PureType::U16 => write!(f, "u16"),
            PureType::U32 => write!(f, "u32"),
            PureType::U64 => write!(f, "u64"),
            PureType::U128 => write!(f, "u128"),
            PureType::U256 => write!(f, "u256"),
            PureType::Address => write!(f, "address"),
            PureType::String => write!(f, "string"),
            PureType::Vector(inner) => write!(f, "vector<{}>", inner),
            PureType::Option(inner) => write!(f, "option<{}>", inner),
        }
    }
}

fn nest(depth: usize) -> BcsResult<usize> {
    if depth >= MAX_TYPE_DEPTH {
        return Err(BcsError::parse(format!(
            "type nests deeper than {} levels",
            MAX_TYPE_DEPTH
        )));
    }
    Ok(depth + 1)
}

fn strip_generic<'a>(s: &'a str, head: &str) -> Option<&'a str> {
    s.strip_prefix(head)?
        .trim_start()
        .strip_prefix('<')?
        .strip_suffix('>')
}

// =============================================================================
// Values
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PureValue {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(U256),
    Address([u8; 32]),
    String(String),
    Vector(Vec<PureValue>),
    Option(Option<Box<PureValue>>),
}

impl PureValue {
    /// Name of the value's shape, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            PureValue::Bool(_) => "bool",
            PureValue::U8(_) => "u8",
            PureValue::U16(_) => "u16",
            PureValue::U32(_) => "u32",
            PureValue::U64(_) => "u64",
            PureValue::U128(_) => "u128",
            PureValue::U256(_) => "u256",
            PureValue::Address(_) => "address",
            PureValue::String(_) => "string",
            PureValue::Vector(_) => "vector",
            PureValue::Option(_) => "option",
        }
    }

    /// Build a value of type `ty` from JSON.
    ///
    /// Integers accept JSON numbers or decimal/`0x` strings; `u64` and wider are
    /// usually passed as strings. `vector<u8>` also accepts a `0x` hex string.
    /// `option<T>` maps `null` to none. When `T` is itself an option, a present value
    /// is wrapped in a one-element array (`[null]` is some-of-none) so the two
    /// levels stay distinct.
    pub fn from_json(ty: &PureType, json: &Value) -> BcsResult<Self> {
        let value = match ty {
            PureType::Bool => PureValue::Bool(
                json.as_bool()
                    .ok_or_else(|| mismatch(ty, json))?,
            ),
            PureType::U8 => PureValue::U8(narrow(ty, &json_integer(ty, json)?)?),
            PureType::U16 => PureValue::U16(narrow(ty, &json_integer(ty, json)?)?),
            PureType::U32 => PureValue::U32(narrow(ty, &json_integer(ty, json)?)?),
            PureType::U64 => PureValue::U64(narrow(ty, &json_integer(ty, json)?)?),
            PureType::U128 => PureValue::U128(u128_from_big_int(&json_integer(ty, json)?)?),
            PureType::U256 => PureValue::U256(U256::try_from_big_int(&json_integer(ty, json)?)?),
            PureType::Address => {
                let s = json.as_str().ok_or_else(|| mismatch(ty, json))?;
                PureValue::Address(decode_address_hex(s)?)
            }
            PureType::String => {
                PureValue::String(json.as_str().ok_or_else(|| mismatch(ty, json))?.to_string())
            }
            PureType::Vector(inner) => match json {
                Value::String(s) if **inner == PureType::U8 => PureValue::Vector(
                    hex_decode(s, "vector<u8>")?
                        .into_iter()
                        .map(PureValue::U8)
                        .collect(),
                ),
                Value::Array(items) => PureValue::Vector(
                    items
                        .iter()
                        .map(|item| PureValue::from_json(inner, item))
                        .collect::<BcsResult<Vec<_>>>()?,
                ),
                _ => return Err(mismatch(ty, json)),
            },
            PureType::Option(inner) => match (json, &**inner) {
                (Value::Null, _) => PureValue::Option(None),
                (Value::Array(items), PureType::Option(_)) if items.len() == 1 => {
                    PureValue::Option(Some(Box::new(PureValue::from_json(inner, &items[0])?)))
                }
                (_, PureType::Option(_)) => return Err(mismatch(ty, json)),
                (other, _) => {
                    PureValue::Option(Some(Box::new(PureValue::from_json(inner, other)?)))
                }
            },
        };
        Ok(value)
    }

    /// JSON view: integers up to `u32` as numbers, wider ones as decimal strings,
    /// addresses as full `0x` hex. A present option holding another option is
    /// written as a one-element array, matching [`PureValue::from_json`].
    pub fn to_json(&self) -> Value {
        match self {
            PureValue::Bool(v) => Value::Bool(*v),
            PureValue::U8(v) => Value::from(*v),
            PureValue::U16(v) => Value::from(*v),
            PureValue::U32(v) => Value::from(*v),
            PureValue::U64(v) => Value::String(v.to_string()),
            PureValue::U128(v) => Value::String(v.to_string()),
            PureValue::U256(v) => Value::String(v.to_string()),
            PureValue::Address(bytes) => Value::String(format!("0x{}", hex::encode(bytes))),
            PureValue::String(s) => Value::String(s.clone()),
            PureValue::Vector(items) => Value::Array(items.iter().map(PureValue::to_json).collect()),
            PureValue::Option(None) => Value::Null,
            PureValue::Option(Some(inner)) => match **inner {
                PureValue::Option(_) => Value::Array(vec![inner.to_json()]),
                _ => inner.to_json(),
            },
        }
    }
}

/// Encoding a pure value does not need its type: vectors and options have the
/// same framing whatever the element type.
impl BcsEncode for PureValue {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        match self {
            PureValue::Bool(v) => w.write_bool(*v),
            PureValue::U8(v) => w.write_u8(*v),
            PureValue::U16(v) => w.write_u16(*v),
            PureValue::U32(v) => w.write_u32(*v),
            PureValue::U64(v) => w.write_u64(*v),
            PureValue::U128(v) => w.write_u128(*v),
            PureValue::U256(v) => w.write_u256(v),
            PureValue::Address(bytes) => w.write_fixed(bytes),
            PureValue::String(s) => w.write_str(s)?,
            PureValue::Vector(items) => encode_vec(w, items, |w, item| item.encode(w))?,
            PureValue::Option(inner) => {
                encode_option(w, inner.as_deref(), |w, item| item.encode(w))?
            }
        }
        Ok(())
    }
}

macro_rules! pure_value_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for PureValue {
                fn from(value: $ty) -> Self {
                    PureValue::$variant(value)
                }
            }
        )*
    };
}

pure_value_from! {
    bool => Bool,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    U256 => U256,
    String => String,
}

impl From<&str> for PureValue {
    fn from(value: &str) -> Self {
        PureValue::String(value.to_string())
    }
}

fn mismatch(ty: &PureType, json: &Value) -> BcsError {
    BcsError::invalid(format!("JSON {} is not a valid {}", json, ty))
}

fn json_integer(ty: &PureType, json: &Value) -> BcsResult<BigInt> {
    match json {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Ok(BigInt::from(u))
            } else if let Some(i) = n.as_i64() {
                Ok(BigInt::from(i))
            } else {
                Err(mismatch(ty, json))
            }
        }
        Value::String(s) => parse_big_int(s),
        _ => Err(mismatch(ty, json)),
    }
}

fn narrow<T: TryFrom<BigInt>>(ty: &PureType, value: &BigInt) -> BcsResult<T> {
    T::try_from(value.clone()).map_err(|_| BcsError::range(format!("{} does not fit {}", value, ty)))
}

// =============================================================================
// Dynamic resolution
// =============================================================================

/// A codec resolved from a type string at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PureCodec {
    ty: PureType,
}

impl PureCodec {
    pub fn new(ty: PureType) -> Self {
        Self { ty }
    }

    pub fn pure_type(&self) -> &PureType {
        &self.ty
    }

    pub fn encode(&self, value: &PureValue) -> BcsResult<Vec<u8>> {
        self.ty.check(value)?;
        to_bytes(value)
    }

    pub fn decode(&self, bytes: &[u8]) -> BcsResult<PureValue> {
        decode_with(bytes, |r| self.ty.decode(r))
    }
}

/// Resolve a type string in the pure grammar into a codec.
pub fn resolve_pure_type(type_str: &str) -> BcsResult<PureCodec> {
    let ty = PureType::parse(type_str)?;
    trace!(type_str, resolved = %ty, "resolved pure type");
    Ok(PureCodec::new(ty))
}

pub fn encode_pure(type_str: &str, value: &PureValue) -> BcsResult<Vec<u8>> {
    resolve_pure_type(type_str)?.encode(value)
}

pub fn decode_pure(type_str: &str, bytes: &[u8]) -> BcsResult<PureValue> {
    resolve_pure_type(type_str)?.decode(bytes)
}

pub fn encode_pure_json(type_str: &str, json: &Value) -> BcsResult<Vec<u8>> {
    let codec = resolve_pure_type(type_str)?;
    let value = PureValue::from_json(codec.pure_type(), json)?;
    codec.encode(&value)
}

pub fn decode_pure_json(type_str: &str, bytes: &[u8]) -> BcsResult<Value> {
    Ok(decode_pure(type_str, bytes)?.to_json())
}
