//! Error taxonomy for the BCS codec.
//!
//! Every encode/decode function either succeeds completely or returns one of
//! these errors. Nothing here is recoverable at the codec level: callers abort
//! the operation that triggered serialization and report the kind.

use thiserror::Error;

/// Result alias used throughout the codec.
pub type BcsResult<T> = Result<T, BcsError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BcsError {
    /// Decode tried to read past the end of the buffer.
    #[error("unexpected end of input at offset {offset}: needed {needed} byte(s), {remaining} remaining")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    /// A value failed a validity check (non 0/1 bool, bad address length, bad UTF-8, ...).
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    /// A value does not fit its target width (negative, or too many significant bytes).
    #[error("value out of range: {0}")]
    RangeError(String),

    /// A ULEB128 value needs more than 32 bits.
    #[error("ULEB128 value at offset {offset} exceeds 32 bits")]
    Overflow { offset: usize },

    /// A discriminant outside the closed variant set of a tagged union.
    #[error("unknown variant {tag} for {type_name}")]
    UnknownVariant { type_name: &'static str, tag: u32 },

    /// A type name outside the closed grammar, or one nobody registered.
    #[error("unknown type: {0}")]
    UnknownType(String),

    /// Malformed type-tag string.
    #[error("parse error: {0}")]
    ParseError(String),

    /// A whole-buffer decode finished with bytes left over.
    #[error("{remaining} trailing byte(s) after decoded value")]
    TrailingBytes { remaining: usize },

    /// Base64/Hex text could not be turned into bytes.
    #[error("text decoding failed: {0}")]
    Encoding(String),

    /// A registry name is already bound to a codec for a different Rust type.
    #[error("type name '{0}' is already registered with a different codec")]
    DuplicateRegistration(String),
}

impl BcsError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        BcsError::InvalidEncoding(msg.into())
    }

    pub fn range(msg: impl Into<String>) -> Self {
        BcsError::RangeError(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        BcsError::ParseError(msg.into())
    }

    pub fn unknown_variant(type_name: &'static str, tag: u32) -> Self {
        BcsError::UnknownVariant { type_name, tag }
    }

    /// Short machine-readable name of the error kind. The CLI prints it next to the
    /// failing command.
    pub fn kind(&self) -> &'static str {
        match self {
            BcsError::UnexpectedEof { .. } => "UnexpectedEof",
            BcsError::InvalidEncoding(_) => "InvalidEncoding",
            BcsError::RangeError(_) => "RangeError",
            BcsError::Overflow { .. } => "Overflow",
            BcsError::UnknownVariant { .. } => "UnknownVariant",
            BcsError::UnknownType(_) => "UnknownType",
            BcsError::ParseError(_) => "ParseError",
            BcsError::TrailingBytes { .. } => "TrailingBytes",
            BcsError::Encoding(_) => "Encoding",
            BcsError::DuplicateRegistration(_) => "DuplicateRegistration",
        }
    }
}
