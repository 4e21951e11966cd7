//! Canonical binary serialization (BCS) for Sui transaction data.
//!
//! Layers, leaves first:
//!
//! - [`writer`] / [`reader`]: fixed-width little-endian integers, booleans, raw byte
//!   runs and 32-bit-capped ULEB128 over an append-only sink or a forward-only cursor
//! - [`combinators`]: `vector<T>`, `option<T>`, tagged unions and structs, driven by
//!   caller-supplied element codecs
//! - [`codec`]: the [`BcsEncode`]/[`BcsDecode`] traits every wire type implements
//! - [`encoding`]: bytes / Base64 / Hex entry points
//! - [`pure`]: run-time codecs for pure values whose Move type is only known as text
//! - [`registry`]: name-keyed codec table shared across threads
//!
//! ```
//! use sui_txkit_bcs::{from_bytes, to_bytes};
//!
//! let bytes = to_bytes(&vec![1u64]).unwrap();
//! assert_eq!(bytes, [1, 1, 0, 0, 0, 0, 0, 0, 0]);
//! assert_eq!(from_bytes::<Vec<u64>>(&bytes).unwrap(), vec![1]);
//! ```

pub mod codec;
pub mod combinators;
pub mod encoding;
pub mod error;
pub mod pure;
pub mod reader;
pub mod registry;
pub mod u256;
pub mod writer;

pub use codec::{Bcs, BcsDecode, BcsEncode};
pub use combinators::DiscriminantWidth;
pub use encoding::{
    base64_decode, base64_encode, decode_address_hex, decode_text, decode_with, encode_with,
    from_base64, from_bytes, from_hex, hex_decode, hex_encode, to_base64, to_bytes, to_hex,
};
pub use error::{BcsError, BcsResult};
pub use pure::{
    decode_pure, decode_pure_json, encode_pure, encode_pure_json, resolve_pure_type, PureCodec,
    PureType, PureValue, MAX_TYPE_DEPTH,
};
pub use reader::BcsReader;
pub use registry::{CodecRegistry, ErasedCodec};
pub use u256::U256;
pub use writer::BcsWriter;
