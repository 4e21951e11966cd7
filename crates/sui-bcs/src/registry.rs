//! Name-keyed codec registry.
//!
//! Maps a logical type name (`"TransactionData"`, `"vector<ObjectRef>"`, ...) to the
//! codec registered for it, so callers that only know a type by name can still
//! serialize through the canonical codec. Registration is append-only: binding
//! the same name to the same Rust type again is a no-op, binding it to a
//! different type fails. Names that were never registered fall back to
//! [`resolve_pure_type`], so `"vector<u64>"` and friends always resolve.
//!
//! The table sits behind a `parking_lot::RwLock`: lookups take a shared lock
//! and clone an `Arc`, writes happen at startup.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::codec::{BcsDecode, BcsEncode};
use crate::encoding::{base64_decode, base64_encode, hex_decode, hex_encode};
use crate::error::{BcsError, BcsResult};
use crate::pure::{resolve_pure_type, PureCodec, PureValue};
use crate::reader::BcsReader;
use crate::u256::U256;
use crate::writer::BcsWriter;

/// Type-erased codec pair stored in the registry.
pub trait ErasedCodec: Send + Sync {
    /// Rust type the codec reads and writes.
    fn value_type(&self) -> TypeId;

    fn encode_any(&self, value: &dyn Any, w: &mut BcsWriter) -> BcsResult<()>;

    fn decode_any(&self, r: &mut BcsReader<'_>) -> BcsResult<Box<dyn Any + Send>>;
}

struct TypedCodec<T> {
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ErasedCodec for TypedCodec<T>
where
    T: BcsEncode + BcsDecode + Send + 'static,
{
    fn value_type(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn encode_any(&self, value: &dyn Any, w: &mut BcsWriter) -> BcsResult<()> {
        value
            .downcast_ref::<T>()
            .ok_or_else(|| {
                BcsError::invalid(format!("value passed for '{}' has the wrong type", self.name))
            })?
            .encode(w)
    }

    fn decode_any(&self, r: &mut BcsReader<'_>) -> BcsResult<Box<dyn Any + Send>> {
        let value: Box<dyn Any + Send> = Box::new(T::decode(r)?);
        Ok(value)
    }
}

impl ErasedCodec for PureCodec {
    fn value_type(&self) -> TypeId {
        TypeId::of::<PureValue>()
    }

    fn encode_any(&self, value: &dyn Any, w: &mut BcsWriter) -> BcsResult<()> {
        let value = value.downcast_ref::<PureValue>().ok_or_else(|| {
            BcsError::invalid(format!("'{}' expects a PureValue", self.pure_type()))
        })?;
        self.pure_type().encode(value, w)
    }

    fn decode_any(&self, r: &mut BcsReader<'_>) -> BcsResult<Box<dyn Any + Send>> {
        let value: Box<dyn Any + Send> = Box::new(self.pure_type().decode(r)?);
        Ok(value)
    }
}

#[derive(Default)]
pub struct CodecRegistry {
    codecs: RwLock<HashMap<String, Arc<dyn ErasedCodec>>>,
}

impl CodecRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the primitive keywords.
    pub fn with_primitives() -> Self {
        let registry = Self::new();
        // Fresh table, names are distinct: these cannot conflict.
        let _ = registry.register::<bool>("bool");
        let _ = registry.register::<u8>("u8");
        let _ = registry.register::<u16>("u16");
        let _ = registry.register::<u32>("u32");
        let _ = registry.register::<u64>("u64");
        let _ = registry.register::<u128>("u128");
        let _ = registry.register::<U256>("u256");
        let _ = registry.register::<String>("string");
        let _ = registry.register::<Vec<u8>>("vector<u8>");
        registry
    }

    /// Bind `name` to `T`'s codec. Re-registering the same `(name, T)` pair is a no-op.
    pub fn register<T>(&self, name: &str) -> BcsResult<()>
    where
        T: BcsEncode + BcsDecode + Send + 'static,
    {
        let mut codecs = self.codecs.write();
        if let Some(existing) = codecs.get(name) {
            if existing.value_type() == TypeId::of::<T>() {
                return Ok(());
            }
            return Err(BcsError::DuplicateRegistration(name.to_string()));
        }
        debug!(name, rust_type = std::any::type_name::<T>(), "registering codec");
        let codec: Arc<dyn ErasedCodec> = Arc::new(TypedCodec::<T> {
            name: name.to_string(),
            _marker: PhantomData,
        });
        codecs.insert(name.to_string(), codec);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.codecs.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.codecs.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.codecs.read().is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.codecs.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Look up a codec by name, falling back to dynamic pure-type resolution.
    pub fn lookup(&self, name: &str) -> BcsResult<Arc<dyn ErasedCodec>> {
        if let Some(codec) = self.codecs.read().get(name) {
            return Ok(Arc::clone(codec));
        }
        match resolve_pure_type(name) {
            Ok(codec) => {
                let codec: Arc<dyn ErasedCodec> = Arc::new(codec);
                Ok(codec)
            }
            Err(_) => Err(BcsError::UnknownType(name.to_string())),
        }
    }

    // =========================================================================
    // Name-driven entry points
    // =========================================================================

    pub fn to_bytes(&self, name: &str, value: &dyn Any) -> BcsResult<Vec<u8>> {
        let codec = self.lookup(name)?;
        let mut w = BcsWriter::new();
        codec.encode_any(value, &mut w)?;
        Ok(w.into_bytes())
    }

    pub fn from_bytes(&self, name: &str, bytes: &[u8]) -> BcsResult<Box<dyn Any + Send>> {
        let codec = self.lookup(name)?;
        let mut r = BcsReader::new(bytes);
        let value = codec.decode_any(&mut r)?;
        r.finish()?;
        Ok(value)
    }

    /// Decode by name and downcast to the expected Rust type.
    pub fn decode<T: 'static>(&self, name: &str, bytes: &[u8]) -> BcsResult<T> {
        self.from_bytes(name, bytes)?
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| {
                BcsError::invalid(format!(
                    "'{}' does not decode to {}",
                    name,
                    std::any::type_name::<T>()
                ))
            })
    }

    pub fn to_base64(&self, name: &str, value: &dyn Any) -> BcsResult<String> {
        Ok(base64_encode(&self.to_bytes(name, value)?))
    }

    pub fn from_base64(&self, name: &str, b64: &str) -> BcsResult<Box<dyn Any + Send>> {
        self.from_bytes(name, &base64_decode(b64, name)?)
    }

    pub fn to_hex(&self, name: &str, value: &dyn Any) -> BcsResult<String> {
        Ok(hex_encode(&self.to_bytes(name, value)?))
    }

    pub fn from_hex(&self, name: &str, hex_str: &str) -> BcsResult<Box<dyn Any + Send>> {
        self.from_bytes(name, &hex_decode(hex_str, name)?)
    }
}

impl std::fmt::Debug for CodecRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodecRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_is_idempotent_for_same_type() {
        let registry = CodecRegistry::new();
        registry.register::<u64>("Amount").unwrap();
        registry.register::<u64>("Amount").unwrap();
        assert_eq!(registry.len(), 1);

        let err = registry.register::<u32>("Amount").unwrap_err();
        assert_eq!(err, BcsError::DuplicateRegistration("Amount".to_string()));
    }

    #[test]
    fn test_encode_decode_by_name() {
        let registry = CodecRegistry::with_primitives();
        let bytes = registry.to_bytes("u64", &1u64).unwrap();
        assert_eq!(bytes, vec![1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(registry.decode::<u64>("u64", &bytes).unwrap(), 1);
        assert_eq!(registry.to_hex("u16", &258u16).unwrap(), "0201");
    }

    #[test]
    fn test_wrong_value_type_is_rejected() {
        let registry = CodecRegistry::with_primitives();
        let err = registry.to_bytes("u64", &1u8).unwrap_err();
        assert!(matches!(err, BcsError::InvalidEncoding(_)));
    }

    #[test]
    fn test_unregistered_pure_names_resolve_dynamically() {
        let registry = CodecRegistry::new();
        let value = PureValue::Vector(vec![PureValue::U64(5)]);
        let bytes = registry.to_bytes("vector<u64>", &value).unwrap();
        let back = registry.decode::<PureValue>("vector<u64>", &bytes).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_unknown_name() {
        let registry = CodecRegistry::with_primitives();
        assert_eq!(
            registry.lookup("0x2::coin::Coin").err(),
            Some(BcsError::UnknownType("0x2::coin::Coin".to_string()))
        );
    }

    #[test]
    fn test_concurrent_readers() {
        let registry = Arc::new(CodecRegistry::with_primitives());
        let handles: Vec<_> = (0..8u64)
            .map(|i| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.decode::<u64>("u64", &i.to_le_bytes()).unwrap())
            })
            .collect();
        let sum: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(sum, 28);
    }
}
