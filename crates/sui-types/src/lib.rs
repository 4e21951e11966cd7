//! Sui transaction types for the sui-txkit workspace.
//!
//! Everything here encodes through the hand-written codecs in `sui-txkit-bcs`, so
//! the bytes produced are exactly what the chain hashes and signs.
//!
//! ## Modules
//!
//! - [`address`] / [`digests`] - 32-byte account addresses, object ids and digests
//! - [`type_tag`] / [`type_parsing`] - Move type tags and their string grammar
//! - [`transaction`] - arguments, commands, programmable transactions, gas and `TransactionData`
//! - [`builder`] - [`ProgrammableTransactionBuilder`] with input de-duplication
//! - [`object`] / [`effects`] - object references, ownership and execution effects
//! - [`intent`] / [`crypto`] - intent envelopes, Ed25519 keys and user signatures
//! - [`resolution`] - recovering pure-input types from Move function signatures
//! - [`registry`] - name-keyed registration of all of the above
//!
//! ## Example
//!
//! ```
//! use sui_txkit_types::{
//!     ObjectDigest, ObjectRef, ProgrammableTransactionBuilder, SuiAddress, SuiKeyPair,
//!     TransactionData,
//! };
//!
//! let key = SuiKeyPair::from_secret_bytes(&[9u8; 32]).unwrap();
//! let mut ptb = ProgrammableTransactionBuilder::new();
//! ptb.transfer_sui(SuiAddress::from_u16(0x42), Some(1_000)).unwrap();
//!
//! let gas = ObjectRef::new(SuiAddress::from_u16(0x99), 7, ObjectDigest::new([1; 32]));
//! let data = TransactionData::new_programmable(key.address(), vec![gas], ptb.finish(), 10_000_000, 1_000);
//! let signature = key.sign_transaction(&data).unwrap();
//! signature.verify_transaction(&data).unwrap();
//! ```

pub mod address;
pub mod builder;
pub mod crypto;
pub mod digests;
pub mod effects;
pub mod framework;
pub mod intent;
pub mod object;
pub mod registry;
pub mod resolution;
pub mod transaction;
pub mod type_parsing;
pub mod type_tag;

pub use address::{ObjectID, SuiAddress};
pub use builder::ProgrammableTransactionBuilder;
pub use crypto::{CryptoError, Signature, SignedTransaction, SuiKeyPair};
pub use digests::{ObjectDigest, TransactionDigest, TransactionEffectsDigest};
pub use effects::{ExecutionStatus, GasCostSummary, TransactionEffects};
pub use intent::{AppId, Intent, IntentMessage, IntentScope, IntentVersion};
pub use object::{ObjectRef, Owner, SequenceNumber, SharedObjectRef};
pub use registry::{global_registry, register_sui_types};
pub use resolution::{resolve_pure_inputs, FunctionSignatureSource, StaticSignatures};
pub use transaction::{
    Argument, CallArg, Command, GasData, ObjectArg, ProgrammableMoveCall,
    ProgrammableTransaction, PureArg, TransactionData, TransactionExpiration, TransactionKind,
};
pub use type_parsing::{parse_struct_tag, parse_type_tag};
pub use type_tag::{StructTag, TypeTag};
