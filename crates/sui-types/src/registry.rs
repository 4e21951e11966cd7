//! Registration of the domain codecs.
//!
//! Names are the logical type names used across the toolkit and the CLI
//! (`"TransactionData"`, `"vector<ObjectRef>"`). Pure grammar names such as
//! `"address"` or `"vector<u64>"` are deliberately left unregistered so they keep
//! resolving to dynamic [`PureValue`](sui_txkit_bcs::PureValue) codecs.

use std::sync::LazyLock;

use sui_txkit_bcs::{BcsResult, CodecRegistry};
use tracing::debug;

use crate::address::SuiAddress;
use crate::crypto::{Signature, SignedTransaction};
use crate::digests::{ObjectDigest, TransactionDigest, TransactionEffectsDigest};
use crate::effects::{ExecutionStatus, GasCostSummary, TransactionEffects, TransactionEffectsV1};
use crate::intent::{Intent, IntentMessage};
use crate::object::{ObjectRef, Owner, SharedObjectRef};
use crate::transaction::{
    Argument, CallArg, Command, GasData, ObjectArg, ProgrammableMoveCall,
    ProgrammableTransaction, TransactionData, TransactionDataV1, TransactionExpiration,
    TransactionKind,
};
use crate::type_tag::{StructTag, TypeTag};

/// Register every domain type on `registry`. Safe to call more than once.
pub fn register_sui_types(registry: &CodecRegistry) -> BcsResult<()> {
    registry.register::<SuiAddress>("SuiAddress")?;
    registry.register::<SuiAddress>("ObjectID")?;
    registry.register::<ObjectDigest>("ObjectDigest")?;
    registry.register::<TransactionDigest>("TransactionDigest")?;
    registry.register::<TransactionEffectsDigest>("TransactionEffectsDigest")?;

    registry.register::<TypeTag>("TypeTag")?;
    registry.register::<StructTag>("StructTag")?;
    registry.register::<Vec<TypeTag>>("vector<TypeTag>")?;

    registry.register::<ObjectRef>("ObjectRef")?;
    registry.register::<Vec<ObjectRef>>("vector<ObjectRef>")?;
    registry.register::<SharedObjectRef>("SharedObjectRef")?;
    registry.register::<Owner>("Owner")?;

    registry.register::<Argument>("Argument")?;
    registry.register::<Vec<Argument>>("vector<Argument>")?;
    registry.register::<ObjectArg>("ObjectArg")?;
    registry.register::<CallArg>("CallArg")?;
    registry.register::<Vec<CallArg>>("vector<CallArg>")?;
    registry.register::<ProgrammableMoveCall>("ProgrammableMoveCall")?;
    registry.register::<Command>("Command")?;
    registry.register::<Vec<Command>>("vector<Command>")?;
    registry.register::<ProgrammableTransaction>("ProgrammableTransaction")?;
    registry.register::<TransactionKind>("TransactionKind")?;
    registry.register::<GasData>("GasData")?;
    registry.register::<TransactionExpiration>("TransactionExpiration")?;
    registry.register::<TransactionDataV1>("TransactionDataV1")?;
    registry.register::<TransactionData>("TransactionData")?;

    registry.register::<GasCostSummary>("GasCostSummary")?;
    registry.register::<ExecutionStatus>("ExecutionStatus")?;
    registry.register::<TransactionEffectsV1>("TransactionEffectsV1")?;
    registry.register::<TransactionEffects>("TransactionEffects")?;

    registry.register::<Intent>("Intent")?;
    registry.register::<IntentMessage<TransactionData>>("IntentMessage<TransactionData>")?;
    registry.register::<Signature>("Signature")?;
    registry.register::<SignedTransaction>("SignedTransaction")?;

    debug!(codecs = registry.len(), "registered sui domain codecs");
    Ok(())
}

static GLOBAL_REGISTRY: LazyLock<CodecRegistry> = LazyLock::new(|| {
    let registry = CodecRegistry::with_primitives();
    // Fresh registry with distinct names: registration cannot conflict.
    let _ = register_sui_types(&registry);
    registry
});

/// Process-wide registry with the primitive and domain codecs registered.
pub fn global_registry() -> &'static CodecRegistry {
    &GLOBAL_REGISTRY
}
