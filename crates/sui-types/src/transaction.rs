//! The transaction object graph.
//!
//! Every type here owns one canonical encode and one canonical decode function,
//! written out by hand on top of the combinators. Union discriminants are a single
//! byte, in declaration order:
//!
//! | type | variants |
//! |------|----------|
//! | `Argument` | GasCoin, Input, Result, NestedResult |
//! | `ObjectArg` | ImmOrOwnedObject, SharedObject, Receiving |
//! | `CallArg` | Pure, Object |
//! | `Command` | MoveCall, TransferObjects, SplitCoins, MergeCoins, Publish, MakeMoveVec, Upgrade |
//! | `TransactionKind` | ProgrammableTransaction, ChangeEpoch, Genesis, ConsensusCommitPrologue |
//! | `TransactionExpiration` | None, Epoch |
//! | `TransactionData` | V1 |

use std::hash::{Hash, Hasher};

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use sui_txkit_bcs::combinators::{decode_enum, encode_enum};
use sui_txkit_bcs::{
    base64_encode, decode_with, encode_with, from_base64, from_bytes, to_bytes, BcsDecode,
    BcsEncode, BcsError, BcsReader, BcsResult, BcsWriter, DiscriminantWidth, PureType, PureValue,
};

use crate::address::{ObjectID, SuiAddress};
use crate::digests::TransactionDigest;
use crate::object::{ObjectRef, SharedObjectRef};
use crate::type_tag::TypeTag;

const U8: DiscriminantWidth = DiscriminantWidth::U8;

// ============================================================================
// Arguments
// ============================================================================

/// A reference to a transaction input, a prior command's result, or the gas coin.
///
/// Indices are transaction-local and are not checked here; the executing chain
/// rejects dangling ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

impl BcsEncode for Argument {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        let tag = match self {
            Argument::GasCoin => 0,
            Argument::Input(_) => 1,
            Argument::Result(_) => 2,
            Argument::NestedResult(..) => 3,
        };
        encode_enum(w, U8, tag, |w| {
            match self {
                Argument::GasCoin => {}
                Argument::Input(i) | Argument::Result(i) => w.write_u16(*i),
                Argument::NestedResult(i, j) => {
                    w.write_u16(*i);
                    w.write_u16(*j);
                }
            }
            Ok(())
        })
    }
}

impl BcsDecode for Argument {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_enum(r, U8, |tag, r| match tag {
            0 => Ok(Argument::GasCoin),
            1 => Ok(Argument::Input(r.read_u16()?)),
            2 => Ok(Argument::Result(r.read_u16()?)),
            3 => Ok(Argument::NestedResult(r.read_u16()?, r.read_u16()?)),
            other => Err(BcsError::unknown_variant("Argument", other)),
        })
    }
}

// ============================================================================
// Inputs
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ObjectArg {
    ImmOrOwnedObject(ObjectRef),
    SharedObject(SharedObjectRef),
    Receiving(ObjectRef),
}

impl ObjectArg {
    pub fn id(&self) -> ObjectID {
        match self {
            ObjectArg::ImmOrOwnedObject(r) | ObjectArg::Receiving(r) => r.object_id,
            ObjectArg::SharedObject(s) => s.object_id,
        }
    }
}

impl BcsEncode for ObjectArg {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        let tag = match self {
            ObjectArg::ImmOrOwnedObject(_) => 0,
            ObjectArg::SharedObject(_) => 1,
            ObjectArg::Receiving(_) => 2,
        };
        encode_enum(w, U8, tag, |w| match self {
            ObjectArg::ImmOrOwnedObject(r) | ObjectArg::Receiving(r) => r.encode(w),
            ObjectArg::SharedObject(s) => s.encode(w),
        })
    }
}

impl BcsDecode for ObjectArg {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_enum(r, U8, |tag, r| match tag {
            0 => Ok(ObjectArg::ImmOrOwnedObject(ObjectRef::decode(r)?)),
            1 => Ok(ObjectArg::SharedObject(SharedObjectRef::decode(r)?)),
            2 => Ok(ObjectArg::Receiving(ObjectRef::decode(r)?)),
            other => Err(BcsError::unknown_variant("ObjectArg", other)),
        })
    }
}

/// BCS bytes of a pure input plus an optional declared type.
///
/// Equality and hashing only look at the bytes. The declared type is an
/// annotation used to turn the bytes back into a value; it never reaches the wire.
#[derive(Clone, Debug)]
pub struct PureArg {
    bytes: Vec<u8>,
    declared_type: Option<PureType>,
}

impl PureArg {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            declared_type: None,
        }
    }

    /// Encode `value` as `ty`, keeping the type as the annotation.
    pub fn typed(ty: PureType, value: &PureValue) -> BcsResult<Self> {
        let bytes = encode_with(|w| ty.encode(value, w))?;
        Ok(Self {
            bytes,
            declared_type: Some(ty),
        })
    }

    pub fn with_declared_type(mut self, ty: PureType) -> Self {
        self.declared_type = Some(ty);
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn declared_type(&self) -> Option<&PureType> {
        self.declared_type.as_ref()
    }

    /// Decode the bytes with the declared type. Fails with `UnknownType` while the
    /// type is still unknown.
    pub fn value(&self) -> BcsResult<PureValue> {
        let ty = self
            .declared_type
            .as_ref()
            .ok_or_else(|| BcsError::UnknownType("<undeclared pure type>".to_string()))?;
        decode_with(&self.bytes, |r| ty.decode(r))
    }
}

impl PartialEq for PureArg {
    fn eq(&self, other: &Self) -> bool {
        self.bytes == other.bytes
    }
}

impl Eq for PureArg {}

impl Hash for PureArg {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl Serialize for PureArg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PureArg", 3)?;
        s.serialize_field("bytes", &base64_encode(&self.bytes))?;
        s.serialize_field("type", &self.declared_type.as_ref().map(|t| t.to_string()))?;
        s.serialize_field("value", &self.value().ok().map(|v| v.to_json()))?;
        s.end()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum CallArg {
    Pure(PureArg),
    Object(ObjectArg),
}

impl CallArg {
    pub fn pure_bytes(bytes: Vec<u8>) -> Self {
        CallArg::Pure(PureArg::new(bytes))
    }

    /// BCS-encode a statically typed value as a pure input.
    pub fn pure<T: BcsEncode + ?Sized>(value: &T) -> BcsResult<Self> {
        Ok(CallArg::pure_bytes(to_bytes(value)?))
    }

    pub fn as_pure(&self) -> Option<&PureArg> {
        match self {
            CallArg::Pure(p) => Some(p),
            CallArg::Object(_) => None,
        }
    }
}

impl From<ObjectArg> for CallArg {
    fn from(arg: ObjectArg) -> Self {
        CallArg::Object(arg)
    }
}

impl BcsEncode for CallArg {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        let tag = match self {
            CallArg::Pure(_) => 0,
            CallArg::Object(_) => 1,
        };
        encode_enum(w, U8, tag, |w| match self {
            CallArg::Pure(p) => w.write_bytes(&p.bytes),
            CallArg::Object(o) => o.encode(w),
        })
    }
}

impl BcsDecode for CallArg {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_enum(r, U8, |tag, r| match tag {
            0 => Ok(CallArg::pure_bytes(r.read_bytes()?)),
            1 => Ok(CallArg::Object(ObjectArg::decode(r)?)),
            other => Err(BcsError::unknown_variant("CallArg", other)),
        })
    }
}

// ============================================================================
// Commands
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct ProgrammableMoveCall {
    pub package: ObjectID,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

impl BcsEncode for ProgrammableMoveCall {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        self.package.encode(w)?;
        w.write_str(&self.module)?;
        w.write_str(&self.function)?;
        self.type_arguments.encode(w)?;
        self.arguments.encode(w)
    }
}

impl BcsDecode for ProgrammableMoveCall {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        Ok(Self {
            package: ObjectID::decode(r)?,
            module: r.read_string()?,
            function: r.read_string()?,
            type_arguments: Vec::decode(r)?,
            arguments: Vec::decode(r)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    /// `(objects, recipient)`
    TransferObjects(Vec<Argument>, Argument),
    /// `(coin, amounts)`
    SplitCoins(Argument, Vec<Argument>),
    /// `(destination, sources)`
    MergeCoins(Argument, Vec<Argument>),
    /// `(modules, dependencies)`
    Publish(Vec<Vec<u8>>, Vec<ObjectID>),
    /// `(element type, elements)`; the type may be omitted when elements are non-empty.
    MakeMoveVec(Option<TypeTag>, Vec<Argument>),
    /// `(modules, dependencies, package, upgrade ticket)`
    Upgrade(Vec<Vec<u8>>, Vec<ObjectID>, ObjectID, Argument),
}

impl Command {
    pub fn move_call(
        package: ObjectID,
        module: impl Into<String>,
        function: impl Into<String>,
        type_arguments: Vec<TypeTag>,
        arguments: Vec<Argument>,
    ) -> Self {
        Command::MoveCall(Box::new(ProgrammableMoveCall {
            package,
            module: module.into(),
            function: function.into(),
            type_arguments,
            arguments,
        }))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::MoveCall(_) => "MoveCall",
            Command::TransferObjects(..) => "TransferObjects",
            Command::SplitCoins(..) => "SplitCoins",
            Command::MergeCoins(..) => "MergeCoins",
            Command::Publish(..) => "Publish",
            Command::MakeMoveVec(..) => "MakeMoveVec",
            Command::Upgrade(..) => "Upgrade",
        }
    }

    /// Every argument the command reads, in encoding order.
    pub fn arguments(&self) -> Vec<Argument> {
        match self {
            Command::MoveCall(call) => call.arguments.clone(),
            Command::TransferObjects(objects, recipient) => {
                let mut args = objects.clone();
                args.push(*recipient);
                args
            }
            Command::SplitCoins(first, rest) | Command::MergeCoins(first, rest) => {
                let mut args = vec![*first];
                args.extend_from_slice(rest);
                args
            }
            Command::Publish(..) => vec![],
            Command::MakeMoveVec(_, elements) => elements.clone(),
            Command::Upgrade(_, _, _, ticket) => vec![*ticket],
        }
    }
}

impl BcsEncode for Command {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        let tag = match self {
            Command::MoveCall(_) => 0,
            Command::TransferObjects(..) => 1,
            Command::SplitCoins(..) => 2,
            Command::MergeCoins(..) => 3,
            Command::Publish(..) => 4,
            Command::MakeMoveVec(..) => 5,
            Command::Upgrade(..) => 6,
        };
        encode_enum(w, U8, tag, |w| match self {
            Command::MoveCall(call) => call.encode(w),
            Command::TransferObjects(objects, recipient) => {
                objects.encode(w)?;
                recipient.encode(w)
            }
            Command::SplitCoins(coin, args) | Command::MergeCoins(coin, args) => {
                coin.encode(w)?;
                args.encode(w)
            }
            Command::Publish(modules, deps) => {
                modules.encode(w)?;
                deps.encode(w)
            }
            Command::MakeMoveVec(ty, elements) => {
                ty.encode(w)?;
                elements.encode(w)
            }
            Command::Upgrade(modules, deps, package, ticket) => {
                modules.encode(w)?;
                deps.encode(w)?;
                package.encode(w)?;
                ticket.encode(w)
            }
        })
    }
}

impl BcsDecode for Command {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_enum(r, U8, |tag, r| match tag {
            0 => Ok(Command::MoveCall(Box::new(ProgrammableMoveCall::decode(r)?))),
            1 => Ok(Command::TransferObjects(Vec::decode(r)?, Argument::decode(r)?)),
            2 => Ok(Command::SplitCoins(Argument::decode(r)?, Vec::decode(r)?)),
            3 => Ok(Command::MergeCoins(Argument::decode(r)?, Vec::decode(r)?)),
            4 => Ok(Command::Publish(Vec::decode(r)?, Vec::decode(r)?)),
            5 => Ok(Command::MakeMoveVec(Option::decode(r)?, Vec::decode(r)?)),
            6 => Ok(Command::Upgrade(
                Vec::decode(r)?,
                Vec::decode(r)?,
                ObjectID::decode(r)?,
                Argument::decode(r)?,
            )),
            other => Err(BcsError::unknown_variant("Command", other)),
        })
    }
}

// ============================================================================
// Programmable transactions and kinds
// ============================================================================

/// Inputs plus an ordered list of commands over them.
///
/// Build one with [`crate::builder::ProgrammableTransactionBuilder`], which is the
/// only place inputs are appended and deduplicated.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

impl ProgrammableTransaction {
    /// Pure input at `index`, if that slot exists and holds a pure value.
    pub fn pure_input(&self, index: u16) -> Option<&PureArg> {
        self.inputs.get(usize::from(index)).and_then(CallArg::as_pure)
    }

    pub fn move_calls(&self) -> impl Iterator<Item = &ProgrammableMoveCall> {
        self.commands.iter().filter_map(|c| match c {
            Command::MoveCall(call) => Some(call.as_ref()),
            _ => None,
        })
    }
}

impl BcsEncode for ProgrammableTransaction {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        self.inputs.encode(w)?;
        self.commands.encode(w)
    }
}

impl BcsDecode for ProgrammableTransaction {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        Ok(Self {
            inputs: Vec::decode(r)?,
            commands: Vec::decode(r)?,
        })
    }
}

/// The last three variants are chain-internal markers with no payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
    ChangeEpoch,
    Genesis,
    ConsensusCommitPrologue,
}

impl TransactionKind {
    pub fn as_programmable(&self) -> Option<&ProgrammableTransaction> {
        match self {
            TransactionKind::ProgrammableTransaction(pt) => Some(pt),
            _ => None,
        }
    }

    pub fn is_system(&self) -> bool {
        !matches!(self, TransactionKind::ProgrammableTransaction(_))
    }
}

impl BcsEncode for TransactionKind {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        let tag = match self {
            TransactionKind::ProgrammableTransaction(_) => 0,
            TransactionKind::ChangeEpoch => 1,
            TransactionKind::Genesis => 2,
            TransactionKind::ConsensusCommitPrologue => 3,
        };
        encode_enum(w, U8, tag, |w| match self {
            TransactionKind::ProgrammableTransaction(pt) => pt.encode(w),
            _ => Ok(()),
        })
    }
}

impl BcsDecode for TransactionKind {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_enum(r, U8, |tag, r| match tag {
            0 => Ok(TransactionKind::ProgrammableTransaction(
                ProgrammableTransaction::decode(r)?,
            )),
            1 => Ok(TransactionKind::ChangeEpoch),
            2 => Ok(TransactionKind::Genesis),
            3 => Ok(TransactionKind::ConsensusCommitPrologue),
            other => Err(BcsError::unknown_variant("TransactionKind", other)),
        })
    }
}

// ============================================================================
// Gas and expiration
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: SuiAddress,
    pub price: u64,
    /// Wider than the wire field; anything above `u64::MAX` fails to encode.
    pub budget: u128,
}

impl BcsEncode for GasData {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        let budget = u64::try_from(self.budget)
            .map_err(|_| BcsError::range(format!("gas budget {} does not fit u64", self.budget)))?;
        self.payment.encode(w)?;
        self.owner.encode(w)?;
        w.write_u64(self.price);
        w.write_u64(budget);
        Ok(())
    }
}

impl BcsDecode for GasData {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        Ok(Self {
            payment: Vec::decode(r)?,
            owner: SuiAddress::decode(r)?,
            price: r.read_u64()?,
            budget: u128::from(r.read_u64()?),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
pub enum TransactionExpiration {
    #[default]
    None,
    /// Valid until the end of the given epoch.
    Epoch(u64),
}

impl BcsEncode for TransactionExpiration {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        match self {
            TransactionExpiration::None => encode_enum(w, U8, 0, |_| Ok(())),
            TransactionExpiration::Epoch(epoch) => encode_enum(w, U8, 1, |w| {
                w.write_u64(*epoch);
                Ok(())
            }),
        }
    }
}

impl BcsDecode for TransactionExpiration {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_enum(r, U8, |tag, r| match tag {
            0 => Ok(TransactionExpiration::None),
            1 => Ok(TransactionExpiration::Epoch(r.read_u64()?)),
            other => Err(BcsError::unknown_variant("TransactionExpiration", other)),
        })
    }
}

// ============================================================================
// Transaction data
// ============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: SuiAddress,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

impl BcsEncode for TransactionDataV1 {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        self.kind.encode(w)?;
        self.sender.encode(w)?;
        self.gas_data.encode(w)?;
        self.expiration.encode(w)
    }
}

impl BcsDecode for TransactionDataV1 {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        Ok(Self {
            kind: TransactionKind::decode(r)?,
            sender: SuiAddress::decode(r)?,
            gas_data: GasData::decode(r)?,
            expiration: TransactionExpiration::decode(r)?,
        })
    }
}

/// Versioned transaction payload. Only `V1` exists today.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

impl TransactionData {
    pub fn new(kind: TransactionKind, sender: SuiAddress, gas_data: GasData) -> Self {
        TransactionData::V1(TransactionDataV1 {
            kind,
            sender,
            gas_data,
            expiration: TransactionExpiration::None,
        })
    }

    /// Programmable transaction paid for by `sender` with the given gas coins.
    pub fn new_programmable(
        sender: SuiAddress,
        gas_payment: Vec<ObjectRef>,
        pt: ProgrammableTransaction,
        gas_budget: u64,
        gas_price: u64,
    ) -> Self {
        Self::new(
            TransactionKind::ProgrammableTransaction(pt),
            sender,
            GasData {
                payment: gas_payment,
                owner: sender,
                price: gas_price,
                budget: u128::from(gas_budget),
            },
        )
    }

    pub fn with_expiration(mut self, expiration: TransactionExpiration) -> Self {
        match &mut self {
            TransactionData::V1(v1) => v1.expiration = expiration,
        }
        self
    }

    fn v1(&self) -> &TransactionDataV1 {
        match self {
            TransactionData::V1(v1) => v1,
        }
    }

    pub fn kind(&self) -> &TransactionKind {
        &self.v1().kind
    }

    pub fn sender(&self) -> SuiAddress {
        self.v1().sender
    }

    pub fn gas_data(&self) -> &GasData {
        &self.v1().gas_data
    }

    pub fn expiration(&self) -> &TransactionExpiration {
        &self.v1().expiration
    }

    pub fn gas_budget(&self) -> u128 {
        self.gas_data().budget
    }

    pub fn to_bytes(&self) -> BcsResult<Vec<u8>> {
        to_bytes(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> BcsResult<Self> {
        from_bytes(bytes)
    }

    pub fn to_base64(&self) -> BcsResult<String> {
        Ok(base64_encode(&self.to_bytes()?))
    }

    pub fn from_base64(b64: &str) -> BcsResult<Self> {
        from_base64(b64)
    }

    /// Blake2b-256 over `"TransactionData::" || bcs(self)`.
    pub fn digest(&self) -> BcsResult<TransactionDigest> {
        Ok(TransactionDigest::from_transaction_data_bytes(&self.to_bytes()?))
    }
}

impl BcsEncode for TransactionData {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        match self {
            TransactionData::V1(v1) => encode_enum(w, U8, 0, |w| v1.encode(w)),
        }
    }
}

impl BcsDecode for TransactionData {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_enum(r, U8, |tag, r| match tag {
            0 => Ok(TransactionData::V1(TransactionDataV1::decode(r)?)),
            other => Err(BcsError::unknown_variant("TransactionData", other)),
        })
    }
}
