//! Transaction effects.
//!
//! Both the effects version wrapper and the execution status carry a 4-byte
//! little-endian discriminant instead of the single byte used elsewhere in the
//! transaction graph. Nodes emit them that way, so they are decoded that way.

use serde::Serialize;
use sui_txkit_bcs::combinators::{decode_enum, encode_enum};
use sui_txkit_bcs::{
    from_bytes, BcsDecode, BcsEncode, BcsError, BcsReader, BcsResult, BcsWriter,
    DiscriminantWidth,
};

use crate::digests::TransactionDigest;
use crate::object::ObjectRef;

const U32: DiscriminantWidth = DiscriminantWidth::U32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GasCostSummary {
    pub computation_cost: u64,
    pub storage_cost: u64,
    pub storage_rebate: u64,
    pub non_refundable_storage_fee: u64,
}

impl GasCostSummary {
    /// Total charged before the rebate.
    pub fn gas_used(&self) -> u64 {
        self.computation_cost.saturating_add(self.storage_cost)
    }

    /// What the sender actually paid; negative when the rebate exceeds the cost.
    pub fn net_gas_usage(&self) -> i128 {
        i128::from(self.gas_used()) - i128::from(self.storage_rebate)
    }
}

impl BcsEncode for GasCostSummary {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        w.write_u64(self.computation_cost);
        w.write_u64(self.storage_cost);
        w.write_u64(self.storage_rebate);
        w.write_u64(self.non_refundable_storage_fee);
        Ok(())
    }
}

impl BcsDecode for GasCostSummary {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        Ok(Self {
            computation_cost: r.read_u64()?,
            storage_cost: r.read_u64()?,
            storage_rebate: r.read_u64()?,
            non_refundable_storage_fee: r.read_u64()?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ExecutionStatus {
    Success,
    Failure,
}

impl ExecutionStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, ExecutionStatus::Success)
    }
}

impl BcsEncode for ExecutionStatus {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        let tag = match self {
            ExecutionStatus::Success => 0,
            ExecutionStatus::Failure => 1,
        };
        encode_enum(w, U32, tag, |_| Ok(()))
    }
}

impl BcsDecode for ExecutionStatus {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_enum(r, U32, |tag, _| match tag {
            0 => Ok(ExecutionStatus::Success),
            1 => Ok(ExecutionStatus::Failure),
            other => Err(BcsError::unknown_variant("ExecutionStatus", other)),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionEffectsV1 {
    pub status: ExecutionStatus,
    pub executed_epoch: u64,
    pub gas_used: GasCostSummary,
    pub created: Vec<ObjectRef>,
    pub mutated: Vec<ObjectRef>,
    pub deleted: Vec<ObjectRef>,
    pub transaction_digest: TransactionDigest,
}

impl BcsEncode for TransactionEffectsV1 {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        self.status.encode(w)?;
        w.write_u64(self.executed_epoch);
        self.gas_used.encode(w)?;
        self.created.encode(w)?;
        self.mutated.encode(w)?;
        self.deleted.encode(w)?;
        self.transaction_digest.encode(w)
    }
}

impl BcsDecode for TransactionEffectsV1 {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        Ok(Self {
            status: ExecutionStatus::decode(r)?,
            executed_epoch: r.read_u64()?,
            gas_used: GasCostSummary::decode(r)?,
            created: Vec::decode(r)?,
            mutated: Vec::decode(r)?,
            deleted: Vec::decode(r)?,
            transaction_digest: TransactionDigest::decode(r)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TransactionEffects {
    V1(TransactionEffectsV1),
}

impl TransactionEffects {
    pub fn from_bytes(bytes: &[u8]) -> BcsResult<Self> {
        from_bytes(bytes)
    }

    fn v1(&self) -> &TransactionEffectsV1 {
        match self {
            TransactionEffects::V1(v1) => v1,
        }
    }

    pub fn status(&self) -> ExecutionStatus {
        self.v1().status
    }

    pub fn executed_epoch(&self) -> u64 {
        self.v1().executed_epoch
    }

    pub fn gas_cost_summary(&self) -> &GasCostSummary {
        &self.v1().gas_used
    }

    pub fn transaction_digest(&self) -> &TransactionDigest {
        &self.v1().transaction_digest
    }

    /// Created and mutated objects, in that order.
    pub fn all_changed_objects(&self) -> Vec<ObjectRef> {
        let v1 = self.v1();
        v1.created.iter().chain(v1.mutated.iter()).copied().collect()
    }

    pub fn deleted(&self) -> &[ObjectRef] {
        &self.v1().deleted
    }
}

impl BcsEncode for TransactionEffects {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        match self {
            TransactionEffects::V1(v1) => encode_enum(w, U32, 0, |w| v1.encode(w)),
        }
    }
}

impl BcsDecode for TransactionEffects {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_enum(r, U32, |tag, r| match tag {
            0 => Ok(TransactionEffects::V1(TransactionEffectsV1::decode(r)?)),
            other => Err(BcsError::unknown_variant("TransactionEffects", other)),
        })
    }
}
