//! Object references and ownership.

use std::fmt;

use serde::{Deserialize, Serialize};
use sui_txkit_bcs::combinators::{decode_enum, encode_enum};
use sui_txkit_bcs::{
    BcsDecode, BcsEncode, BcsError, BcsReader, BcsResult, BcsWriter, DiscriminantWidth,
};

use crate::address::{ObjectID, SuiAddress};
use crate::digests::ObjectDigest;

/// Object version number.
pub type SequenceNumber = u64;

/// An owned or immutable object at a specific version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_id: ObjectID,
    pub version: SequenceNumber,
    pub digest: ObjectDigest,
}

impl ObjectRef {
    pub fn new(object_id: ObjectID, version: SequenceNumber, digest: ObjectDigest) -> Self {
        Self {
            object_id,
            version,
            digest,
        }
    }
}

impl BcsEncode for ObjectRef {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        self.object_id.encode(w)?;
        w.write_u64(self.version);
        self.digest.encode(w)
    }
}

impl BcsDecode for ObjectRef {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        Ok(Self {
            object_id: ObjectID::decode(r)?,
            version: r.read_u64()?,
            digest: ObjectDigest::decode(r)?,
        })
    }
}

/// A shared object input. Shared objects are referenced by the version at which they
/// became shared, plus whether the transaction mutates them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedObjectRef {
    pub object_id: ObjectID,
    pub initial_shared_version: SequenceNumber,
    pub mutable: bool,
}

impl BcsEncode for SharedObjectRef {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        self.object_id.encode(w)?;
        w.write_u64(self.initial_shared_version);
        w.write_bool(self.mutable);
        Ok(())
    }
}

impl BcsDecode for SharedObjectRef {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        Ok(Self {
            object_id: ObjectID::decode(r)?,
            initial_shared_version: r.read_u64()?,
            mutable: r.read_bool()?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Owner {
    AddressOwner(SuiAddress),
    ObjectOwner(SuiAddress),
    Shared {
        initial_shared_version: SequenceNumber,
    },
    Immutable,
    ConsensusV2 {
        authenticator: SuiAddress,
        start_version: SequenceNumber,
    },
}

impl Owner {
    /// The address that must sign to use the object, if any.
    pub fn owner_address(&self) -> Option<SuiAddress> {
        match self {
            Owner::AddressOwner(a) | Owner::ObjectOwner(a) => Some(*a),
            Owner::ConsensusV2 { authenticator, .. } => Some(*authenticator),
            Owner::Shared { .. } | Owner::Immutable => None,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Owner::Shared { .. } | Owner::ConsensusV2 { .. })
    }

    pub fn is_immutable(&self) -> bool {
        matches!(self, Owner::Immutable)
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::AddressOwner(a) => write!(f, "Account Address ( {} )", a),
            Owner::ObjectOwner(a) => write!(f, "Object ID: ( {} )", a),
            Owner::Shared {
                initial_shared_version,
            } => write!(f, "Shared( {} )", initial_shared_version),
            Owner::Immutable => f.write_str("Immutable"),
            Owner::ConsensusV2 {
                authenticator,
                start_version,
            } => write!(f, "ConsensusV2( {}, {} )", start_version, authenticator),
        }
    }
}

impl BcsEncode for Owner {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        let tag = match self {
            Owner::AddressOwner(_) => 0,
            Owner::ObjectOwner(_) => 1,
            Owner::Shared { .. } => 2,
            Owner::Immutable => 3,
            Owner::ConsensusV2 { .. } => 4,
        };
        encode_enum(w, DiscriminantWidth::U8, tag, |w| match self {
            Owner::AddressOwner(a) | Owner::ObjectOwner(a) => a.encode(w),
            Owner::Shared {
                initial_shared_version,
            } => {
                w.write_u64(*initial_shared_version);
                Ok(())
            }
            Owner::Immutable => Ok(()),
            Owner::ConsensusV2 {
                authenticator,
                start_version,
            } => {
                authenticator.encode(w)?;
                w.write_u64(*start_version);
                Ok(())
            }
        })
    }
}

impl BcsDecode for Owner {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        decode_enum(r, DiscriminantWidth::U8, |tag, r| match tag {
            0 => Ok(Owner::AddressOwner(SuiAddress::decode(r)?)),
            1 => Ok(Owner::ObjectOwner(SuiAddress::decode(r)?)),
            2 => Ok(Owner::Shared {
                initial_shared_version: r.read_u64()?,
            }),
            3 => Ok(Owner::Immutable),
            4 => Ok(Owner::ConsensusV2 {
                authenticator: SuiAddress::decode(r)?,
                start_version: r.read_u64()?,
            }),
            other => Err(BcsError::unknown_variant("Owner", other)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sui_txkit_bcs::{from_bytes, to_bytes};

    #[test]
    fn test_object_ref_layout() {
        let obj = ObjectRef::new(SuiAddress::from_u16(5), 9, ObjectDigest::new([1; 32]));
        let bytes = to_bytes(&obj).unwrap();
        // 32 id + 8 version + 1 length + 32 digest
        assert_eq!(bytes.len(), 73);
        assert_eq!(&bytes[32..40], &9u64.to_le_bytes());
        assert_eq!(bytes[40], 32);
        assert_eq!(from_bytes::<ObjectRef>(&bytes).unwrap(), obj);
    }

    #[test]
    fn test_shared_object_ref_layout() {
        let shared = SharedObjectRef {
            object_id: SuiAddress::from_u16(6),
            initial_shared_version: 1,
            mutable: false,
        };
        let bytes = to_bytes(&shared).unwrap();
        assert_eq!(bytes.len(), 41);
        assert_eq!(*bytes.last().unwrap(), 0);
        assert_eq!(from_bytes::<SharedObjectRef>(&bytes).unwrap(), shared);
    }

    #[test]
    fn test_owner_variants() {
        let owners = [
            Owner::AddressOwner(SuiAddress::from_u16(1)),
            Owner::ObjectOwner(SuiAddress::from_u16(2)),
            Owner::Shared {
                initial_shared_version: 42,
            },
            Owner::Immutable,
            Owner::ConsensusV2 {
                authenticator: SuiAddress::from_u16(3),
                start_version: 7,
            },
        ];
        for (tag, owner) in owners.iter().enumerate() {
            let bytes = to_bytes(owner).unwrap();
            assert_eq!(bytes[0] as usize, tag);
            assert_eq!(&from_bytes::<Owner>(&bytes).unwrap(), owner);
        }
        assert_eq!(to_bytes(&Owner::Immutable).unwrap(), vec![3]);
    }

    #[test]
    fn test_owner_unknown_variant() {
        assert_eq!(
            from_bytes::<Owner>(&[5]).unwrap_err(),
            BcsError::unknown_variant("Owner", 5)
        );
    }

    #[test]
    fn test_owner_address() {
        assert_eq!(Owner::Immutable.owner_address(), None);
        assert!(Owner::Shared {
            initial_shared_version: 1
        }
        .is_shared());
    }
}
