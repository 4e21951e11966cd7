//! Intent envelopes.
//!
//! What gets signed is never the raw payload: it is `bcs(IntentMessage)`, i.e.
//! three intent bytes (`scope`, `version`, `app_id`) followed by the payload's own
//! encoding. The prefix keeps a signature for one purpose from verifying for another.

use serde::Serialize;
use sui_txkit_bcs::{BcsDecode, BcsEncode, BcsError, BcsReader, BcsResult, BcsWriter};

macro_rules! byte_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
        #[repr(u8)]
        pub enum $name {
            $($variant = $value),+
        }

        impl TryFrom<u8> for $name {
            type Error = BcsError;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $($value => Ok($name::$variant),)+
                    other => Err(BcsError::unknown_variant(stringify!($name), u32::from(other))),
                }
            }
        }

        impl BcsEncode for $name {
            fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
                w.write_u8(*self as u8);
                Ok(())
            }
        }

        impl BcsDecode for $name {
            fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
                Self::try_from(r.read_u8()?)
            }
        }
    };
}

byte_enum!(
    /// What the signed payload is.
    IntentScope {
        TransactionData = 0,
        TransactionEffects = 1,
        CheckpointSummary = 2,
        PersonalMessage = 3,
        SenderSignedTransaction = 4,
        ProofOfPossession = 5,
        HeaderDigest = 6,
        BridgeEventUnused = 7,
        ConsensusBlock = 8,
        DiscoveryPeers = 9,
    }
);

byte_enum!(IntentVersion { V0 = 0 });

byte_enum!(
    /// Which application the intent belongs to.
    AppId {
        Sui = 0,
        Narwhal = 1,
        Consensus = 2,
    }
);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Intent {
    pub scope: IntentScope,
    pub version: IntentVersion,
    pub app_id: AppId,
}

impl Intent {
    pub fn sui_app(scope: IntentScope) -> Self {
        Self {
            scope,
            version: IntentVersion::V0,
            app_id: AppId::Sui,
        }
    }

    pub fn sui_transaction() -> Self {
        Self::sui_app(IntentScope::TransactionData)
    }

    pub fn personal_message() -> Self {
        Self::sui_app(IntentScope::PersonalMessage)
    }

    pub fn to_bytes(&self) -> [u8; 3] {
        [self.scope as u8, self.version as u8, self.app_id as u8]
    }
}

impl BcsEncode for Intent {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        self.scope.encode(w)?;
        self.version.encode(w)?;
        self.app_id.encode(w)
    }
}

impl BcsDecode for Intent {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        Ok(Self {
            scope: IntentScope::decode(r)?,
            version: IntentVersion::decode(r)?,
            app_id: AppId::decode(r)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IntentMessage<T> {
    pub intent: Intent,
    pub value: T,
}

impl<T> IntentMessage<T> {
    pub fn new(intent: Intent, value: T) -> Self {
        Self { intent, value }
    }
}

impl<T: BcsEncode> BcsEncode for IntentMessage<T> {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        self.intent.encode(w)?;
        self.value.encode(w)
    }
}

impl<T: BcsDecode> BcsDecode for IntentMessage<T> {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        Ok(Self {
            intent: Intent::decode(r)?,
            value: T::decode(r)?,
        })
    }
}

/// A personal message is signed as a BCS byte vector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PersonalMessage {
    pub message: Vec<u8>,
}

impl BcsEncode for PersonalMessage {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        w.write_bytes(&self.message)
    }
}

impl BcsDecode for PersonalMessage {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        Ok(Self {
            message: r.read_bytes()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sui_txkit_bcs::{from_bytes, to_bytes};

    #[test]
    fn test_intent_bytes() {
        assert_eq!(Intent::sui_transaction().to_bytes(), [0, 0, 0]);
        assert_eq!(Intent::personal_message().to_bytes(), [3, 0, 0]);
        let consensus = Intent {
            scope: IntentScope::ConsensusBlock,
            version: IntentVersion::V0,
            app_id: AppId::Consensus,
        };
        assert_eq!(to_bytes(&consensus).unwrap(), vec![8, 0, 2]);
        assert_eq!(from_bytes::<Intent>(&[8, 0, 2]).unwrap(), consensus);
    }

    #[test]
    fn test_unknown_scope() {
        assert_eq!(
            from_bytes::<Intent>(&[10, 0, 0]).unwrap_err(),
            BcsError::unknown_variant("IntentScope", 10)
        );
        assert!(from_bytes::<Intent>(&[0, 1, 0]).is_err());
    }

    #[test]
    fn test_intent_message_prepends_three_bytes() {
        let payload = vec![1u64, 2];
        let msg = IntentMessage::new(Intent::sui_transaction(), payload.clone());
        let wrapped = to_bytes(&msg).unwrap();
        let raw = to_bytes(&payload).unwrap();
        assert_eq!(wrapped.len(), raw.len() + 3);
        assert_eq!(&wrapped[..3], &[0, 0, 0]);
        assert_eq!(&wrapped[3..], raw.as_slice());
        assert_eq!(from_bytes::<IntentMessage<Vec<u64>>>(&wrapped).unwrap(), msg);
    }

    #[test]
    fn test_personal_message_is_length_prefixed() {
        let msg = IntentMessage::new(
            Intent::personal_message(),
            PersonalMessage {
                message: b"hi".to_vec(),
            },
        );
        assert_eq!(to_bytes(&msg).unwrap(), vec![3, 0, 0, 2, b'h', b'i']);
    }
}
