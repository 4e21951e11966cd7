//! 32-byte content digests.
//!
//! On the wire a digest is a length-prefixed byte vector (`0x20` followed by the 32
//! bytes), not a bare fixed field like an address. Text form is Base58.

use std::fmt;
use std::str::FromStr;

use fastcrypto::encoding::{Base58, Encoding};
use fastcrypto::hash::{Blake2b256, HashFunction};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sui_txkit_bcs::{BcsDecode, BcsEncode, BcsError, BcsReader, BcsResult, BcsWriter};

pub const DIGEST_LENGTH: usize = 32;

/// Blake2b-256 of `data`.
pub fn blake2b256(data: &[u8]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Blake2b256::default();
    hasher.update(data);
    hasher.finalize().digest
}

fn decode_base58(s: &str, what: &str) -> BcsResult<[u8; DIGEST_LENGTH]> {
    let bytes = Base58::decode(s)
        .map_err(|e| BcsError::Encoding(format!("{} '{}' is not valid base58: {}", what, s, e)))?;
    bytes.as_slice().try_into().map_err(|_| {
        BcsError::invalid(format!(
            "{} must be {} bytes, got {}",
            what,
            DIGEST_LENGTH,
            bytes.len()
        ))
    })
}

macro_rules! digest_type {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
        pub struct $name([u8; DIGEST_LENGTH]);

        impl $name {
            pub const ZERO: Self = Self([0u8; DIGEST_LENGTH]);

            pub const fn new(bytes: [u8; DIGEST_LENGTH]) -> Self {
                Self(bytes)
            }

            pub fn random() -> Self {
                Self(rand::thread_rng().gen())
            }

            pub fn inner(&self) -> &[u8; DIGEST_LENGTH] {
                &self.0
            }

            pub fn into_inner(self) -> [u8; DIGEST_LENGTH] {
                self.0
            }

            pub fn base58_encode(&self) -> String {
                Base58::encode(self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.base58_encode())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.base58_encode())
            }
        }

        impl FromStr for $name {
            type Err = BcsError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                decode_base58(s, $label).map(Self)
            }
        }

        impl From<[u8; DIGEST_LENGTH]> for $name {
            fn from(bytes: [u8; DIGEST_LENGTH]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl BcsEncode for $name {
            fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
                w.write_bytes(&self.0)
            }
        }

        impl BcsDecode for $name {
            fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
                let offset = r.offset();
                let bytes = r.read_bytes()?;
                let array: [u8; DIGEST_LENGTH] = bytes.as_slice().try_into().map_err(|_| {
                    BcsError::invalid(format!(
                        "{} at offset {} must be {} bytes, got {}",
                        $label,
                        offset,
                        DIGEST_LENGTH,
                        bytes.len()
                    ))
                })?;
                Ok(Self(array))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(&self.base58_encode())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

digest_type!(
    /// Digest of an object's contents at a given version.
    ObjectDigest,
    "object digest"
);

digest_type!(
    /// Digest identifying a transaction: Blake2b-256 over `"TransactionData::" || bcs(data)`.
    TransactionDigest,
    "transaction digest"
);

digest_type!(TransactionEffectsDigest, "effects digest");

impl TransactionDigest {
    /// Hash already-encoded transaction data with its domain-separation prefix.
    pub fn from_transaction_data_bytes(tx_bytes: &[u8]) -> Self {
        let mut hasher = Blake2b256::default();
        hasher.update(b"TransactionData::");
        hasher.update(tx_bytes);
        Self(hasher.finalize().digest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sui_txkit_bcs::{from_bytes, to_bytes};

    #[test]
    fn test_digest_is_length_prefixed() {
        let digest = ObjectDigest::new([7; 32]);
        let bytes = to_bytes(&digest).unwrap();
        assert_eq!(bytes.len(), 33);
        assert_eq!(bytes[0], 0x20);
        assert_eq!(from_bytes::<ObjectDigest>(&bytes).unwrap(), digest);
    }

    #[test]
    fn test_digest_wrong_length_rejected() {
        let mut bytes = vec![31u8];
        bytes.extend_from_slice(&[0; 31]);
        assert!(matches!(
            from_bytes::<ObjectDigest>(&bytes).unwrap_err(),
            BcsError::InvalidEncoding(_)
        ));
    }

    #[test]
    fn test_base58_roundtrip() {
        let digest = TransactionDigest::random();
        let text = digest.to_string();
        assert_eq!(text.parse::<TransactionDigest>().unwrap(), digest);
        assert_eq!(ObjectDigest::ZERO.to_string(), "11111111111111111111111111111111");
    }

    #[test]
    fn test_base58_rejects_garbage() {
        assert!(matches!(
            "0OIl".parse::<ObjectDigest>().unwrap_err(),
            BcsError::Encoding(_)
        ));
        assert!(matches!(
            "2g".parse::<ObjectDigest>().unwrap_err(),
            BcsError::InvalidEncoding(_)
        ));
    }

    #[test]
    fn test_matches_bcs_crate_bytes_encoding() {
        let digest = ObjectDigest::new([9; 32]);
        assert_eq!(to_bytes(&digest).unwrap(), bcs::to_bytes(&vec![9u8; 32]).unwrap());
    }

    #[test]
    fn test_transaction_digest_prefix() {
        let a = TransactionDigest::from_transaction_data_bytes(&[1, 2, 3]);
        let mut prefixed = b"TransactionData::".to_vec();
        prefixed.extend_from_slice(&[1, 2, 3]);
        assert_eq!(a.into_inner(), blake2b256(&prefixed));
    }
}
