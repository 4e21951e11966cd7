//! Ed25519 account keys and user signatures.
//!
//! Curve arithmetic is delegated to `fastcrypto`. This module owns the Sui framing
//! around it:
//!
//! - address = `blake2b256(flag || public_key)`
//! - serialized signature = `flag || signature || public_key`
//! - the signed message is `blake2b256(bcs(IntentMessage))`, never raw payload bytes
//!
//! ```
//! use sui_txkit_types::crypto::SuiKeyPair;
//! use sui_txkit_types::intent::{Intent, IntentMessage};
//!
//! let kp = SuiKeyPair::from_secret_bytes(&[7u8; 32]).unwrap();
//! let msg = IntentMessage::new(Intent::sui_transaction(), 42u64);
//! let sig = kp.sign_intent_message(&msg).unwrap();
//! sig.verify_intent_message(&msg, kp.address()).unwrap();
//! ```

use std::fmt;
use std::str::FromStr;

use fastcrypto::ed25519::{Ed25519KeyPair, Ed25519PrivateKey, Ed25519PublicKey, Ed25519Signature};
use fastcrypto::traits::{KeyPair, Signer, ToFromBytes, VerifyingKey};
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sui_txkit_bcs::{
    base64_decode, base64_encode, hex_decode, hex_encode, to_bytes, BcsDecode, BcsEncode,
    BcsError, BcsReader, BcsResult, BcsWriter,
};
use thiserror::Error;
use tracing::debug;

use crate::address::SuiAddress;
use crate::digests::{blake2b256, TransactionDigest};
use crate::intent::{Intent, IntentMessage, PersonalMessage};
use crate::transaction::TransactionData;

pub const ED25519_SECRET_KEY_LENGTH: usize = 32;
pub const ED25519_PUBLIC_KEY_LENGTH: usize = 32;
pub const ED25519_SIGNATURE_LENGTH: usize = 64;
/// `flag || signature || public_key`
pub const ED25519_SERIALIZED_SIGNATURE_LENGTH: usize =
    1 + ED25519_SIGNATURE_LENGTH + ED25519_PUBLIC_KEY_LENGTH;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("signature verification failed: {0}")]
    Verification(String),

    #[error(transparent)]
    Bcs(#[from] BcsError),
}

pub type CryptoResult<T> = Result<T, CryptoError>;

/// Signature scheme flag byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignatureScheme {
    ED25519,
}

impl SignatureScheme {
    pub fn flag(&self) -> u8 {
        match self {
            SignatureScheme::ED25519 => 0x00,
        }
    }

    pub fn from_flag_byte(flag: u8) -> CryptoResult<Self> {
        match flag {
            0x00 => Ok(SignatureScheme::ED25519),
            other => Err(CryptoError::InvalidSignature(format!(
                "unsupported signature scheme flag 0x{:02x}",
                other
            ))),
        }
    }
}

/// Derive the account address for an Ed25519 public key.
pub fn address_from_public_key(public_key: &[u8; ED25519_PUBLIC_KEY_LENGTH]) -> SuiAddress {
    let mut preimage = Vec::with_capacity(1 + ED25519_PUBLIC_KEY_LENGTH);
    preimage.push(SignatureScheme::ED25519.flag());
    preimage.extend_from_slice(public_key);
    SuiAddress::new(blake2b256(&preimage))
}

// ============================================================================
// Key pair
// ============================================================================

pub struct SuiKeyPair {
    secret: [u8; ED25519_SECRET_KEY_LENGTH],
    keypair: Ed25519KeyPair,
}

impl SuiKeyPair {
    pub fn from_secret_bytes(secret: &[u8]) -> CryptoResult<Self> {
        let secret: [u8; ED25519_SECRET_KEY_LENGTH] = secret.try_into().map_err(|_| {
            CryptoError::InvalidKey(format!(
                "secret key must be {} bytes, got {}",
                ED25519_SECRET_KEY_LENGTH,
                secret.len()
            ))
        })?;
        let private = Ed25519PrivateKey::from_bytes(&secret)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Ok(Self {
            secret,
            keypair: Ed25519KeyPair::from(private),
        })
    }

    pub fn generate() -> Self {
        // any 32-byte seed is accepted, so this returns on the first pass
        loop {
            let secret: [u8; ED25519_SECRET_KEY_LENGTH] = rand::thread_rng().gen();
            if let Ok(keypair) = Self::from_secret_bytes(&secret) {
                return keypair;
            }
        }
    }

    /// Secret key as 64 hex digits, `0x` optional.
    pub fn from_hex(hex_str: &str) -> CryptoResult<Self> {
        let bytes = hex_decode(hex_str, "secret key")
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Self::from_secret_bytes(&bytes)
    }

    /// Keystore form: Base64 of `flag || secret`.
    pub fn from_base64(b64: &str) -> CryptoResult<Self> {
        let bytes = base64_decode(b64, "keystore entry")
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        let (flag, secret) = bytes
            .split_first()
            .ok_or_else(|| CryptoError::InvalidKey("empty keystore entry".to_string()))?;
        SignatureScheme::from_flag_byte(*flag)
            .map_err(|_| CryptoError::InvalidKey(format!("unsupported key flag 0x{:02x}", flag)))?;
        Self::from_secret_bytes(secret)
    }

    pub fn to_base64(&self) -> String {
        let mut bytes = Vec::with_capacity(1 + ED25519_SECRET_KEY_LENGTH);
        bytes.push(self.scheme().flag());
        bytes.extend_from_slice(&self.secret);
        base64_encode(&bytes)
    }

    pub fn secret_hex(&self) -> String {
        hex_encode(&self.secret)
    }

    pub fn scheme(&self) -> SignatureScheme {
        SignatureScheme::ED25519
    }

    pub fn public_key_bytes(&self) -> [u8; ED25519_PUBLIC_KEY_LENGTH] {
        let mut out = [0u8; ED25519_PUBLIC_KEY_LENGTH];
        out.copy_from_slice(self.keypair.public().as_bytes());
        out
    }

    pub fn address(&self) -> SuiAddress {
        address_from_public_key(&self.public_key_bytes())
    }

    /// Sign raw bytes. Callers signing chain payloads want [`Self::sign_intent_message`].
    pub fn sign_raw(&self, msg: &[u8]) -> Signature {
        let sig: Ed25519Signature = self.keypair.sign(msg);
        let mut bytes = [0u8; ED25519_SERIALIZED_SIGNATURE_LENGTH];
        bytes[0] = self.scheme().flag();
        bytes[1..1 + ED25519_SIGNATURE_LENGTH].copy_from_slice(sig.as_ref());
        bytes[1 + ED25519_SIGNATURE_LENGTH..].copy_from_slice(&self.public_key_bytes());
        Signature(bytes)
    }

    pub fn sign_intent_message<T: BcsEncode>(
        &self,
        msg: &IntentMessage<T>,
    ) -> CryptoResult<Signature> {
        let digest = blake2b256(&to_bytes(msg)?);
        debug!(scope = ?msg.intent.scope, signer = %self.address(), "signing intent message");
        Ok(self.sign_raw(&digest))
    }

    pub fn sign_transaction(&self, data: &TransactionData) -> CryptoResult<Signature> {
        self.sign_intent_message(&IntentMessage::new(Intent::sui_transaction(), data))
    }

    pub fn sign_personal_message(&self, message: &[u8]) -> CryptoResult<Signature> {
        let msg = IntentMessage::new(
            Intent::personal_message(),
            PersonalMessage {
                message: message.to_vec(),
            },
        );
        self.sign_intent_message(&msg)
    }
}

impl fmt::Debug for SuiKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiKeyPair")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}

impl FromStr for SuiKeyPair {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

// ============================================================================
// Signature
// ============================================================================

/// A serialized user signature: `flag || signature || public_key`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; ED25519_SERIALIZED_SIGNATURE_LENGTH]);

impl Signature {
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let array: [u8; ED25519_SERIALIZED_SIGNATURE_LENGTH] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidSignature(format!(
                "expected {} bytes, got {}",
                ED25519_SERIALIZED_SIGNATURE_LENGTH,
                bytes.len()
            ))
        })?;
        SignatureScheme::from_flag_byte(array[0])?;
        Ok(Self(array))
    }

    pub fn from_base64(b64: &str) -> CryptoResult<Self> {
        let bytes = base64_decode(b64, "signature")
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn to_base64(&self) -> String {
        base64_encode(&self.0)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn scheme(&self) -> SignatureScheme {
        SignatureScheme::ED25519
    }

    pub fn signature_bytes(&self) -> &[u8] {
        &self.0[1..1 + ED25519_SIGNATURE_LENGTH]
    }

    pub fn public_key_bytes(&self) -> [u8; ED25519_PUBLIC_KEY_LENGTH] {
        let mut out = [0u8; ED25519_PUBLIC_KEY_LENGTH];
        out.copy_from_slice(&self.0[1 + ED25519_SIGNATURE_LENGTH..]);
        out
    }

    /// Address of the key embedded in the signature.
    pub fn signer(&self) -> SuiAddress {
        address_from_public_key(&self.public_key_bytes())
    }

    /// Check the signature over raw bytes against the embedded public key.
    pub fn verify_raw(&self, msg: &[u8]) -> CryptoResult<()> {
        let public_key = Ed25519PublicKey::from_bytes(&self.public_key_bytes())
            .map_err(|e| CryptoError::InvalidSignature(format!("bad public key: {}", e)))?;
        let sig = Ed25519Signature::from_bytes(self.signature_bytes())
            .map_err(|e| CryptoError::InvalidSignature(format!("bad signature: {}", e)))?;
        public_key
            .verify(msg, &sig)
            .map_err(|e| CryptoError::Verification(e.to_string()))
    }

    /// Verify over `blake2b256(bcs(msg))` and check the signer is `author`.
    pub fn verify_intent_message<T: BcsEncode>(
        &self,
        msg: &IntentMessage<T>,
        author: SuiAddress,
    ) -> CryptoResult<()> {
        let signer = self.signer();
        if signer != author {
            return Err(CryptoError::Verification(format!(
                "signature is from {}, expected {}",
                signer, author
            )));
        }
        self.verify_raw(&blake2b256(&to_bytes(msg)?))
    }

    /// Verify a transaction signature against the transaction's sender.
    pub fn verify_transaction(&self, data: &TransactionData) -> CryptoResult<()> {
        self.verify_intent_message(
            &IntentMessage::new(Intent::sui_transaction(), data),
            data.sender(),
        )
    }

    pub fn verify_personal_message(&self, message: &[u8], author: SuiAddress) -> CryptoResult<()> {
        let msg = IntentMessage::new(
            Intent::personal_message(),
            PersonalMessage {
                message: message.to_vec(),
            },
        );
        self.verify_intent_message(&msg, author)
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_base64())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl FromStr for Signature {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_base64(s)
    }
}

/// On the wire a signature is a length-prefixed byte vector.
impl BcsEncode for Signature {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        w.write_bytes(&self.0)
    }
}

impl BcsDecode for Signature {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        let bytes = r.read_bytes()?;
        Self::from_bytes(&bytes).map_err(|e| BcsError::invalid(e.to_string()))
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_base64())
    }
}

impl<'de> Deserialize<'de> for Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_base64(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Signed transaction
// ============================================================================

/// Transaction data in its intent envelope plus the user signatures over it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SignedTransaction {
    pub intent_message: IntentMessage<TransactionData>,
    pub tx_signatures: Vec<Signature>,
}

impl SignedTransaction {
    pub fn new(data: TransactionData, tx_signatures: Vec<Signature>) -> Self {
        Self {
            intent_message: IntentMessage::new(Intent::sui_transaction(), data),
            tx_signatures,
        }
    }

    /// Sign `data` with a single key.
    pub fn sign(data: TransactionData, keypair: &SuiKeyPair) -> CryptoResult<Self> {
        let signature = keypair.sign_transaction(&data)?;
        Ok(Self::new(data, vec![signature]))
    }

    pub fn data(&self) -> &TransactionData {
        &self.intent_message.value
    }

    pub fn digest(&self) -> BcsResult<TransactionDigest> {
        self.data().digest()
    }

    /// Check every signature, and that one of them is from the sender.
    pub fn verify(&self) -> CryptoResult<()> {
        if self.tx_signatures.is_empty() {
            return Err(CryptoError::Verification("no signatures".to_string()));
        }
        let sender = self.data().sender();
        if !self.tx_signatures.iter().any(|s| s.signer() == sender) {
            return Err(CryptoError::Verification(format!(
                "no signature from sender {}",
                sender
            )));
        }
        let digest = blake2b256(&to_bytes(&self.intent_message)?);
        for signature in &self.tx_signatures {
            signature.verify_raw(&digest)?;
        }
        Ok(())
    }

    /// `(tx_bytes, signatures)` in the Base64 form `sui_executeTransactionBlock` takes.
    ///
    /// The transaction bytes are the bare `TransactionData` encoding; the node
    /// re-applies the intent itself.
    pub fn to_execute_params(&self) -> BcsResult<(String, Vec<String>)> {
        Ok((
            self.data().to_base64()?,
            self.tx_signatures.iter().map(Signature::to_base64).collect(),
        ))
    }
}

impl BcsEncode for SignedTransaction {
    fn encode(&self, w: &mut BcsWriter) -> BcsResult<()> {
        self.intent_message.encode(w)?;
        self.tx_signatures.encode(w)
    }
}

impl BcsDecode for SignedTransaction {
    fn decode(r: &mut BcsReader<'_>) -> BcsResult<Self> {
        Ok(Self {
            intent_message: IntentMessage::decode(r)?,
            tx_signatures: Vec::decode(r)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digests::ObjectDigest;
    use crate::object::ObjectRef;
    use crate::transaction::ProgrammableTransaction;

    fn test_keypair() -> SuiKeyPair {
        SuiKeyPair::from_secret_bytes(&[1u8; 32]).unwrap()
    }

    fn test_transaction(sender: SuiAddress) -> TransactionData {
        TransactionData::new_programmable(
            sender,
            vec![ObjectRef::new(SuiAddress::from_u16(0x99), 3, ObjectDigest::new([4; 32]))],
            ProgrammableTransaction {
                inputs: vec![],
                commands: vec![],
            },
            5_000_000,
            1_000,
        )
    }

    #[test]
    fn test_keypair_is_deterministic_from_secret() {
        let a = test_keypair();
        let b = SuiKeyPair::from_hex(&a.secret_hex()).unwrap();
        assert_eq!(a.address(), b.address());
        assert_eq!(a.public_key_bytes(), b.public_key_bytes());
        assert_eq!(a.secret_hex(), "01".repeat(32));
    }

    #[test]
    fn test_address_is_hash_of_flag_and_key() {
        let kp = test_keypair();
        let mut preimage = vec![0u8];
        preimage.extend_from_slice(&kp.public_key_bytes());
        assert_eq!(kp.address().into_bytes(), blake2b256(&preimage));
    }

    #[test]
    fn test_bad_secret_lengths() {
        assert!(matches!(
            SuiKeyPair::from_secret_bytes(&[0u8; 31]),
            Err(CryptoError::InvalidKey(_))
        ));
        assert!(matches!(SuiKeyPair::from_hex("0xzz"), Err(CryptoError::InvalidKey(_))));
    }

    #[test]
    fn test_keystore_base64_roundtrip() {
        let kp = SuiKeyPair::generate();
        let encoded = kp.to_base64();
        assert_eq!(base64_decode(&encoded, "t").unwrap()[0], 0);
        assert_eq!(SuiKeyPair::from_base64(&encoded).unwrap().address(), kp.address());
    }

    #[test]
    fn test_signature_layout() {
        let kp = test_keypair();
        let sig = kp.sign_raw(b"hello");
        assert_eq!(sig.as_bytes().len(), 97);
        assert_eq!(sig.as_bytes()[0], 0);
        assert_eq!(sig.public_key_bytes(), kp.public_key_bytes());
        assert_eq!(sig.signer(), kp.address());
        sig.verify_raw(b"hello").unwrap();
        assert!(matches!(sig.verify_raw(b"hellp"), Err(CryptoError::Verification(_))));
        assert_eq!(Signature::from_base64(&sig.to_base64()).unwrap(), sig);
    }

    #[test]
    fn test_signature_rejects_unknown_flag() {
        let mut bytes = test_keypair().sign_raw(b"x").as_bytes().to_vec();
        bytes[0] = 0x05;
        assert!(matches!(
            Signature::from_bytes(&bytes),
            Err(CryptoError::InvalidSignature(_))
        ));
        assert!(Signature::from_bytes(&bytes[..96]).is_err());
    }

    #[test]
    fn test_transaction_signature_covers_intent_bytes() {
        let kp = test_keypair();
        let data = test_transaction(kp.address());
        let sig = kp.sign_transaction(&data).unwrap();

        let raw = data.to_bytes().unwrap();
        let mut wrapped = vec![0u8, 0, 0];
        wrapped.extend_from_slice(&raw);
        sig.verify_raw(&blake2b256(&wrapped)).unwrap();
        // the bare encoding is not what gets signed
        assert!(sig.verify_raw(&blake2b256(&raw)).is_err());
        sig.verify_transaction(&data).unwrap();
    }

    #[test]
    fn test_personal_message_is_not_a_transaction() {
        let kp = test_keypair();
        let sig = kp.sign_personal_message(b"gm").unwrap();
        sig.verify_personal_message(b"gm", kp.address()).unwrap();
        let msg = IntentMessage::new(
            Intent::sui_transaction(),
            PersonalMessage {
                message: b"gm".to_vec(),
            },
        );
        assert!(sig.verify_intent_message(&msg, kp.address()).is_err());
    }

    #[test]
    fn test_verify_rejects_wrong_author() {
        let kp = test_keypair();
        let other = SuiKeyPair::from_secret_bytes(&[2u8; 32]).unwrap();
        let data = test_transaction(other.address());
        let sig = kp.sign_transaction(&data).unwrap();
        assert!(matches!(sig.verify_transaction(&data), Err(CryptoError::Verification(_))));
    }

    #[test]
    fn test_signed_transaction() {
        let kp = test_keypair();
        let data = test_transaction(kp.address());
        let signed = SignedTransaction::sign(data.clone(), &kp).unwrap();
        signed.verify().unwrap();
        assert_eq!(signed.digest().unwrap(), data.digest().unwrap());

        let (tx_b64, sigs) = signed.to_execute_params().unwrap();
        assert_eq!(TransactionData::from_base64(&tx_b64).unwrap(), data);
        assert_eq!(sigs.len(), 1);
        assert_eq!(Signature::from_base64(&sigs[0]).unwrap(), signed.tx_signatures[0]);

        let bytes = to_bytes(&signed).unwrap();
        assert_eq!(sui_txkit_bcs::from_bytes::<SignedTransaction>(&bytes).unwrap(), signed);
    }

    #[test]
    fn test_signed_transaction_without_sender_signature() {
        let kp = test_keypair();
        let other = SuiKeyPair::from_secret_bytes(&[3u8; 32]).unwrap();
        let data = test_transaction(kp.address());
        let sig = other.sign_transaction(&data).unwrap();
        assert!(SignedTransaction::new(data.clone(), vec![sig]).verify().is_err());
        assert!(SignedTransaction::new(data, vec![]).verify().is_err());
    }
}
