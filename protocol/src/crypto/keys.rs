//! # Key Management
//!
//! Ed25519 key pairs, public keys and detached signatures for KCN.
//!
//! A KCN address is nothing more than a bech32 wrapper around the raw
//! 32-byte Ed25519 public key, so [`KcnPublicKey`] knows how to move to and
//! from addresses on a given [`Network`].
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (ed25519-dalek does this for us).
//! - Fresh keys come from `OsRng`.
//! - Key bytes are never logged, and `Debug` on a key pair only prints the
//!   public half.

use ed25519_dalek::{
    Signature as DalekSignature, Signer, SigningKey, Verifier, VerifyingKey, KEYPAIR_LENGTH,
    SECRET_KEY_LENGTH,
};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

use crate::config::{Network, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use crate::identity::address::{self, AddressError};

/// Errors that can occur during key operations.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid Ed25519 point")]
    InvalidPublicKey,

    #[error("invalid signature bytes: expected {SIGNATURE_LENGTH} bytes")]
    InvalidSignature,

    #[error("keypair validation failed: public key does not match secret key")]
    KeypairMismatch,
}

/// A KCN key pair wrapping an Ed25519 signing key.
///
/// `KcnKeypair` does not implement `Serialize`. Exporting secret material
/// goes through [`seed_hex`](Self::seed_hex) or
/// [`seed_bytes`](Self::seed_bytes) explicitly.
///
/// # Examples
///
/// ```
/// use kcn_protocol::crypto::keys::KcnKeypair;
///
/// let kp = KcnKeypair::generate();
/// let msg = b"send 100 KCN to alice";
/// let sig = kp.sign(msg);
/// assert!(kp.public_key().verify(msg, &sig));
/// ```
pub struct KcnKeypair {
    signing_key: SigningKey,
}

/// The public half of a key pair. Also the payload of every address.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KcnPublicKey {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

/// A detached Ed25519 signature, always exactly 64 bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct KcnSignature {
    bytes: [u8; SIGNATURE_LENGTH],
}

impl KcnKeypair {
    /// Generate a fresh key pair from the OS RNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Construct a key pair deterministically from a 32-byte seed.
    ///
    /// The seed is the Ed25519 secret key, so the same seed always yields
    /// the same public key and address.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Construct a key pair from a hex-encoded 32-byte seed.
    pub fn from_seed_hex(seed_hex: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(seed_hex.trim()).map_err(|_| KeyError::InvalidSecretKey)?;
        let seed: [u8; SECRET_KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_seed(&seed))
    }

    /// Construct a key pair from a 64-byte `seed || public_key` secret key,
    /// the layout NaCl-family libraries hand out.
    ///
    /// Fails with [`KeyError::KeypairMismatch`] if the trailing public key
    /// does not belong to the seed.
    pub fn from_keypair_bytes(bytes: &[u8; KEYPAIR_LENGTH]) -> Result<Self, KeyError> {
        let signing_key =
            SigningKey::from_keypair_bytes(bytes).map_err(|_| KeyError::KeypairMismatch)?;
        Ok(Self { signing_key })
    }

    /// Returns the public key of this pair.
    pub fn public_key(&self) -> KcnPublicKey {
        KcnPublicKey {
            bytes: self.signing_key.verifying_key().to_bytes(),
        }
    }

    /// The address of this key pair on `network`.
    pub fn address(&self, network: Network) -> String {
        self.public_key().to_address(network)
    }

    /// Sign a message. Ed25519 is deterministic: the same key and message
    /// always give the same signature.
    pub fn sign(&self, message: &[u8]) -> KcnSignature {
        KcnSignature {
            bytes: self.signing_key.sign(message).to_bytes(),
        }
    }

    /// Exports the raw 32-byte seed. Handle with care.
    pub fn seed_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }

    /// Exports the seed as lowercase hex. Handle with care.
    pub fn seed_hex(&self) -> String {
        hex::encode(self.seed_bytes())
    }
}

impl Clone for KcnKeypair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for KcnKeypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print secret key material.
        write!(f, "KcnKeypair(pub={})", self.public_key().to_hex())
    }
}

impl PartialEq for KcnKeypair {
    fn eq(&self, other: &Self) -> bool {
        self.public_key() == other.public_key()
    }
}

impl Eq for KcnKeypair {}

// ---------------------------------------------------------------------------
// KcnPublicKey
// ---------------------------------------------------------------------------

impl KcnPublicKey {
    /// Wrap raw bytes without checking that they are a curve point.
    pub fn from_bytes(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Parse a slice, checking both the length and that the bytes decode to
    /// a valid Ed25519 point.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; PUBLIC_KEY_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidPublicKey)?;
        VerifyingKey::from_bytes(&bytes).map_err(|_| KeyError::InvalidPublicKey)?;
        Ok(Self { bytes })
    }

    /// Recover the public key carried by an address on `network`.
    ///
    /// Fails with [`AddressError::InvalidPayload`] if the address decodes
    /// but its payload is not a 32-byte Ed25519 point.
    pub fn from_address(addr: &str, network: Network) -> Result<Self, AddressError> {
        let raw = address::address_to_public_key(addr, network)?;
        Self::try_from_slice(&raw).map_err(|_| AddressError::InvalidPayload { len: raw.len() })
    }

    /// Encode as a bech32 address on `network`.
    pub fn to_address(&self, network: Network) -> String {
        address::encode_public_key(&self.bytes, network)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// Verify a signature over `message`. Returns `false` for any failure,
    /// including bytes that are not a valid curve point.
    pub fn verify(&self, message: &[u8], signature: &KcnSignature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(&self.bytes) else {
            return false;
        };
        let dalek_sig = DalekSignature::from_bytes(&signature.bytes);
        verifying_key.verify(message, &dalek_sig).is_ok()
    }

    /// Hex-encoded representation, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded public key.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s.trim()).map_err(|_| KeyError::InvalidPublicKey)?;
        Self::try_from_slice(&bytes)
    }
}

impl Hash for KcnPublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bytes.hash(state);
    }
}

impl fmt::Display for KcnPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for KcnPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KcnPublicKey({})", &self.to_hex()[..16])
    }
}

impl Serialize for KcnPublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for KcnPublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        KcnPublicKey::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// KcnSignature
// ---------------------------------------------------------------------------

impl KcnSignature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Parse a slice, which must be exactly 64 bytes long.
    pub fn try_from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; SIGNATURE_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidSignature)?;
        Ok(Self { bytes })
    }

    /// Returns the raw signature bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.bytes
    }

    /// Hex-encoded signature, 128 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    /// Parse a hex-encoded signature.
    pub fn from_hex(s: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(s.trim()).map_err(|_| KeyError::InvalidSignature)?;
        Self::try_from_slice(&bytes)
    }
}

impl fmt::Display for KcnSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for KcnSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex_str = self.to_hex();
        write!(f, "KcnSignature({}...)", &hex_str[..16])
    }
}

impl Serialize for KcnSignature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for KcnSignature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        KcnSignature::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
