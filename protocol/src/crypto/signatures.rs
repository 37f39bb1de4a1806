//! # Digital Signatures
//!
//! Free-function wrappers around Ed25519 signing and verification, so every
//! signing operation in the crate goes through one auditable place.
//!
//! Transactions are signed over their 32-byte content hash, never over the
//! variable-length canonical encoding.

use ed25519_dalek::{Signature as DalekSignature, Verifier, VerifyingKey};
use thiserror::Error;

use super::keys::{KcnKeypair, KcnPublicKey, KcnSignature};
use crate::config::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Errors from [`verify_raw`].
#[derive(Debug, Error)]
pub enum SignatureError {
    #[error("signature verification failed")]
    VerificationFailed,

    #[error("invalid public key")]
    InvalidPublicKey,
}

/// Sign a message with a KCN key pair.
///
/// # Example
///
/// ```
/// use kcn_protocol::crypto::{KcnKeypair, sign, verify};
///
/// let keypair = KcnKeypair::generate();
/// let signature = sign(&keypair, b"send 100 KCN to alice");
/// assert!(verify(&keypair.public_key(), b"send 100 KCN to alice", &signature));
/// ```
pub fn sign(keypair: &KcnKeypair, message: &[u8]) -> KcnSignature {
    keypair.sign(message)
}

/// Verify a signature. `true` only if it is valid for `public_key` and
/// `message`.
pub fn verify(public_key: &KcnPublicKey, message: &[u8], signature: &KcnSignature) -> bool {
    public_key.verify(message, signature)
}

/// Verify a signature given as raw bytes off the wire.
pub fn verify_raw(
    public_key_bytes: &[u8; PUBLIC_KEY_LENGTH],
    message: &[u8],
    signature_bytes: &[u8; SIGNATURE_LENGTH],
) -> Result<(), SignatureError> {
    let verifying_key =
        VerifyingKey::from_bytes(public_key_bytes).map_err(|_| SignatureError::InvalidPublicKey)?;

    let signature = DalekSignature::from_bytes(signature_bytes);

    verifying_key
        .verify(message, &signature)
        .map_err(|_| SignatureError::VerificationFailed)
}
