//! # Hashing Utilities
//!
//! SHA-256 is the only digest in the KCN transaction format: the content
//! hash of a transaction is `SHA-256(canonical_bytes)`, and that 32-byte
//! digest is what gets signed.

use sha2::{Digest, Sha256};

use crate::config::HASH_LENGTH;

/// Compute the SHA-256 digest of `data` as a fixed-size array.
///
/// # Example
///
/// ```
/// use kcn_protocol::crypto::sha256;
///
/// let hash = sha256(b"KCN");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; HASH_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute SHA-256 and return the lowercase hex digest.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}
