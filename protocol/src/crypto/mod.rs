//! # Cryptographic Primitives for KCN
//!
//! Two primitives, both boring and well audited:
//!
//! - **Ed25519** for detached transaction signatures (deterministic, 64 bytes).
//! - **SHA-256** for transaction content hashes.
//!
//! Everything here is a thin, type-safe wrapper around `ed25519-dalek` and
//! `sha2`.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{sha256, sha256_hex};
pub use keys::{KcnKeypair, KcnPublicKey, KcnSignature, KeyError};
pub use signatures::{sign, verify, verify_raw, SignatureError};
