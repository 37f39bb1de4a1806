//! # Transaction Module
//!
//! Construction, canonical encoding, signing and verification of KCN
//! transactions.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        — TxFields (the signable payload) and the plain form
//! validation.rs   — field invariants, with and without address checks
//! codec.rs        — canonical JSON encoding, decoding and content hash
//! builder.rs      — the Transaction entity and TransactionBuilder
//! signing.rs      — Transaction::sign / sign_transaction
//! verification.rs — Transaction::verify / verify_transaction
//! error.rs        — TransactionError
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] or [`Transaction::new`] validates the
//!    fields for a network and computes the content hash.
//! 2. **Sign**: [`Transaction::sign`] signs the hash with the signer's key.
//! 3. **Externalize**: [`Transaction::to_plain_form`] / `to_json` for
//!    transport; [`Transaction::from_json`] to read it back.
//! 4. **Verify**: [`Transaction::verify`] recovers the key from the signer
//!    address and checks the signature.
//!
//! ## Design Decisions
//!
//! - The content hash is a single SHA-256 over the canonical encoding. The
//!   signature covers the hash, not the encoding.
//! - Amounts, fees and nonces are `u64`; amounts and fees are capped below
//!   `2^63-1` so they survive any signed 64-bit or IEEE-754 consumer.
//! - The signer is `from` when present, otherwise `to`.

pub mod builder;
pub mod codec;
pub mod error;
pub mod signing;
pub mod types;
pub mod validation;
pub mod verification;

pub use builder::{Transaction, TransactionBuilder};
pub use codec::CodecError;
pub use error::TransactionError;
pub use signing::sign_transaction;
pub use types::{PlainTransaction, TxFields};
pub use validation::{validate, validate_for_network, ValidationError};
pub use verification::{verify_transaction, VerifyError};
