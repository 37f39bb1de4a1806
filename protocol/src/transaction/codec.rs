//! Canonical encoding of the logical transaction fields.
//!
//! The canonical form is compact JSON with the keys in a fixed order:
//!
//! ```text
//! {"amount":100,"coin":"KCN","fee":1,"from":null,"memo":"","nonce":0,"to":"kcn1..."}
//! ```
//!
//! Integers are plain decimal, `from` is `null` when absent, and strings are
//! escaped the way `JSON.stringify` escapes printable ASCII. Two equal
//! [`TxFields`] always encode to identical bytes, and [`deserialize`] is the
//! exact inverse of [`serialize`].
//!
//! Both directions run the validator: an invalid value can never be encoded,
//! and bytes that decode to an invalid value are rejected.

use thiserror::Error;

use super::types::TxFields;
use super::validation::{validate, ValidationError};
use crate::config::HASH_LENGTH;
use crate::crypto::hash::sha256;

/// Errors from encoding or decoding the canonical form.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The fields (before encoding, or after decoding) break an invariant.
    #[error("invalid transaction: {0}")]
    Invalid(#[from] ValidationError),

    /// The bytes are not the canonical seven-key JSON object.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The JSON encoder itself failed.
    #[error("encoding failed: {0}")]
    Encode(String),
}

/// Validate `fields` and return their canonical UTF-8 encoding.
pub fn serialize(fields: &TxFields) -> Result<Vec<u8>, CodecError> {
    validate(fields)?;
    serde_json::to_vec(fields).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode canonical bytes back into [`TxFields`].
///
/// The input must be UTF-8 JSON holding exactly the keys `amount`, `coin`,
/// `fee`, `from`, `memo`, `nonce`, `to` with values of the right JSON type
/// (non-negative integers, strings, `null` only for `from`). The decoded
/// value is then validated.
pub fn deserialize(bytes: &[u8]) -> Result<TxFields, CodecError> {
    let fields: TxFields =
        serde_json::from_slice(bytes).map_err(|e| CodecError::MalformedPayload(e.to_string()))?;
    validate(&fields)?;
    Ok(fields)
}

/// Content hash: `SHA-256(serialize(fields))`.
pub fn hash(fields: &TxFields) -> Result<[u8; HASH_LENGTH], CodecError> {
    Ok(sha256(&serialize(fields)?))
}
