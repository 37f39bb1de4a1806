//! Error type for building and rebuilding [`Transaction`](super::Transaction)
//! values.
//!
//! Verification has its own error, [`VerifyError`](super::VerifyError),
//! because a failed verification is an answer, not a construction failure.

use thiserror::Error;

use super::codec::CodecError;
use super::validation::ValidationError;

/// Errors raised while constructing a transaction entity.
#[derive(Debug, Error)]
pub enum TransactionError {
    /// The logical fields break an invariant.
    #[error("invalid transaction: {0}")]
    Invalid(#[from] ValidationError),

    /// The canonical encoding could not be produced or parsed.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// A signature string is not 128 hex characters.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// A plain form carries a `hash` that does not match its fields.
    #[error("hash mismatch: plain form says {expected}, fields hash to {actual}")]
    HashMismatch {
        /// The hash found in the plain form.
        expected: String,
        /// The hash recomputed from the fields.
        actual: String,
    },

    /// The plain-form JSON could not be parsed.
    #[error("malformed plain form: {0}")]
    MalformedPlainForm(String),
}
