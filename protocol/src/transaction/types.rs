//! Core value types for KCN transactions.
//!
//! [`TxFields`] is the signable payload: exactly the seven logical fields
//! that are canonicalized, hashed and signed. Anything else attached to a
//! transaction (hash, signature, network) lives on
//! [`Transaction`](super::Transaction) and never reaches the signed bytes.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TxFields
// ---------------------------------------------------------------------------

/// The logical fields of a transaction.
///
/// Field declaration order is the canonical key order
/// (`amount, coin, fee, from, memo, nonce, to`); serde emits struct fields
/// in declaration order, so reordering these fields changes the wire
/// format and every hash. Do not reorder.
///
/// Deserialization is strict: unknown keys are rejected and `from` must be
/// present (it may be `null`, but not missing).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TxFields {
    /// Amount transferred, in the coin's smallest unit. `0 < amount < 2^63-1`.
    pub amount: u64,

    /// Upper-case ticker, 1 to 4 ASCII letters.
    pub coin: String,

    /// Fee paid, `fee < 2^63-1`.
    pub fee: u64,

    /// Sender address. `None` for source-less transactions, in which case
    /// the recipient's key signs.
    #[serde(deserialize_with = "Option::deserialize")]
    pub from: Option<String>,

    /// Free-form note, at most 64 printable ASCII bytes.
    pub memo: String,

    /// Per-sender sequence number.
    pub nonce: u64,

    /// Recipient address.
    pub to: String,
}

impl TxFields {
    /// The address whose key authorizes this transaction: `from` when
    /// present, otherwise `to`.
    pub fn signer_address(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.to)
    }
}

// ---------------------------------------------------------------------------
// PlainTransaction
// ---------------------------------------------------------------------------

/// Read-only externalization of a transaction for transport and logging.
///
/// Serializes as `{"hash": <hex>, "signature": <hex|null>, "tx": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlainTransaction {
    /// Hex-encoded SHA-256 of the canonical encoding of `tx`.
    pub hash: String,

    /// Hex-encoded detached signature, `None` while unsigned.
    #[serde(default)]
    pub signature: Option<String>,

    /// The logical fields.
    pub tx: TxFields,
}
