//! The transaction entity and its fluent builder.
//!
//! A [`Transaction`] can only exist in a valid state: every constructor runs
//! the validator for the chosen [`Network`] and computes the content hash
//! once. The logical fields are read-only afterwards. Only the signature
//! can change, through [`Transaction::sign`](super::signing).
//!
//! The builder does not sign. Signing happens in [`super::signing`], so
//! construction stays testable without key material.

use std::fmt;

use tracing::debug;

use super::codec;
use super::error::TransactionError;
use super::types::{PlainTransaction, TxFields};
use super::validation::{validate_for_network, ValidationError};
use crate::config::{Network, HASH_LENGTH};
use crate::crypto::keys::KcnSignature;

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A validated KCN transaction, optionally signed.
///
/// The `hash` is `SHA-256(codec::serialize(fields))`. It is computed at
/// construction and never recomputed, since the fields cannot change. The
/// signature, hash and network are not part of the signed bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub(crate) fields: TxFields,
    pub(crate) hash: [u8; HASH_LENGTH],
    pub(crate) signature: Option<KcnSignature>,
    pub(crate) network: Network,
}

impl Transaction {
    /// Validate `fields` against `network` and build an unsigned transaction.
    pub fn new(fields: TxFields, network: Network) -> Result<Self, TransactionError> {
        Self::with_signature(fields, network, None)
    }

    /// Like [`Transaction::new`], attaching an existing signature.
    ///
    /// The signature is stored as given; whether it actually verifies is
    /// [`Transaction::verify`]'s business.
    pub fn with_signature(
        fields: TxFields,
        network: Network,
        signature: Option<KcnSignature>,
    ) -> Result<Self, TransactionError> {
        validate_for_network(&fields, network)?;
        let hash = codec::hash(&fields)?;

        debug!(
            network = %network,
            hash = %hex::encode(hash),
            signed = signature.is_some(),
            "transaction constructed"
        );

        Ok(Self {
            fields,
            hash,
            signature,
            network,
        })
    }

    /// Rebuild a transaction from its canonical encoding.
    pub fn from_canonical_bytes(bytes: &[u8], network: Network) -> Result<Self, TransactionError> {
        let fields = codec::deserialize(bytes)?;
        Self::new(fields, network)
    }

    /// Rebuild a transaction from its plain form.
    ///
    /// The signature, if any, must be 128 hex characters, and the `hash`
    /// must match the hash recomputed from `tx` (hex case is ignored).
    pub fn from_plain_form(
        plain: PlainTransaction,
        network: Network,
    ) -> Result<Self, TransactionError> {
        let signature = plain
            .signature
            .as_deref()
            .map(KcnSignature::from_hex)
            .transpose()
            .map_err(|e| TransactionError::MalformedSignature(e.to_string()))?;

        let tx = Self::with_signature(plain.tx, network, signature)?;

        let actual = tx.hash_hex();
        if !plain.hash.eq_ignore_ascii_case(&actual) {
            return Err(TransactionError::HashMismatch {
                expected: plain.hash,
                actual,
            });
        }

        Ok(tx)
    }

    /// Parse the JSON produced by [`Transaction::to_json`].
    pub fn from_json(json: &str, network: Network) -> Result<Self, TransactionError> {
        let plain: PlainTransaction = serde_json::from_str(json)
            .map_err(|e| TransactionError::MalformedPlainForm(e.to_string()))?;
        Self::from_plain_form(plain, network)
    }

    /// The logical fields.
    pub fn fields(&self) -> &TxFields {
        &self.fields
    }

    /// The network the fields were validated against.
    pub fn network(&self) -> Network {
        self.network
    }

    /// The 32-byte content hash.
    pub fn hash(&self) -> &[u8; HASH_LENGTH] {
        &self.hash
    }

    /// Lowercase hex of [`Transaction::hash`].
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// The current signature, if the transaction has been signed.
    pub fn signature(&self) -> Option<&KcnSignature> {
        self.signature.as_ref()
    }

    /// Returns `true` if a signature is attached.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }

    /// The canonical encoding of the fields: the bytes whose hash is signed.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        Ok(codec::serialize(&self.fields)?)
    }

    /// Externalize for transport or logging.
    pub fn to_plain_form(&self) -> PlainTransaction {
        PlainTransaction {
            hash: self.hash_hex(),
            signature: self.signature.map(|s| s.to_hex()),
            tx: self.fields.clone(),
        }
    }

    /// Compact JSON of the plain form: `{"hash":..,"signature":..,"tx":{..}}`.
    pub fn to_json(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.to_plain_form()).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Transaction`].
///
/// Setters may be called in any order; the result is the same. `memo`
/// defaults to the empty string and `from` to absent. Every other field is
/// required.
///
/// ```
/// use kcn_protocol::config::Network;
/// use kcn_protocol::crypto::KcnKeypair;
/// use kcn_protocol::transaction::TransactionBuilder;
///
/// let to = KcnKeypair::generate().address(Network::Mainnet);
/// let tx = TransactionBuilder::new()
///     .to(&to)
///     .amount(100)
///     .coin("KCN")
///     .fee(1)
///     .nonce(0)
///     .build(Network::Mainnet)
///     .unwrap();
/// assert!(!tx.is_signed());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    amount: Option<u64>,
    coin: Option<String>,
    fee: Option<u64>,
    from: Option<String>,
    memo: Option<String>,
    nonce: Option<u64>,
    to: Option<String>,
}

impl TransactionBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the amount, in the coin's smallest unit.
    pub fn amount(mut self, amount: u64) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Sets the coin ticker.
    pub fn coin(mut self, coin: impl Into<String>) -> Self {
        self.coin = Some(coin.into());
        self
    }

    /// Sets the fee.
    pub fn fee(mut self, fee: u64) -> Self {
        self.fee = Some(fee);
        self
    }

    /// Sets the sender address.
    pub fn from(mut self, address: impl Into<String>) -> Self {
        self.from = Some(address.into());
        self
    }

    pub fn memo(mut self, memo: impl Into<String>) -> Self {
        self.memo = Some(memo.into());
        self
    }

    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = Some(nonce);
        self
    }

    /// Sets the recipient address.
    pub fn to(mut self, address: impl Into<String>) -> Self {
        self.to = Some(address.into());
        self
    }

    /// Assemble the fields without validating them.
    pub fn into_fields(self) -> Result<TxFields, ValidationError> {
        Ok(TxFields {
            amount: self.amount.ok_or(ValidationError::MissingField("amount"))?,
            coin: self.coin.ok_or(ValidationError::MissingField("coin"))?,
            fee: self.fee.ok_or(ValidationError::MissingField("fee"))?,
            from: self.from,
            memo: self.memo.unwrap_or_default(),
            nonce: self.nonce.ok_or(ValidationError::MissingField("nonce"))?,
            to: self.to.ok_or(ValidationError::MissingField("to"))?,
        })
    }

    /// Consume the builder and produce an unsigned [`Transaction`].
    pub fn build(self, network: Network) -> Result<Transaction, TransactionError> {
        Transaction::new(self.into_fields()?, network)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
