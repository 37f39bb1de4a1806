//! Field-level validation: the single source of truth for what counts as a
//! legal transaction.
//!
//! [`validate`] runs the network-independent checks and is called by the
//! codec on every serialize and deserialize. [`validate_for_network`] adds
//! the address checks and is what entity construction runs.
//!
//! Checks run in a fixed order so the first reported error is reproducible.

use thiserror::Error;

use super::types::TxFields;
use crate::config::{Network, MAX_AMOUNT, MAX_COIN_LENGTH, MAX_MEMO_LENGTH};
use crate::identity::address::{address_to_public_key, AddressError};

/// A violated field invariant. Each rule has its own variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field was never supplied to the builder.
    #[error("{0} missing")]
    MissingField(&'static str),

    /// `from` is present but empty. Use `None` for a source-less transaction.
    #[error("from missing")]
    MissingFrom,

    /// The recipient address is empty.
    #[error("to missing")]
    MissingTo,

    /// `fee` is not below 2^63-1.
    #[error("fee has to be less than 2^63-1, got {fee}")]
    FeeOutOfRange { fee: u64 },

    /// The coin ticker is empty.
    #[error("coin missing")]
    MissingCoin,

    /// The coin ticker is longer than four characters.
    #[error("coin can have a max length of {MAX_COIN_LENGTH} characters, got {len}")]
    CoinTooLong { len: usize },

    /// The coin ticker has a lower-case letter or a non-ASCII character.
    #[error("coin has to be upper case ASCII, got {coin:?}")]
    CoinNotUppercase { coin: String },

    /// `amount` is zero.
    #[error("amount must be greater than zero")]
    ZeroAmount,

    /// `amount` is not below 2^63-1.
    #[error("amount has to be less than 2^63-1, got {amount}")]
    AmountOutOfRange { amount: u64 },

    /// The memo is longer than 64 bytes.
    #[error("memo can have a max length of {MAX_MEMO_LENGTH} bytes, got {len}")]
    MemoTooLong { len: usize },

    /// The memo contains a byte outside 0x20..=0x7E.
    #[error("memo can only contain printable ascii characters (space to tilde)")]
    MemoNotPrintable,

    /// `from` is present but does not decode on the active network.
    #[error("invalid from address: {0}")]
    InvalidFrom(#[source] AddressError),

    /// `to` does not decode on the active network.
    #[error("invalid to address: {0}")]
    InvalidTo(#[source] AddressError),
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

/// Network-independent checks of every field constraint.
pub fn validate(fields: &TxFields) -> Result<(), ValidationError> {
    if fields.from.as_deref() == Some("") {
        return Err(ValidationError::MissingFrom);
    }
    if fields.to.is_empty() {
        return Err(ValidationError::MissingTo);
    }

    if fields.fee >= MAX_AMOUNT {
        return Err(ValidationError::FeeOutOfRange { fee: fields.fee });
    }

    if fields.coin.is_empty() {
        return Err(ValidationError::MissingCoin);
    }
    let coin_len = fields.coin.chars().count();
    if coin_len > MAX_COIN_LENGTH {
        return Err(ValidationError::CoinTooLong { len: coin_len });
    }
    // Digits, spaces and symbols have no case and pass.
    if !fields.coin.is_ascii() || fields.coin.bytes().any(|b| b.is_ascii_lowercase()) {
        return Err(ValidationError::CoinNotUppercase {
            coin: fields.coin.clone(),
        });
    }

    if fields.amount == 0 {
        return Err(ValidationError::ZeroAmount);
    }
    if fields.amount >= MAX_AMOUNT {
        return Err(ValidationError::AmountOutOfRange {
            amount: fields.amount,
        });
    }

    if fields.memo.len() > MAX_MEMO_LENGTH {
        return Err(ValidationError::MemoTooLong {
            len: fields.memo.len(),
        });
    }
    if !is_printable_ascii(&fields.memo) {
        return Err(ValidationError::MemoNotPrintable);
    }

    Ok(())
}

/// [`validate`] plus: `from`, if present, and `to` must decode under
/// `network`'s address prefix.
pub fn validate_for_network(fields: &TxFields, network: Network) -> Result<(), ValidationError> {
    validate(fields)?;

    if let Some(from) = &fields.from {
        address_to_public_key(from, network).map_err(ValidationError::InvalidFrom)?;
    }
    address_to_public_key(&fields.to, network).map_err(ValidationError::InvalidTo)?;

    Ok(())
}
