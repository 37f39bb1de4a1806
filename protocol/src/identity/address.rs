//! # KCN Addresses
//!
//! An address is the raw Ed25519 public key, bech32-encoded under the
//! human-readable prefix of a [`Network`]:
//!
//! ```text
//! public_key (32 bytes)
//!     -> bech32("kcn", public_key)   -> kcn1...
//!     -> bech32("ktest", public_key) -> ktest1...
//! ```
//!
//! Unlike schemes that hash the key first, the public key is recoverable
//! from the address, which is what transaction verification relies on.
//!
//! Validity is defined as "decoding succeeds": [`is_address_valid`] is
//! just [`address_to_public_key`] with the error discarded, so the codec
//! and the transaction validator cannot disagree about what is an address.

use bech32::primitives::decode::CheckedHrpstring;
use bech32::{Bech32, Hrp};
use thiserror::Error;

use crate::config::{Network, MAX_ADDRESS_LENGTH, PUBLIC_KEY_LENGTH};

/// Errors that can occur while encoding or decoding an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Bad checksum, character set, mixed case, or padding.
    #[error("bech32 decode error: {0}")]
    Decode(String),

    /// The string is valid bech32 but belongs to another network.
    #[error("address prefix mismatch: expected '{expected}', got '{got}'")]
    PrefixMismatch {
        /// The prefix of the network the caller asked for.
        expected: String,
        /// The prefix found in the address.
        got: String,
    },

    /// The decoded payload is not a usable Ed25519 public key.
    #[error("address payload is not a valid public key ({len} bytes)")]
    InvalidPayload {
        /// Payload length in bytes.
        len: usize,
    },

    /// The payload is too long to fit in a bech32 string.
    #[error("bech32 encode error: {0}")]
    Encode(String),
}

fn network_hrp(network: Network) -> Hrp {
    Hrp::parse(network.address_prefix()).expect("static HRP is valid")
}

/// Decode `address` and return the raw public-key bytes it carries.
///
/// Only the original bech32 checksum is accepted (bech32m strings are
/// rejected), and the prefix must equal `network.address_prefix()`. The
/// comparison is case-insensitive because bech32 strings may be written in
/// all upper case. Strings longer than [`MAX_ADDRESS_LENGTH`] are refused.
pub fn address_to_public_key(address: &str, network: Network) -> Result<Vec<u8>, AddressError> {
    if address.len() > MAX_ADDRESS_LENGTH {
        return Err(AddressError::Decode(format!(
            "address is {} characters, limit is {MAX_ADDRESS_LENGTH}",
            address.len()
        )));
    }

    let checked = CheckedHrpstring::new::<Bech32>(address)
        .map_err(|e| AddressError::Decode(e.to_string()))?;

    let got = checked.hrp().to_lowercase();
    if got != network.address_prefix() {
        return Err(AddressError::PrefixMismatch {
            expected: network.address_prefix().to_string(),
            got,
        });
    }

    let bytes: Vec<u8> = checked.byte_iter().collect();

    // The byte iterator drops trailing bits silently; a strict decoder must
    // reject padding that a conforming encoder would never produce.
    let canonical = bech32::encode::<Bech32>(network_hrp(network), &bytes)
        .map_err(|e| AddressError::Decode(e.to_string()))?;
    if canonical != address.to_ascii_lowercase() {
        return Err(AddressError::Decode("non-canonical padding".to_string()));
    }

    Ok(bytes)
}

/// Encode arbitrary public-key bytes as an address on `network`.
///
/// Fails only if the payload is too long for a bech32 string.
pub fn public_key_to_address(public_key: &[u8], network: Network) -> Result<String, AddressError> {
    bech32::encode::<Bech32>(network_hrp(network), public_key)
        .map_err(|e| AddressError::Encode(e.to_string()))
}

/// Infallible encoding for a 32-byte Ed25519 public key.
pub fn encode_public_key(public_key: &[u8; PUBLIC_KEY_LENGTH], network: Network) -> String {
    bech32::encode::<Bech32>(network_hrp(network), public_key)
        .expect("encoding a 32-byte payload should never fail")
}

/// `true` iff [`address_to_public_key`] succeeds for `address` on `network`.
pub fn is_address_valid(address: &str, network: Network) -> bool {
    address_to_public_key(address, network).is_ok()
}
