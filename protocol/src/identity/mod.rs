//! # Identity Module
//!
//! Every participant is identified by an Ed25519 key pair; what users see and
//! paste into payment fields is the bech32 address of its public key,
//! scoped to a network by the human-readable prefix.
//!
//! - Bech32 (not Bech32m) — the checksum every other implementation of the
//!   format already produces.
//! - The address carries the raw public key, so a verifier can recover the
//!   key from a transaction's `from` or `to` field without a lookup.

pub mod address;

pub use address::{
    address_to_public_key, encode_public_key, is_address_valid, public_key_to_address,
    AddressError,
};
