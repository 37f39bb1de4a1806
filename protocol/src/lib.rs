// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # KCN Protocol — Core Library
//!
//! The canonical transaction format of the KCN ledger: how a transfer is
//! written down, hashed, signed and checked, so that every wallet and node
//! produces byte-identical transactions and accepts each other's
//! signatures.
//!
//! ## Architecture
//!
//! - **config** — Networks, address prefixes and protocol limits.
//! - **crypto** — Ed25519 keys and signatures, SHA-256.
//! - **identity** — Bech32 addresses carrying raw public keys.
//! - **transaction** — Field validation, canonical encoding, the
//!   transaction entity, signing and verification.
//! - **rpc** — JSON-RPC client for submitting transactions to a node.
//!
//! ## Quick tour
//!
//! ```
//! use kcn_protocol::config::Network;
//! use kcn_protocol::crypto::KcnKeypair;
//! use kcn_protocol::transaction::TransactionBuilder;
//!
//! let kp = KcnKeypair::generate();
//! let mut tx = TransactionBuilder::new()
//!     .to(kp.address(Network::Mainnet))
//!     .amount(100)
//!     .coin("KCN")
//!     .fee(1)
//!     .nonce(0)
//!     .build(Network::Mainnet)
//!     .unwrap();
//!
//! tx.sign(&kp);
//! assert!(tx.verify());
//! println!("{tx}");
//! ```

pub mod config;
pub mod crypto;
pub mod identity;
pub mod rpc;
pub mod transaction;
