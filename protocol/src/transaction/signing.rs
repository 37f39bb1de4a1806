//! Transaction signing with Ed25519 key pairs.
//!
//! Signing is a separate step from building because the key may not be at
//! hand when the transaction is assembled. The signed message is the
//! 32-byte content hash, not the canonical bytes themselves.

use tracing::debug;

use super::builder::Transaction;
use crate::crypto::keys::KcnKeypair;

impl Transaction {
    /// Sign the content hash with `keypair`, replacing any previous
    /// signature. The hash itself is untouched.
    ///
    /// Nothing checks that `keypair` matches the signer address; a
    /// mismatched key simply yields a transaction that does not verify.
    pub fn sign(&mut self, keypair: &KcnKeypair) {
        let signature = keypair.sign(&self.hash);
        debug!(
            hash = %self.hash_hex(),
            replaced = self.signature.is_some(),
            "transaction signed"
        );
        self.signature = Some(signature);
    }
}

/// Signs `tx` in place and returns it, for chaining.
///
/// ```
/// use kcn_protocol::config::Network;
/// use kcn_protocol::crypto::KcnKeypair;
/// use kcn_protocol::transaction::{sign_transaction, TransactionBuilder};
///
/// let kp = KcnKeypair::generate();
/// let mut tx = TransactionBuilder::new()
///     .to(kp.address(Network::Mainnet))
///     .amount(100)
///     .coin("KCN")
///     .fee(1)
///     .nonce(0)
///     .build(Network::Mainnet)
///     .unwrap();
///
/// assert!(sign_transaction(&mut tx, &kp).verify());
/// ```
pub fn sign_transaction<'a>(tx: &'a mut Transaction, keypair: &KcnKeypair) -> &'a Transaction {
    tx.sign(keypair);
    tx
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
