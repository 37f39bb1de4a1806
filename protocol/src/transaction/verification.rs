//! Signature verification.
//!
//! The verifying key is not carried alongside the signature. It is recovered
//! from the signer address: `from` when present, otherwise `to`, decoded
//! under the transaction's own network. The message is the content hash,
//! recomputed from the fields so a tampered entity cannot pass.
//!
//! [`Transaction::verify`] answers yes or no and never fails.
//! [`verify_transaction`] says why a transaction does not verify.

use thiserror::Error;
use tracing::debug;

use super::builder::Transaction;
use super::codec;
use crate::crypto::keys::KcnPublicKey;
use crate::identity::address::{address_to_public_key, AddressError};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a transaction failed verification. Checks run cheapest first.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    /// No signature is attached.
    #[error("transaction is unsigned")]
    MissingSignature,

    /// The signer address does not decode on the transaction's network.
    #[error("signer address is invalid: {0}")]
    Address(#[from] AddressError),

    /// The signer address decodes, but not to an Ed25519 public key.
    #[error("signer address does not carry a valid Ed25519 public key")]
    InvalidPublicKey,

    /// The stored hash no longer matches the fields.
    #[error("stored hash {stored} does not match recomputed {computed}")]
    HashMismatch { stored: String, computed: String },

    /// The signature does not verify under the signer's key.
    #[error("signature does not verify against {signer}")]
    InvalidSignature { signer: String },
}

// ---------------------------------------------------------------------------
// Verification
// ---------------------------------------------------------------------------

/// Verify `tx`'s signature, reporting the first failing check:
///
/// 1. a signature is present;
/// 2. the signer address decodes under `tx.network()`;
/// 3. its payload is a valid Ed25519 public key;
/// 4. the stored hash equals the hash of the current fields;
/// 5. the signature verifies over that hash.
pub fn verify_transaction(tx: &Transaction) -> Result<(), VerifyError> {
    let signature = tx.signature.as_ref().ok_or(VerifyError::MissingSignature)?;

    let signer = tx.fields.signer_address();
    let key_bytes = address_to_public_key(signer, tx.network)?;
    let public_key =
        KcnPublicKey::try_from_slice(&key_bytes).map_err(|_| VerifyError::InvalidPublicKey)?;

    // An entity is valid by construction, so re-encoding cannot fail; treat
    // a failure like a mismatch rather than panicking.
    let computed = codec::hash(&tx.fields).ok();
    if computed.as_ref() != Some(&tx.hash) {
        return Err(VerifyError::HashMismatch {
            stored: tx.hash_hex(),
            computed: computed.map(hex::encode).unwrap_or_default(),
        });
    }

    if !public_key.verify(&tx.hash, signature) {
        return Err(VerifyError::InvalidSignature {
            signer: signer.to_string(),
        });
    }

    Ok(())
}

impl Transaction {
    /// `true` iff the attached signature verifies under the signer's key.
    pub fn verify(&self) -> bool {
        match verify_transaction(self) {
            Ok(()) => {
                debug!(hash = %self.hash_hex(), "transaction verified");
                true
            }
            Err(e) => {
                debug!(hash = %self.hash_hex(), reason = %e, "transaction failed verification");
                false
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Network;
    use crate::crypto::KcnKeypair;
    use crate::identity::address::public_key_to_address;
    use crate::transaction::builder::TransactionBuilder;
    use crate::transaction::types::TxFields;

    fn fields_to(to: String) -> TxFields {
        TxFields {
            amount: 100,
            coin: "KCN".to_string(),
            fee: 1,
            from: None,
            memo: String::new(),
            nonce: 0,
            to,
        }
    }

    /// Build and sign a source-less mainnet transaction to `kp`'s address.
    fn signed_to_self(kp: &KcnKeypair) -> Transaction {
        let mut tx = Transaction::new(fields_to(kp.address(Network::Mainnet)), Network::Mainnet)
            .unwrap();
        tx.sign(kp);
        tx
    }

    #[test]
    fn sign_then_verify() {
        let kp = KcnKeypair::generate();
        let tx = signed_to_self(&kp);
        assert_eq!(verify_transaction(&tx), Ok(()));
        assert!(tx.verify());
    }

    #[test]
    fn signature_does_not_transfer_to_other_fields() {
        let kp = KcnKeypair::generate();
        let tx = signed_to_self(&kp);
        assert!(tx.verify());

        let altered = TxFields {
            amount: 101,
            ..tx.fields().clone()
        };
        let replay = Transaction::with_signature(altered, Network::Mainnet, tx.signature().copied())
            .unwrap();
        assert!(!replay.verify());
        assert!(matches!(
            verify_transaction(&replay),
            Err(VerifyError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn unsigned_does_not_verify() {
        let kp = KcnKeypair::generate();
        let tx = Transaction::new(fields_to(kp.address(Network::Mainnet)), Network::Mainnet)
            .unwrap();
        assert!(!tx.verify());
        assert_eq!(verify_transaction(&tx), Err(VerifyError::MissingSignature));
    }

    #[test]
    fn from_takes_precedence_over_to() {
        let sender = KcnKeypair::generate();
        let recipient = KcnKeypair::generate();

        let build = || {
            TransactionBuilder::new()
                .from(sender.address(Network::Mainnet))
                .to(recipient.address(Network::Mainnet))
                .amount(5)
                .coin("KCN")
                .fee(0)
                .nonce(3)
                .build(Network::Mainnet)
                .unwrap()
        };

        let mut by_sender = build();
        by_sender.sign(&sender);
        assert!(by_sender.verify());

        let mut by_recipient = build();
        by_recipient.sign(&recipient);
        assert!(!by_recipient.verify());
    }

    #[test]
    fn wrong_key_does_not_verify() {
        let owner = KcnKeypair::generate();
        let intruder = KcnKeypair::generate();
        let mut tx = signed_to_self(&owner);
        tx.sign(&intruder);
        assert!(matches!(
            verify_transaction(&tx),
            Err(VerifyError::InvalidSignature { .. })
        ));
    }

    #[test]
    fn tampered_fields_are_caught_by_hash_check() {
        let kp = KcnKeypair::generate();
        let mut tx = signed_to_self(&kp);
        tx.fields.nonce = 9;
        assert!(matches!(
            verify_transaction(&tx),
            Err(VerifyError::HashMismatch { .. })
        ));
        assert!(!tx.verify());
    }

    #[test]
    fn network_mismatch_is_an_address_error() {
        let kp = KcnKeypair::generate();
        let mut tx = signed_to_self(&kp);
        tx.network = Network::Regtest;
        assert!(matches!(
            verify_transaction(&tx),
            Err(VerifyError::Address(AddressError::PrefixMismatch { .. }))
        ));
    }

    #[test]
    fn short_payload_is_not_a_public_key() {
        let kp = KcnKeypair::generate();
        let short = public_key_to_address(&[1, 2, 3], Network::Mainnet).unwrap();
        let mut tx = Transaction::new(fields_to(short), Network::Mainnet).unwrap();
        tx.sign(&kp);
        assert_eq!(verify_transaction(&tx), Err(VerifyError::InvalidPublicKey));
        assert!(!tx.verify());
    }
}
