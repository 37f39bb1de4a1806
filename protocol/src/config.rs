//! # Protocol Configuration & Constants
//!
//! Every magic number in KCN lives here, together with the [`Network`]
//! enum that scopes addresses. Networks are passed explicitly to every
//! call that needs one; there is no global network table to mutate.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Network Identifiers
// ---------------------------------------------------------------------------

/// Bech32 HRP for mainnet addresses.
pub const MAINNET_HRP: &str = "kcn";

/// Bech32 HRP for regtest addresses.
pub const REGTEST_HRP: &str = "ktest";

/// The network a transaction or address belongs to.
///
/// Serialized as its lowercase name (`"mainnet"`, `"regtest"`).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Production network, prefix `kcn`.
    #[default]
    Mainnet,
    /// Local regression-test network, prefix `ktest`.
    Regtest,
}

impl Network {
    /// Every known network, in a stable order.
    pub const ALL: [Network; 2] = [Network::Mainnet, Network::Regtest];

    /// The network's name as used in config files and CLI flags.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Regtest => "regtest",
        }
    }

    /// The bech32 human-readable prefix of addresses on this network.
    pub fn address_prefix(&self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_HRP,
            Network::Regtest => REGTEST_HRP,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name a known network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown network: {0} (expected mainnet or regtest)")]
pub struct UnknownNetwork(pub String);

impl FromStr for Network {
    type Err = UnknownNetwork;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Network::Mainnet),
            "regtest" => Ok(Network::Regtest),
            _ => Err(UnknownNetwork(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Ed25519 seed / secret key length in bytes.
pub const SEED_LENGTH: usize = 32;

/// Ed25519 public key length in bytes. Also the payload of every address.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length in bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// SHA-256 content hash length in bytes.
pub const HASH_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

/// Exclusive upper bound for `amount` and `fee`: 2^63 - 1.
///
/// Values must be strictly less than this, so the largest accepted value
/// is 2^63 - 2.
pub const MAX_AMOUNT: u64 = i64::MAX as u64;

/// Maximum length of an address string, as enforced by reference bech32
/// decoders.
pub const MAX_ADDRESS_LENGTH: usize = 90;

/// Maximum length of the coin ticker, in characters.
pub const MAX_COIN_LENGTH: usize = 4;

/// Maximum memo length in bytes.
pub const MAX_MEMO_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// JSON-RPC Defaults
// ---------------------------------------------------------------------------

/// Node host used when none is configured.
pub const DEFAULT_RPC_HOST: &str = "localhost";

/// Node JSON-RPC port used when none is configured.
pub const DEFAULT_RPC_PORT: u16 = 8888;

/// Deadline for a whole JSON-RPC exchange, connect included.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(30);

/// Budget for establishing the connection. Never extends the call deadline.
pub const DEFAULT_RPC_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// JSON-RPC protocol version string carried in every envelope.
pub const JSONRPC_VERSION: &str = "2.0";
