//! # CLI Interface
//!
//! Argument structure for the `kcn` binary, via `clap` derive. Every flag
//! that a script is likely to set repeatedly also reads a `KCN_*`
//! environment variable.

use clap::{Args, Parser, Subcommand};

use kcn_protocol::config::{Network, DEFAULT_RPC_HOST, DEFAULT_RPC_PORT};

use crate::logging::LogFormat;

/// KCN transaction toolkit.
///
/// Generate keys, derive and check addresses, build and sign transactions,
/// verify them, and talk to a node over JSON-RPC.
#[derive(Parser, Debug)]
#[command(name = "kcn", about = "KCN transaction toolkit", version, propagate_version = true)]
pub struct KcnCli {
    /// Network whose address prefix applies (mainnet or regtest).
    #[arg(long, global = true, env = "KCN_NETWORK", default_value_t = Network::Mainnet)]
    pub network: Network,

    /// Log output format.
    #[arg(long, global = true, env = "KCN_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a key pair, or derive one from a seed.
    Keygen(KeygenArgs),
    /// Encode a public key as an address, or check an address.
    Address(AddressArgs),
    /// Build and sign a transaction; prints its plain-form JSON.
    Sign(SignArgs),
    /// Verify a transaction given as plain-form JSON.
    Verify(VerifyArgs),
    /// Call a JSON-RPC method on a node.
    Rpc(RpcArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Hex-encoded 32-byte seed. A random key is generated when omitted.
    #[arg(long, env = "KCN_SEED", hide_env_values = true)]
    pub seed: Option<String>,
}

#[derive(Args, Debug)]
pub struct AddressArgs {
    /// Hex-encoded public key to encode.
    #[arg(long, conflicts_with = "check", required_unless_present = "check")]
    pub public_key: Option<String>,

    /// Address to check; exits non-zero when invalid.
    #[arg(long)]
    pub check: Option<String>,
}

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Hex-encoded 32-byte seed of the signing key.
    #[arg(long, env = "KCN_SEED", hide_env_values = true)]
    pub seed: String,

    /// Recipient address.
    #[arg(long)]
    pub to: String,

    #[arg(long)]
    pub amount: u64,

    /// Coin ticker, e.g. KCN.
    #[arg(long)]
    pub coin: String,

    #[arg(long, default_value_t = 0)]
    pub fee: u64,

    #[arg(long, default_value_t = 0)]
    pub nonce: u64,

    /// Sender address. Without it the recipient's key signs.
    #[arg(long, conflicts_with = "from_self")]
    pub from: Option<String>,

    /// Use the signing key's own address as sender.
    #[arg(long)]
    pub from_self: bool,

    #[arg(long, default_value = "")]
    pub memo: String,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Plain-form JSON, as printed by `kcn sign`.
    pub json: String,
}

#[derive(Args, Debug)]
pub struct RpcArgs {
    /// Method name.
    pub method: String,

    /// Parameters as a JSON value. Defaults to `{}`.
    pub params: Option<String>,

    #[arg(long, env = "KCN_RPC_HOST", default_value = DEFAULT_RPC_HOST)]
    pub host: String,

    #[arg(long, env = "KCN_RPC_PORT", default_value_t = DEFAULT_RPC_PORT)]
    pub port: u16,

    /// Deadline for the whole call, in milliseconds.
    #[arg(long, env = "KCN_RPC_TIMEOUT_MS", default_value_t = 30_000)]
    pub timeout_ms: u64,

    /// Budget for establishing the connection, in milliseconds.
    #[arg(long, env = "KCN_RPC_CONNECT_TIMEOUT_MS", default_value_t = 10_000)]
    pub connect_timeout_ms: u64,
}
