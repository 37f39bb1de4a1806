// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # KCN Command-Line Tool
//!
//! Entry point for the `kcn` binary. Parses CLI arguments, initializes
//! logging, and dispatches to a subcommand:
//!
//! - `keygen`  — generate or derive a key pair
//! - `address` — encode a public key / check an address
//! - `sign`    — build and sign a transaction
//! - `verify`  — verify a plain-form transaction
//! - `rpc`     — call a node's JSON-RPC API
//! - `version` — print build version information

mod cli;
mod logging;

use std::process::ExitCode;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde_json::{json, Value};
use tokio::sync::watch;

use kcn_protocol::config::Network;
use kcn_protocol::crypto::{KcnKeypair, KcnPublicKey};
use kcn_protocol::identity::{address_to_public_key, public_key_to_address};
use kcn_protocol::rpc::{RpcClient, RpcConfig, RpcError};
use kcn_protocol::transaction::{verify_transaction, Transaction, TransactionBuilder};

use cli::{AddressArgs, Commands, KcnCli, KeygenArgs, RpcArgs, SignArgs, VerifyArgs};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = KcnCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    let network = cli.network;
    match cli.command {
        Commands::Keygen(args) => keygen(args, network),
        Commands::Address(args) => address(args, network),
        Commands::Sign(args) => sign(args, network),
        Commands::Verify(args) => verify(args, network),
        Commands::Rpc(args) => rpc(args).await,
        Commands::Version => {
            print_version();
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Prints seed, public key and address as JSON.
fn keygen(args: KeygenArgs, network: Network) -> Result<ExitCode> {
    let keypair = match args.seed {
        Some(seed) => KcnKeypair::from_seed_hex(&seed).context("invalid --seed")?,
        None => KcnKeypair::generate(),
    };
    let public_key = keypair.public_key();

    let out = json!({
        "network": network,
        "seed": keypair.seed_hex(),
        "public_key": public_key.to_hex(),
        "address": public_key.to_address(network),
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(ExitCode::SUCCESS)
}

fn address(args: AddressArgs, network: Network) -> Result<ExitCode> {
    if let Some(addr) = args.check {
        return Ok(match address_to_public_key(&addr, network) {
            Ok(_) => {
                println!("valid");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::info!(%addr, error = %e, "address rejected");
                println!("invalid");
                ExitCode::FAILURE
            }
        });
    }

    let Some(key_hex) = args.public_key else {
        bail!("either --public-key or --check is required");
    };
    let raw = hex::decode(key_hex.trim()).context("--public-key is not hex")?;
    if raw.len() == 32 && KcnPublicKey::try_from_slice(&raw).is_err() {
        tracing::warn!("public key is not a valid Ed25519 point; encoding anyway");
    }
    println!("{}", public_key_to_address(&raw, network)?);
    Ok(ExitCode::SUCCESS)
}

fn sign(args: SignArgs, network: Network) -> Result<ExitCode> {
    let keypair = KcnKeypair::from_seed_hex(&args.seed).context("invalid --seed")?;

    let mut builder = TransactionBuilder::new()
        .to(args.to)
        .amount(args.amount)
        .coin(args.coin)
        .fee(args.fee)
        .nonce(args.nonce)
        .memo(args.memo);
    if args.from_self {
        builder = builder.from(keypair.address(network));
    } else if let Some(from) = args.from {
        builder = builder.from(from);
    }

    let mut tx = builder.build(network).context("transaction rejected")?;
    tx.sign(&keypair);

    if !tx.verify() {
        tracing::warn!(
            signer = tx.fields().signer_address(),
            "signing key does not match the signer address; the transaction will not verify"
        );
    }

    println!("{tx}");
    Ok(ExitCode::SUCCESS)
}

fn verify(args: VerifyArgs, network: Network) -> Result<ExitCode> {
    let tx = Transaction::from_json(&args.json, network).context("cannot read transaction")?;
    match verify_transaction(&tx) {
        Ok(()) => println!("valid"),
        Err(e) => {
            tracing::info!(hash = %tx.hash_hex(), reason = %e, "verification failed");
            println!("invalid");
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn rpc(args: RpcArgs) -> Result<ExitCode> {
    let params: Value = match args.params.as_deref() {
        Some(text) => serde_json::from_str(text).context("params are not valid JSON")?,
        None => json!({}),
    };
    let config = RpcConfig {
        host: args.host,
        port: args.port,
        timeout: Duration::from_millis(args.timeout_ms),
        connect_timeout: Duration::from_millis(args.connect_timeout_ms),
    };
    tracing::info!(host = %config.host, port = config.port, method = %args.method, "calling node");

    // Ctrl+C cancels the in-flight call.
    let (cancel_tx, cancel_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = cancel_tx.send(true);
        }
    });

    let client = RpcClient::new(&config).context("cannot set up the http client")?;
    let result = match client.call_with_cancel(&args.method, params, cancel_rx).await {
        Err(RpcError::Cancelled) => {
            eprintln!("cancelled");
            return Ok(ExitCode::from(130));
        }
        other => other.with_context(|| format!("{} failed", args.method))?,
    };

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(ExitCode::SUCCESS)
}

/// Prints version information to stdout.
fn print_version() {
    println!("kcn   {}", env!("CARGO_PKG_VERSION"));
    println!("rustc {}", rustc_version());
}

/// Returns the Rust compiler version used to build this binary.
fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
