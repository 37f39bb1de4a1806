//! # RPC Module
//!
//! A small JSON-RPC 2.0 client for talking to a KCN node: submit signed
//! transactions, query balances, and so on. Method names and parameter
//! shapes are the node's business; the client passes them through.
//!
//! ```text
//! types.rs  — request / response envelopes and standard error codes
//! error.rs  — RpcError
//! client.rs — RpcConfig, Transport, HttpTransport, RpcClient
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{HttpReply, HttpTransport, RpcClient, RpcConfig, Transport};
pub use error::RpcError;
pub use types::{RpcErrorObject, RpcRequest, RpcResponse};
