//! Error type for the JSON-RPC client.

use thiserror::Error;

/// Everything that can go wrong with a single RPC call.
#[derive(Debug, Error)]
pub enum RpcError {
    /// The connection was not established within its budget.
    #[error("connect timed out")]
    ConnectTimeout,

    /// The deadline expired after connecting, while sending or receiving.
    #[error("request timed out")]
    Timeout,

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// The node could not be reached: refused, unresolvable, reset.
    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    /// Any other HTTP failure, including building the client.
    #[error("http error: {0}")]
    Http(#[source] reqwest::Error),

    /// The node answered with a JSON-RPC error, or with a body that is not
    /// JSON at all (see [`codes`](super::types::codes)).
    #[error("rpc error {code}: {message}")]
    Remote { code: i64, message: String },

    /// The body is JSON but carries neither `result` nor `error`.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Encoding the request or decoding a typed result failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
