//! JSON-RPC 2.0 wire types.
//!
//! Only the client side lives here: the request the client sends and the
//! response envelope it expects back from a node.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::config::JSONRPC_VERSION;

/// Standard JSON-RPC error codes.
pub mod codes {
    /// Invalid JSON was received by the server.
    pub const PARSE_ERROR: i64 = -32700;
    /// The JSON sent is not a valid request object.
    pub const INVALID_REQUEST: i64 = -32600;
    /// The method does not exist.
    pub const METHOD_NOT_FOUND: i64 = -32601;
    /// Invalid method parameters. Also used for a non-JSON reply with a
    /// non-200 HTTP status.
    pub const INVALID_PARAMS: i64 = -32602;
    /// Internal error. Also used for a non-JSON reply with status 200.
    pub const INTERNAL_ERROR: i64 = -32603;
}

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// A JSON-RPC 2.0 request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    /// Always `"2.0"`.
    pub jsonrpc: String,
    /// Request identifier, unique per client.
    pub id: u64,
    pub method: String,
    /// Method parameters, passed through untouched.
    pub params: Value,
}

impl RpcRequest {
    pub fn new(id: u64, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            method: method.into(),
            params,
        }
    }
}

// ---------------------------------------------------------------------------
// Response
// ---------------------------------------------------------------------------

/// A JSON-RPC 2.0 response envelope.
///
/// `result` distinguishes a missing key (`None`) from an explicit `null`
/// (`Some(Value::Null)`). `error: null` is treated as absent; any other
/// `error` value is read with [`RpcErrorObject::from_lenient`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// The id echoed back by the node.
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    #[serde(
        default,
        deserialize_with = "lenient_error",
        skip_serializing_if = "Option::is_none"
    )]
    pub error: Option<RpcErrorObject>,
}

fn present_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn lenient_error<'de, D>(deserializer: D) -> Result<Option<RpcErrorObject>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok((!raw.is_null()).then(|| RpcErrorObject::from_lenient(&raw)))
}

/// The `error` member of a response.
///
/// Nodes are not always strict about this object, so both members default
/// when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcErrorObject {
    /// Read whatever a node put in `error`. A well-formed object keeps its
    /// members; a mistyped `code` becomes `0` and a mistyped `message`
    /// becomes empty. A bare string is taken as the message.
    pub fn from_lenient(raw: &Value) -> Self {
        match raw {
            Value::Object(map) => Self {
                code: map.get("code").and_then(Value::as_i64).unwrap_or_default(),
                message: map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                data: map.get("data").cloned(),
            },
            Value::String(message) => Self {
                code: 0,
                message: message.clone(),
                data: None,
            },
            other => Self {
                code: 0,
                message: String::new(),
                data: Some(other.clone()),
            },
        }
    }
}
