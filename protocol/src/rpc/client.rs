//! JSON-RPC 2.0 client over HTTP.
//!
//! Each call gets one deadline, `Instant::now() + timeout`, that covers the
//! connect and the whole exchange. Establishing the connection has its own
//! budget, `connect_timeout`, capped by that deadline. Running out of it is
//! reported as [`RpcError::ConnectTimeout`]; hitting the deadline anywhere
//! else is [`RpcError::Timeout`].
//!
//! The HTTP work sits behind the [`Transport`] trait so the response
//! handling can be exercised without a network.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tokio::time::{timeout_at, Instant};
use tracing::{debug, trace, warn};

use super::error::RpcError;
use super::types::{codes, RpcErrorObject, RpcRequest, RpcResponse};
use crate::config::{
    DEFAULT_RPC_CONNECT_TIMEOUT, DEFAULT_RPC_HOST, DEFAULT_RPC_PORT, DEFAULT_RPC_TIMEOUT,
};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Where the node lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcConfig {
    pub host: String,
    pub port: u16,
    /// Budget for one complete call, connect included.
    pub timeout: Duration,
    /// Budget for establishing the connection, capped by `timeout`.
    pub connect_timeout: Duration,
}

impl RpcConfig {
    /// `http://host:port/`
    pub fn url(&self) -> String {
        format!("http://{}:{}/", self.host, self.port)
    }
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            timeout: DEFAULT_RPC_TIMEOUT,
            connect_timeout: DEFAULT_RPC_CONNECT_TIMEOUT,
        }
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// An HTTP reply: status code and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Delivers one request body and returns the node's reply.
///
/// Implementations must give up at `deadline`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, body: Vec<u8>, deadline: Instant) -> Result<HttpReply, RpcError>;
}

/// `POST` to the node URL through a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(config: &RpcConfig) -> Result<Self, RpcError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout.min(config.timeout))
            .build()
            .map_err(RpcError::Http)?;
        Ok(Self {
            http,
            url: config.url(),
        })
    }

    /// The URL every request is posted to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: Vec<u8>, deadline: Instant) -> Result<HttpReply, RpcError> {
        let request = self
            .http
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send();
        let response = timeout_at(deadline, request)
            .await
            .map_err(|_| RpcError::Timeout)?
            .map_err(classify)?;

        let status = response.status().as_u16();
        let body = timeout_at(deadline, response.bytes())
            .await
            .map_err(|_| RpcError::Timeout)?
            .map_err(classify)?;

        Ok(HttpReply {
            status,
            body: body.to_vec(),
        })
    }
}

/// Sort a `reqwest` failure into the connect / timeout / other buckets.
fn classify(err: reqwest::Error) -> RpcError {
    match (err.is_connect(), err.is_timeout()) {
        (true, true) => RpcError::ConnectTimeout,
        (true, false) => RpcError::Connect(err),
        (false, true) => RpcError::Timeout,
        (false, false) => RpcError::Http(err),
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// JSON-RPC client. Ids are unique per client: a counter seeded from the
/// wall clock in milliseconds.
#[derive(Debug)]
pub struct RpcClient<T = HttpTransport> {
    transport: T,
    timeout: Duration,
    next_id: AtomicU64,
}

impl RpcClient<HttpTransport> {
    pub fn new(config: &RpcConfig) -> Result<Self, RpcError> {
        Ok(Self::with_transport(HttpTransport::new(config)?, config.timeout))
    }
}

impl<T: Transport> RpcClient<T> {
    pub fn with_transport(transport: T, timeout: Duration) -> Self {
        let seed = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        Self {
            transport,
            timeout,
            next_id: AtomicU64::new(seed),
        }
    }

    /// The per-call deadline budget.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Invoke `method` and return its `result`.
    ///
    /// A present `error` wins over `result`. A `null` result is returned as
    /// [`Value::Null`].
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, RpcError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::to_vec(&RpcRequest::new(id, method, params))?;
        let deadline = Instant::now() + self.timeout;

        trace!(id, method, bytes = body.len(), "sending rpc request");
        let reply = self.transport.send(body, deadline).await?;
        debug!(id, method, status = reply.status, "rpc reply received");

        interpret_reply(&reply)
    }

    /// Like [`RpcClient::call`], but gives up with [`RpcError::Cancelled`]
    /// as soon as `cancel` holds `true`.
    pub async fn call_with_cancel(
        &self,
        method: &str,
        params: Value,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<Value, RpcError> {
        tokio::select! {
            biased;
            _ = cancelled(&mut cancel) => {
                debug!(method, "rpc request cancelled");
                Err(RpcError::Cancelled)
            }
            result = self.call(method, params) => result,
        }
    }

    /// [`RpcClient::call`] and deserialize the result into `R`.
    pub async fn call_typed<R: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<R, RpcError> {
        let value = self.call(method, params).await?;
        Ok(serde_json::from_value(value)?)
    }
}

/// Resolves once the channel reads `true`. A dropped sender never cancels.
async fn cancelled(rx: &mut watch::Receiver<bool>) {
    loop {
        if *rx.borrow_and_update() {
            return;
        }
        if rx.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

fn interpret_reply(reply: &HttpReply) -> Result<Value, RpcError> {
    let Ok(decoded) = serde_json::from_slice::<Value>(&reply.body) else {
        return Err(if reply.status != 200 {
            RpcError::Remote {
                code: codes::INVALID_PARAMS,
                message: format!("Invalid params, response status code: {}", reply.status),
            }
        } else {
            RpcError::Remote {
                code: codes::INTERNAL_ERROR,
                message: "Problem parsing JSON response from server".to_string(),
            }
        });
    };

    // Any non-null `error` fails the call, whatever its shape.
    if let Some(raw) = decoded.get("error").filter(|e| !e.is_null()) {
        let error = RpcErrorObject::from_lenient(raw);
        warn!(code = error.code, message = %error.message, "node returned an rpc error");
        return Err(RpcError::Remote {
            code: error.code,
            message: error.message,
        });
    }

    let response: RpcResponse = serde_json::from_value(decoded)
        .map_err(|e| RpcError::MalformedResponse(e.to_string()))?;

    response
        .result
        .ok_or_else(|| RpcError::MalformedResponse("neither result nor error".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Replies with a canned response and records what it was sent.
    struct MockTransport {
        reply: HttpReply,
        sent: Mutex<Vec<Vec<u8>>>,
    }

    impl MockTransport {
        fn new(status: u16, body: &str) -> Self {
            Self {
                reply: HttpReply {
                    status,
                    body: body.as_bytes().to_vec(),
                },
                sent: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, body: Vec<u8>, _deadline: Instant) -> Result<HttpReply, RpcError> {
            self.sent.lock().unwrap().push(body);
            Ok(self.reply.clone())
        }
    }

    /// Never answers.
    struct StalledTransport;

    #[async_trait]
    impl Transport for StalledTransport {
        async fn send(&self, _body: Vec<u8>, deadline: Instant) -> Result<HttpReply, RpcError> {
            tokio::time::sleep_until(deadline).await;
            Err(RpcError::Timeout)
        }
    }

    /// Never gets past the connect phase.
    struct UnreachableTransport;

    #[async_trait]
    impl Transport for UnreachableTransport {
        async fn send(&self, _body: Vec<u8>, deadline: Instant) -> Result<HttpReply, RpcError> {
            tokio::time::sleep_until(deadline).await;
            Err(RpcError::ConnectTimeout)
        }
    }

    fn client(status: u16, body: &str) -> RpcClient<MockTransport> {
        RpcClient::with_transport(MockTransport::new(status, body), Duration::from_secs(1))
    }

    #[tokio::test]
    async fn result_is_returned() {
        let c = client(200, r#"{"jsonrpc":"2.0","id":1,"result":{"balance":42}}"#);
        let value = c.call("getbalance", json!({})).await.unwrap();
        assert_eq!(value, json!({"balance": 42}));
    }

    #[tokio::test]
    async fn null_result_resolves_to_null() {
        let c = client(200, r#"{"jsonrpc":"2.0","id":1,"result":null}"#);
        assert_eq!(c.call("ping", json!([])).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn error_wins_over_result() {
        let c = client(
            200,
            r#"{"jsonrpc":"2.0","id":1,"result":1,"error":{"code":-32601,"message":"method not found"}}"#,
        );
        match c.call("nope", json!({})).await {
            Err(RpcError::Remote { code, message }) => {
                assert_eq!(code, codes::METHOD_NOT_FOUND);
                assert_eq!(message, "method not found");
            }
            other => panic!("expected remote error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn neither_result_nor_error_is_malformed() {
        let c = client(200, r#"{"jsonrpc":"2.0","id":1}"#);
        assert!(matches!(
            c.call("x", json!({})).await,
            Err(RpcError::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn any_present_error_is_remote() {
        for (body, want_code, want_message) in [
            (r#"{"jsonrpc":"2.0","id":1,"error":"boom"}"#, 0, "boom"),
            (r#"{"jsonrpc":"2.0","id":1,"error":{"code":"x"}}"#, 0, ""),
            (r#"{"jsonrpc":"2.0","id":1,"error":{"code":-5,"message":null}}"#, -5, ""),
            (r#"{"jsonrpc":2,"id":1,"error":[1,2]}"#, 0, ""),
        ] {
            match client(200, body).call("x", json!({})).await {
                Err(RpcError::Remote { code, message }) => {
                    assert_eq!(code, want_code, "{body}");
                    assert_eq!(message, want_message, "{body}");
                }
                other => panic!("{body}: expected remote error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn null_error_falls_through_to_result() {
        let c = client(200, r#"{"jsonrpc":"2.0","id":1,"error":null,"result":3}"#);
        assert_eq!(c.call("x", json!({})).await.unwrap(), json!(3));
    }

    #[tokio::test]
    async fn non_json_with_error_status() {
        let c = client(500, "Internal Server Error");
        match c.call("x", json!({})).await {
            Err(RpcError::Remote { code, message }) => {
                assert_eq!(code, -32602);
                assert_eq!(message, "Invalid params, response status code: 500");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_with_ok_status() {
        let c = client(200, "<html>");
        match c.call("x", json!({})).await {
            Err(RpcError::Remote { code, message }) => {
                assert_eq!(code, -32603);
                assert_eq!(message, "Problem parsing JSON response from server");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn request_shape_and_unique_ids() {
        let c = client(200, r#"{"result":true}"#);
        c.call("first", json!({"a": 1})).await.unwrap();
        c.call("second", json!([1, 2])).await.unwrap();

        let sent = c.transport.sent.lock().unwrap();
        let first: Value = serde_json::from_slice(&sent[0]).unwrap();
        let second: Value = serde_json::from_slice(&sent[1]).unwrap();

        assert_eq!(first["jsonrpc"], "2.0");
        assert_eq!(first["method"], "first");
        assert_eq!(first["params"], json!({"a": 1}));
        assert_ne!(first["id"], second["id"]);
    }

    #[tokio::test]
    async fn typed_result() {
        #[derive(serde::Deserialize)]
        struct Balance {
            balance: u64,
        }
        let c = client(200, r#"{"result":{"balance":7}}"#);
        let b: Balance = c.call_typed("getbalance", json!({})).await.unwrap();
        assert_eq!(b.balance, 7);

        let c = client(200, r#"{"result":"seven"}"#);
        assert!(matches!(
            c.call_typed::<Balance>("getbalance", json!({})).await,
            Err(RpcError::Json(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_connect_surfaces_connect_timeout() {
        let c = RpcClient::with_transport(UnreachableTransport, Duration::from_millis(250));
        let started = Instant::now();
        assert!(matches!(
            c.call("ping", json!({})).await,
            Err(RpcError::ConnectTimeout)
        ));
        assert!(started.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test]
    async fn connect_budget_ends_a_stalled_connect() {
        // Nothing answers on a blackholed address, so the connect budget is
        // what ends the call, not the overall deadline.
        let config = RpcConfig {
            host: "10.255.255.1".to_string(),
            port: 9,
            timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_millis(200),
        };
        let started = Instant::now();
        let outcome = RpcClient::new(&config).unwrap().call("ping", json!({})).await;
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(
            matches!(outcome, Err(RpcError::ConnectTimeout) | Err(RpcError::Connect(_))),
            "{outcome:?}"
        );
    }

    #[tokio::test]
    async fn cancellation_aborts_pending_call() {
        let c = RpcClient::with_transport(StalledTransport, Duration::from_secs(30));
        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            let _ = tx.send(true);
        });
        assert!(matches!(
            c.call_with_cancel("slow", json!({}), rx).await,
            Err(RpcError::Cancelled)
        ));
    }

    #[tokio::test]
    async fn already_cancelled_never_sends() {
        let c = client(200, r#"{"result":1}"#);
        let (_tx, rx) = watch::channel(true);
        assert!(matches!(
            c.call_with_cancel("x", json!({}), rx).await,
            Err(RpcError::Cancelled)
        ));
        assert!(c.transport.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dropped_cancel_sender_does_not_cancel() {
        let c = client(200, r#"{"result":1}"#);
        let (tx, rx) = watch::channel(false);
        drop(tx);
        assert_eq!(c.call_with_cancel("x", json!({}), rx).await.unwrap(), json!(1));
    }

    // -- Real sockets ---------------------------------------------------------

    /// Accept one connection, read the request, answer with `body`, then
    /// hold the socket open for `linger`.
    async fn serve_once(
        head: &'static str,
        body: &'static str,
        linger: Duration,
    ) -> (RpcConfig, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                buf.extend_from_slice(&chunk[..n]);
                if n == 0 || request_complete(&buf) {
                    break;
                }
            }
            let response = format!(
                "{head}HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            tokio::time::sleep(linger).await;
            String::from_utf8(buf).unwrap()
        });
        let config = RpcConfig {
            host: "127.0.0.1".to_string(),
            port,
            timeout: Duration::from_secs(5),
            ..RpcConfig::default()
        };
        (config, handle)
    }

    fn request_complete(buf: &[u8]) -> bool {
        let Some(split) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            return false;
        };
        let head = String::from_utf8_lossy(&buf[..split]).to_ascii_lowercase();
        let len = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        buf.len() >= split + 4 + len
    }

    const PONG: &str = r#"{"jsonrpc":"2.0","id":1,"result":"pong"}"#;

    #[tokio::test]
    async fn http_roundtrip_against_local_server() {
        let (config, server) = serve_once("", PONG, Duration::ZERO).await;
        let client = RpcClient::new(&config).unwrap();
        assert_eq!(client.call("ping", json!({})).await.unwrap(), json!("pong"));

        let request = server.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST / HTTP/1.1\r\n"), "{request}");
        assert!(lower.contains("content-type: application/json"), "{request}");
        assert!(request.contains(r#""method":"ping""#));
    }

    #[tokio::test]
    async fn reply_on_kept_alive_socket_is_not_a_timeout() {
        let (config, _server) = serve_once("", PONG, Duration::from_secs(10)).await;
        let config = RpcConfig {
            timeout: Duration::from_secs(2),
            ..config
        };
        let client = RpcClient::new(&config).unwrap();
        assert_eq!(client.call("ping", json!({})).await.unwrap(), json!("pong"));
    }

    #[tokio::test]
    async fn interim_continue_head_is_skipped() {
        let (config, _server) =
            serve_once("HTTP/1.1 100 Continue\r\n\r\n", PONG, Duration::ZERO).await;
        let client = RpcClient::new(&config).unwrap();
        assert_eq!(client.call("ping", json!({})).await.unwrap(), json!("pong"));
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let _server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(Duration::from_secs(10)).await;
            drop(socket);
        });

        let config = RpcConfig {
            host: "127.0.0.1".to_string(),
            port,
            timeout: Duration::from_millis(100),
            ..RpcConfig::default()
        };
        assert!(matches!(
            RpcClient::new(&config).unwrap().call("ping", json!({})).await,
            Err(RpcError::Timeout)
        ));
    }

    #[tokio::test]
    async fn refused_connection_is_connect_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let config = RpcConfig {
            host: "127.0.0.1".to_string(),
            port,
            timeout: Duration::from_secs(2),
            ..RpcConfig::default()
        };
        assert!(matches!(
            RpcClient::new(&config).unwrap().call("ping", json!({})).await,
            Err(RpcError::Connect(_))
        ));
    }

    #[test]
    fn default_config() {
        let config = RpcConfig::default();
        assert_eq!(config.host, "localhost");
        assert_eq!(config.port, 8888);
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.url(), "http://localhost:8888/");
    }
}
