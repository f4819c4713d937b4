//! Transport layer for outbound backend calls.
//!
//! Provides the [`Transport`] trait for abstracting over how a JSON-RPC
//! request reaches a backend, and [`JsonRpcTransport`] for the standard
//! JSON-RPC over HTTP binding. Transports decode the reply once, at this
//! boundary, into a [`BackendReply`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::{json, Value};

use crate::error::{A2AError, A2AResult};
use crate::normalize::ReplyPayload;
use crate::types::{JsonRpcId, JsonRpcRequest, Message, SendMessageConfiguration, JSONRPC_VERSION};

/// A decoded backend reply: either a result or the raw JSON-RPC error object.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendReply {
    /// The `result` member, decoded into tagged parts.
    Result(ReplyPayload),
    /// The `error` member, kept as sent so it can be shown verbatim.
    Error(Value),
}

/// Transport abstraction for backend communication.
///
/// Implementations send one `message/send` envelope and report failures to
/// reach the backend or to read its reply as `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a JSON-RPC request and receive the decoded reply.
    async fn send(&self, request: &JsonRpcRequest) -> A2AResult<BackendReply>;
}

/// Build the `message/send` envelope for one outbound call.
///
/// The configuration always asks for `text/plain` output.
pub fn build_request(id: i64, message: Message) -> A2AResult<JsonRpcRequest> {
    let params = json!({
        "message": serde_json::to_value(message)?,
        "configuration": serde_json::to_value(SendMessageConfiguration::text_only())?,
    });
    Ok(JsonRpcRequest {
        jsonrpc: JSONRPC_VERSION.to_string(),
        id: Some(JsonRpcId::Number(id)),
        method: "message/send".to_string(),
        params: Some(params),
    })
}

/// Decode a JSON-RPC response body.
///
/// A present, non-null `error` wins over `result`.
pub fn decode_response(body: Value) -> A2AResult<BackendReply> {
    let mut obj = match body {
        Value::Object(obj) => obj,
        other => {
            return Err(A2AError::InvalidJson(format!(
                "response is not a JSON object: {}",
                other
            )))
        }
    };
    match (obj.remove("error"), obj.remove("result")) {
        (Some(error), _) if !error.is_null() => Ok(BackendReply::Error(error)),
        (_, Some(result)) => ReplyPayload::decode(result).map(BackendReply::Result),
        _ => Err(A2AError::invalid_agent_response(
            "response has neither 'result' nor 'error'",
        )),
    }
}

/// Configuration for [`JsonRpcTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Request timeout. Defaults to 60 seconds.
    pub timeout: Duration,
    /// Additional HTTP headers to include on every request.
    pub headers: HashMap<String, String>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            headers: HashMap::new(),
        }
    }
}

/// JSON-RPC over HTTP transport using `reqwest`.
///
/// Sends POST requests with `Content-Type: application/json`. Non-2xx
/// statuses are errors, as are bodies that are not a JSON-RPC response.
///
/// # Example
///
/// ```no_run
/// use a2a_router::client::JsonRpcTransport;
///
/// let transport = JsonRpcTransport::new("http://localhost:8002/");
/// ```
#[derive(Debug, Clone)]
pub struct JsonRpcTransport {
    client: reqwest::Client,
    url: String,
}

impl JsonRpcTransport {
    /// Create a new transport targeting the given endpoint URL.
    ///
    /// Uses default configuration (60s timeout, no extra headers).
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_config(url, TransportConfig::default())
    }

    /// Create a new transport with custom configuration.
    pub fn with_config(url: impl Into<String>, config: TransportConfig) -> Self {
        let mut default_headers = HeaderMap::new();
        for (key, value) in &config.headers {
            if let (Ok(name), Ok(val)) = (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value),
            ) {
                default_headers.insert(name, val);
            }
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(default_headers)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            url: url.into(),
        }
    }

    /// Returns the URL this transport sends requests to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Transport for JsonRpcTransport {
    async fn send(&self, request: &JsonRpcRequest) -> A2AResult<BackendReply> {
        let body = serde_json::to_vec(request).map_err(|e| {
            A2AError::Transport(format!("failed to serialize JSON-RPC request: {e}"))
        })?;

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    A2AError::Timeout(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    A2AError::Transport(format!("connection failed: {e}"))
                } else {
                    A2AError::Transport(format!("HTTP request failed: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(A2AError::Http {
                status: status.as_u16(),
                body: body_text,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| A2AError::Transport(format!("failed to read response body: {e}")))?;

        let body: Value = serde_json::from_slice(&bytes).map_err(|e| {
            A2AError::InvalidJson(format!("failed to parse JSON-RPC response: {e}"))
        })?;

        decode_response(body)
    }
}
