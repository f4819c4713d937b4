//! Error types.
//!
//! [`A2AError`] covers protocol faults a Message-Send endpoint reports on
//! the wire (each with its JSON-RPC code), outbound failures seen by the
//! router when calling a backend, and start-up configuration errors.
//!
//! Only protocol faults reach a JSON-RPC error object with their own code;
//! everything else is folded into -32603.

use crate::types::JsonRpcError;

/// Invalid JSON was received by the server.
pub const PARSE_ERROR: i64 = -32700;

/// The JSON sent is not a valid Request object.
pub const INVALID_REQUEST: i64 = -32600;

pub const METHOD_NOT_FOUND: i64 = -32601;

pub const INVALID_PARAMS: i64 = -32602;

pub const INTERNAL_ERROR: i64 = -32603;

/// A2A: the agent returned a response the caller could not use.
pub const INVALID_AGENT_RESPONSE: i64 = -32006;

#[derive(Debug, Clone, thiserror::Error)]
pub enum A2AError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    /// A backend reply that is valid JSON-RPC but carries no usable answer.
    #[error("Invalid agent response: {0}")]
    InvalidAgentResponse(String),

    /// Connection or request failure on the way to a remote service.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    /// Non-2xx answer from a remote service.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Body from a remote service that is not JSON, or not the expected shape.
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    /// Invalid or incomplete service configuration. Fatal at start-up.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type A2AResult<T> = Result<T, A2AError>;

impl A2AError {
    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::ParseError(message.into())
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound(method.into())
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams(message.into())
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }

    pub fn invalid_agent_response(message: impl Into<String>) -> Self {
        Self::InvalidAgentResponse(message.into())
    }

    /// The JSON-RPC code this error is reported with.
    pub fn code(&self) -> i64 {
        match self {
            A2AError::ParseError(_) => PARSE_ERROR,
            A2AError::InvalidRequest(_) => INVALID_REQUEST,
            A2AError::MethodNotFound(_) => METHOD_NOT_FOUND,
            A2AError::InvalidParams(_) => INVALID_PARAMS,
            A2AError::InvalidAgentResponse(_) => INVALID_AGENT_RESPONSE,
            _ => INTERNAL_ERROR,
        }
    }

    /// True for replies that arrived but could not be understood.
    pub fn is_malformed_reply(&self) -> bool {
        matches!(
            self,
            A2AError::InvalidJson(_) | A2AError::ParseError(_) | A2AError::InvalidAgentResponse(_)
        )
    }
}

impl From<A2AError> for JsonRpcError {
    fn from(err: A2AError) -> Self {
        JsonRpcError {
            code: err.code(),
            message: err.to_string(),
            data: None,
        }
    }
}

impl From<serde_json::Error> for A2AError {
    fn from(err: serde_json::Error) -> Self {
        A2AError::ParseError(err.to_string())
    }
}
