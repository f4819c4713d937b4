//! In-process transport.
//!
//! Calls a [`RequestHandler`] living in the same process instead of going
//! over HTTP. Replies stay typed, so the normalizer sees object-form parts.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{A2AError, A2AResult};
use crate::normalize::ReplyPayload;
use crate::server::RequestHandler;
use crate::types::{JsonRpcError, JsonRpcRequest, SendMessageParams};

use super::transport::{BackendReply, Transport};

/// Transport that hands `message/send` straight to a local handler.
pub struct LocalTransport {
    handler: Arc<dyn RequestHandler>,
}

impl LocalTransport {
    pub fn new(handler: Arc<dyn RequestHandler>) -> Self {
        Self { handler }
    }
}

fn error_reply(err: A2AError) -> A2AResult<BackendReply> {
    let error = serde_json::to_value(JsonRpcError::from(err))?;
    Ok(BackendReply::Error(error))
}

#[async_trait]
impl Transport for LocalTransport {
    async fn send(&self, request: &JsonRpcRequest) -> A2AResult<BackendReply> {
        if request.method != "message/send" {
            return error_reply(A2AError::method_not_found(request.method.as_str()));
        }
        let params = request
            .params
            .clone()
            .ok_or_else(|| A2AError::invalid_params("missing params"))
            .and_then(|params| {
                serde_json::from_value::<SendMessageParams>(params)
                    .map_err(|e| A2AError::invalid_params(e.to_string()))
            });
        let params = match params {
            Ok(params) => params,
            Err(e) => return error_reply(e),
        };
        match self.handler.on_message_send(params).await {
            Ok(message) => Ok(BackendReply::Result(ReplyPayload::from_message(message))),
            Err(e) => error_reply(e),
        }
    }
}
