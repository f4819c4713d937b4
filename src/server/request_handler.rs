//! Request handler: the Message-Send surface every service exposes.
//!
//! The [`RequestHandler`] trait defines the interface that the axum
//! integration layer calls for each JSON-RPC method. Only `message/send`
//! carries behavior; the remaining protocol methods are inert and answer
//! with `null` unless an implementation overrides them.
//!
//! [`BackendHandler`] is the standard implementation for a backend service:
//! it pulls the query text out of the inbound message, hands it to a
//! [`Backend`] and wraps the answer in an agent message.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::backends::Backend;
use crate::error::{A2AError, A2AResult};
use crate::types::{Message, SendMessageParams};
use crate::utils::{first_text_part, new_agent_text_message};

/// Trait for handling A2A JSON-RPC requests.
///
/// Each method corresponds to an A2A JSON-RPC method. The axum integration
/// layer dispatches incoming requests to these methods.
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Handle `message/send`: answer one inbound message with one message.
    async fn on_message_send(&self, params: SendMessageParams) -> A2AResult<Message>;

    /// Handle `tasks/get`. Inert.
    async fn on_get_task(&self, _params: Value) -> A2AResult<Value> {
        Ok(Value::Null)
    }

    /// Handle `tasks/cancel`. Inert.
    async fn on_cancel_task(&self, _params: Value) -> A2AResult<Value> {
        Ok(Value::Null)
    }

    /// Handle `message/stream`. Inert: nothing is streamed.
    async fn on_message_send_stream(&self, _params: Value) -> A2AResult<Value> {
        Ok(Value::Null)
    }

    /// Handle `tasks/pushNotificationConfig/set`. Inert.
    async fn on_set_task_push_notification_config(&self, _params: Value) -> A2AResult<Value> {
        Ok(Value::Null)
    }

    /// Handle `tasks/pushNotificationConfig/get`. Inert.
    async fn on_get_task_push_notification_config(&self, _params: Value) -> A2AResult<Value> {
        Ok(Value::Null)
    }

    /// Handle `tasks/resubscribe`. Inert.
    async fn on_resubscribe_to_task(&self, _params: Value) -> A2AResult<Value> {
        Ok(Value::Null)
    }
}

/// The query carried by an inbound `message/send`: the text of `parts[0]`.
pub fn query_text(params: &SendMessageParams) -> A2AResult<&str> {
    first_text_part(&params.message.parts)
        .ok_or_else(|| A2AError::invalid_params("message must start with a text part"))
}

/// Message-Send endpoint for one backend.
///
/// Backend failures are returned as errors so the endpoint answers with a
/// JSON-RPC error object, which the router shows verbatim.
pub struct BackendHandler {
    backend: Arc<dyn Backend>,
}

impl BackendHandler {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl RequestHandler for BackendHandler {
    async fn on_message_send(&self, params: SendMessageParams) -> A2AResult<Message> {
        let query = query_text(&params)?;
        debug!(backend = self.backend.name(), "Answering query");
        match self.backend.answer(query).await {
            Ok(answer) => Ok(new_agent_text_message(answer)),
            Err(e) => {
                warn!(backend = self.backend.name(), error = %e, "Backend failed to answer");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Part;
    use crate::utils::new_user_text_message;

    struct Echo;

    #[async_trait]
    impl Backend for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        async fn answer(&self, query: &str) -> A2AResult<String> {
            if query == "fail" {
                return Err(A2AError::Other("tool call failed".to_string()));
            }
            Ok(format!("echo: {}", query))
        }
    }

    fn params(message: Message) -> SendMessageParams {
        SendMessageParams {
            message,
            configuration: None,
            metadata: None,
        }
    }

    #[tokio::test]
    async fn backend_answer_becomes_agent_message() {
        let handler = BackendHandler::new(Arc::new(Echo));
        let reply = handler
            .on_message_send(params(new_user_text_message("hi")))
            .await
            .unwrap();
        assert_eq!(reply.role, crate::types::Role::Agent);
        assert_eq!(reply.parts, vec![Part::text("echo: hi")]);
    }

    #[tokio::test]
    async fn empty_message_is_invalid_params() {
        let mut message = new_user_text_message("x");
        message.parts.clear();
        let err = BackendHandler::new(Arc::new(Echo))
            .on_message_send(params(message))
            .await
            .unwrap_err();
        assert_eq!(err.code(), crate::error::INVALID_PARAMS);
    }

    #[tokio::test]
    async fn backend_errors_propagate() {
        let err = BackendHandler::new(Arc::new(Echo))
            .on_message_send(params(new_user_text_message("fail")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("tool call failed"));
    }

    #[tokio::test]
    async fn stubs_return_null() {
        let handler = BackendHandler::new(Arc::new(Echo));
        assert!(handler.on_get_task(Value::Null).await.unwrap().is_null());
        assert!(handler.on_cancel_task(Value::Null).await.unwrap().is_null());
        assert!(handler
            .on_resubscribe_to_task(Value::Null)
            .await
            .unwrap()
            .is_null());
    }
}
