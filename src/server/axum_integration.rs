//! Axum integration: ready-made HTTP routes for A2A services.
//!
//! Provides an [`a2a_router`] function that creates an axum `Router` with:
//! - `POST /`: JSON-RPC 2.0 dispatch
//! - `GET /.well-known/agent.json` and `GET /.well-known/agent-card.json`:
//!   agent card discovery
//!
//! # Supported JSON-RPC Methods
//!
//! | Method | Description |
//! |--------|-------------|
//! | `message/send` | Send a message and get a message back |
//! | `message/stream` | Inert, returns `null` |
//! | `tasks/get` | Inert, returns `null` |
//! | `tasks/cancel` | Inert, returns `null` |
//! | `tasks/resubscribe` | Inert, returns `null` |
//! | `tasks/pushNotificationConfig/set` | Inert, returns `null` |
//! | `tasks/pushNotificationConfig/get` | Inert, returns `null` |
//!
//! # Example
//!
//! ```rust,ignore
//! use a2a_router::server::{a2a_router, BackendHandler};
//! use std::sync::Arc;
//!
//! let handler = Arc::new(BackendHandler::new(backend));
//! let app = a2a_router(handler, agent_card);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8001").await?;
//! axum::serve(listener, app).await?;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::Value;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::error::A2AError;
use crate::types::{
    AgentCard, JsonRpcId, JsonRpcRequest, JsonRpcResponse, SendMessageParams, JSONRPC_VERSION,
};
use crate::utils::{AGENT_CARD_WELL_KNOWN_PATH, DEFAULT_RPC_URL, PREV_AGENT_CARD_WELL_KNOWN_PATH};

use super::request_handler::RequestHandler;

/// Service context shared by every route, built once at start-up.
struct AppState {
    handler: Arc<dyn RequestHandler>,
    agent_card: AgentCard,
}

/// Create an axum Router with A2A protocol routes.
///
/// # Parameters
///
/// - `handler`: the request handler implementing the service
/// - `agent_card`: the agent card to serve at the well-known endpoints
pub fn a2a_router(handler: Arc<dyn RequestHandler>, agent_card: AgentCard) -> Router {
    let state = Arc::new(AppState {
        handler,
        agent_card,
    });

    Router::new()
        .route(AGENT_CARD_WELL_KNOWN_PATH, get(handle_agent_card))
        .route(PREV_AGENT_CARD_WELL_KNOWN_PATH, get(handle_agent_card))
        .route(DEFAULT_RPC_URL, post(handle_jsonrpc))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

/// Bind `addr` and serve `app` until Ctrl-C.
pub async fn serve(addr: SocketAddr, app: Router) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("Shutting down"),
                Err(e) => {
                    error!(error = %e, "Failed to listen for shutdown signal");
                    std::future::pending::<()>().await;
                }
            }
        })
        .await
}

/// Serve the agent card at the well-known endpoints.
async fn handle_agent_card(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.agent_card.clone())
}

fn reply(response: JsonRpcResponse) -> Response {
    Json(response).into_response()
}

/// Main JSON-RPC dispatch handler.
///
/// The body is parsed by hand so malformed input still gets a JSON-RPC
/// error object instead of a bare HTTP rejection.
async fn handle_jsonrpc(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let raw: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            return reply(JsonRpcResponse::from_a2a_error(
                None,
                A2AError::parse_error(e.to_string()),
            ))
        }
    };

    let id = raw
        .get("id")
        .and_then(|id| serde_json::from_value::<JsonRpcId>(id.clone()).ok());

    let request: JsonRpcRequest = match serde_json::from_value(raw) {
        Ok(r) => r,
        Err(e) => {
            return reply(JsonRpcResponse::from_a2a_error(
                id,
                A2AError::invalid_request(e.to_string()),
            ))
        }
    };

    if request.jsonrpc != JSONRPC_VERSION {
        return reply(JsonRpcResponse::from_a2a_error(
            request.id,
            A2AError::invalid_request("jsonrpc must be \"2.0\""),
        ));
    }

    debug!(method = %request.method, "JSON-RPC request received");

    let params = request.params.unwrap_or(Value::Null);
    let handler = &state.handler;
    let result = match request.method.as_str() {
        "message/send" => handle_message_send(handler.as_ref(), params).await,
        "message/stream" => handler.on_message_send_stream(params).await,
        "tasks/get" => handler.on_get_task(params).await,
        "tasks/cancel" => handler.on_cancel_task(params).await,
        "tasks/resubscribe" => handler.on_resubscribe_to_task(params).await,
        "tasks/pushNotificationConfig/set" => {
            handler.on_set_task_push_notification_config(params).await
        }
        "tasks/pushNotificationConfig/get" => {
            handler.on_get_task_push_notification_config(params).await
        }
        method => {
            warn!(method = %method, "Unknown JSON-RPC method");
            Err(A2AError::method_not_found(method))
        }
    };

    match result {
        Ok(value) => reply(JsonRpcResponse::success(request.id, value)),
        Err(e) => reply(JsonRpcResponse::from_a2a_error(request.id, e)),
    }
}

/// Parse `SendMessageParams` from JSON-RPC params.
fn parse_send_message_params(params: Value) -> Result<SendMessageParams, String> {
    let obj = params.as_object().ok_or("params must be an object")?;
    if !obj.contains_key("message") {
        return Err("missing 'message' field".to_string());
    }
    serde_json::from_value(params).map_err(|e| format!("invalid message: {}", e))
}

/// Handle `message/send`.
async fn handle_message_send(
    handler: &dyn RequestHandler,
    params: Value,
) -> Result<Value, A2AError> {
    let params = parse_send_message_params(params).map_err(A2AError::invalid_params)?;
    let message = handler.on_message_send(params).await?;
    serde_json::to_value(&message).map_err(|e| {
        error!(error = %e, "Failed to serialize response");
        A2AError::internal_error(e.to_string())
    })
}
