//! Shared test utilities for integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use a2a_router::backends::{Backend, Place, PlaceExtractor, PlaceQuery, PlacesApi};
use a2a_router::error::{A2AError, A2AResult};
use a2a_router::server::{a2a_router, RequestHandler};
use a2a_router::session::Session;
use a2a_router::types::AgentCard;
use async_trait::async_trait;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;

/// A backend that always answers with the same text.
pub struct StaticBackend(pub &'static str);

#[async_trait]
impl Backend for StaticBackend {
    fn name(&self) -> &str {
        "static"
    }

    async fn answer(&self, _query: &str) -> A2AResult<String> {
        Ok(self.0.to_string())
    }
}

/// A backend that echoes the query back.
pub struct EchoBackend;

#[async_trait]
impl Backend for EchoBackend {
    fn name(&self) -> &str {
        "echo"
    }

    async fn answer(&self, query: &str) -> A2AResult<String> {
        Ok(format!("Echo: {}", query))
    }
}

/// A backend that always fails.
pub struct FailingBackend;

#[async_trait]
impl Backend for FailingBackend {
    fn name(&self) -> &str {
        "failing"
    }

    async fn answer(&self, _query: &str) -> A2AResult<String> {
        Err(A2AError::internal_error("backend intentionally failed"))
    }
}

/// Extractor that returns a fixed query regardless of the prompt.
pub struct FixedExtractor(pub Option<PlaceQuery>);

impl PlaceExtractor for FixedExtractor {
    fn extract(&self, _session: &Session, _prompt: &str) -> A2AResult<Option<PlaceQuery>> {
        Ok(self.0.clone())
    }
}

/// Places API returning `count` numbered places around a fixed point.
pub struct CountingPlaces {
    pub count: usize,
}

#[async_trait]
impl PlacesApi for CountingPlaces {
    async fn geocode(&self, _location: &str) -> A2AResult<(f64, f64)> {
        Ok((43.2365, 76.9305))
    }

    async fn nearby(
        &self,
        _lat: f64,
        _lng: f64,
        _keyword: &str,
        _radius: u32,
    ) -> A2AResult<Vec<Place>> {
        Ok((1..=self.count)
            .map(|i| Place {
                name: format!("Cafe {}", i),
                vicinity: format!("Satpaev St {}", i),
                rating: if i % 2 == 0 {
                    None
                } else {
                    serde_json::Number::from_f64(4.5)
                },
            })
            .collect())
    }
}

pub fn cafes_query() -> PlaceQuery {
    PlaceQuery {
        place_type: "cafes".to_string(),
        location: "Satpaev University, Almaty".to_string(),
        radius: 800,
    }
}

/// Build a default agent card for testing.
pub fn test_agent_card(url: &str) -> AgentCard {
    a2a_router::cards::answer_question_card(url)
}

/// Start a Message-Send service on a random port. Returns the base URL and
/// the server task handle.
pub async fn start_test_server(
    handler: Arc<dyn RequestHandler>,
) -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let app = a2a_router(handler, test_agent_card(&format!("{}/", base_url)));
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // Brief wait for the server to start accepting connections.
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    (base_url, handle)
}

/// Start a backend that answers every POST to `/` with the same raw body.
pub async fn start_raw_backend(body: Value) -> (String, tokio::task::JoinHandle<()>) {
    start_raw_backend_with_status(StatusCode::OK, body).await
}

/// Like [`start_raw_backend`], but with a fixed HTTP status.
pub async fn start_raw_backend_with_status(
    status: StatusCode,
    body: Value,
) -> (String, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);

    let app = Router::new().route(
        "/",
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    );
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    (base_url, handle)
}

/// A base URL nothing is listening on.
pub async fn unused_base_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// Helper to build a JSON-RPC request body.
pub fn jsonrpc_request(id: Value, method: &str, params: Value) -> Value {
    serde_json::json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
}

/// Helper to build a message/send request body.
pub fn message_send_request(id: i64, text: &str) -> Value {
    jsonrpc_request(
        serde_json::json!(id),
        "message/send",
        serde_json::json!({
            "message": {
                "messageId": format!("test-msg-{}", id),
                "role": "user",
                "parts": [{"kind": "text", "text": text}]
            },
            "configuration": {"acceptedOutputModes": ["text/plain"]}
        }),
    )
}

/// POST a JSON-RPC body to `<base>/` and return the decoded response.
pub async fn post_rpc(base_url: &str, body: &Value) -> Value {
    reqwest::Client::new()
        .post(format!("{}/", base_url))
        .json(body)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}
