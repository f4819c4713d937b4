//! End-to-end routing: reqwest client → router service → backend services.
//!
//! Every service runs on its own random local port; backends are real
//! `BackendHandler` endpoints over fake collaborators, or raw axum routes
//! when a malformed reply is needed.

mod common;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use a2a_router::backends::{Backend, PlaceSearch};
use a2a_router::classifier::Label;
use a2a_router::client::{LocalTransport, Transport, TransportConfig};
use a2a_router::dispatch::{BackendRegistry, Dispatcher, RouterHandler};
use a2a_router::server::{BackendHandler, RequestHandler};
use a2a_router::session::{InMemorySessionStore, RetryPolicy};
use axum::http::StatusCode;
use common::{
    cafes_query, message_send_request, post_rpc, start_raw_backend,
    start_raw_backend_with_status, start_test_server, unused_base_url, CountingPlaces, EchoBackend, FailingBackend, FixedExtractor, StaticBackend,
};
use serde_json::json;

fn backend_handler(backend: impl Backend + 'static) -> Arc<dyn RequestHandler> {
    Arc::new(BackendHandler::new(Arc::new(backend)))
}

fn place_search(count: usize) -> PlaceSearch {
    PlaceSearch::new(
        Arc::new(FixedExtractor(Some(cafes_query()))),
        Arc::new(CountingPlaces { count }),
        Arc::new(InMemorySessionStore::new()),
    )
    .with_retry_policy(RetryPolicy {
        max_retries: 3,
        delay: Duration::from_millis(5),
    })
}

/// Start a router whose backends live at `qa_base` and `map_base`.
async fn start_router(qa_base: &str, map_base: &str) -> (String, tokio::task::JoinHandle<()>) {
    let registry =
        BackendRegistry::new([(Label::Qa, qa_base), (Label::Map, map_base)]).unwrap();
    let config = TransportConfig {
        timeout: Duration::from_secs(5),
        ..TransportConfig::default()
    };
    let dispatcher = Dispatcher::over_http(&registry, config).unwrap();
    start_test_server(Arc::new(RouterHandler::new(Arc::new(dispatcher)))).await
}

async fn ask(router_base: &str, query: &str) -> String {
    let json = post_rpc(router_base, &message_send_request(1, query)).await;
    assert!(json.get("error").is_none(), "unexpected error: {}", json);
    assert_eq!(json["result"]["role"], "agent");
    json["result"]["parts"][0]["text"]
        .as_str()
        .unwrap()
        .to_string()
}

// ===========================================================================
// Routing
// ===========================================================================

/// A query without map keywords goes to the document Q&A backend.
#[tokio::test]
async fn query_without_map_keywords_reaches_qa_backend() {
    let (qa, _h1) = start_test_server(backend_handler(StaticBackend("from qa"))).await;
    let (map, _h2) = start_test_server(backend_handler(StaticBackend("from map"))).await;
    let (router, _h3) = start_router(&qa, &map).await;

    assert_eq!(ask(&router, "best cafes near Satpaev University").await, "from qa");
}

/// A Cyrillic map keyword sends the query to the place-search backend.
#[tokio::test]
async fn cyrillic_map_keyword_reaches_map_backend() {
    let (qa, _h1) = start_test_server(backend_handler(StaticBackend("from qa"))).await;
    let (map, _h2) = start_test_server(backend_handler(StaticBackend("from map"))).await;
    let (router, _h3) = start_router(&qa, &map).await;

    assert_eq!(ask(&router, "где находится кофейня").await, "from map");
}

/// Keyword matching ignores case.
#[tokio::test]
async fn uppercase_map_keyword_reaches_map_backend() {
    let (qa, _h1) = start_test_server(backend_handler(StaticBackend("from qa"))).await;
    let (map, _h2) = start_test_server(backend_handler(StaticBackend("from map"))).await;
    let (router, _h3) = start_router(&qa, &map).await;

    assert_eq!(ask(&router, "What is the ADDRESS of the museum?").await, "from map");
}

/// The backend sees the original query text.
#[tokio::test]
async fn backend_receives_query_verbatim() {
    let (qa, _h1) = start_test_server(backend_handler(EchoBackend)).await;
    let (map, _h2) = start_test_server(backend_handler(EchoBackend)).await;
    let (router, _h3) = start_router(&qa, &map).await;

    assert_eq!(
        ask(&router, "What does the app do?").await,
        "Echo: What does the app do?"
    );
}

// ===========================================================================
// Place search through the router
// ===========================================================================

/// More than five hits are cut to five numbered lines under a header.
#[tokio::test]
async fn place_search_lists_at_most_five_places() {
    let (qa, _h1) = start_test_server(backend_handler(StaticBackend("from qa"))).await;
    let (map, _h2) = start_test_server(backend_handler(place_search(7))).await;
    let (router, _h3) = start_router(&qa, &map).await;

    let answer = ask(&router, "найти на карте кофейни").await;
    let lines: Vec<&str> = answer.lines().collect();
    assert_eq!(lines.len(), 6, "got: {}", answer);
    assert_eq!(
        lines[0],
        "Top Cafes near Satpaev University, Almaty (radius: 800m):"
    );
    assert_eq!(lines[1], "1. Cafe 1 (Rating: 4.5) - Satpaev St 1");
    assert_eq!(lines[2], "2. Cafe 2 (Rating: N/A) - Satpaev St 2");
    assert!(lines[5].starts_with("5. Cafe 5"));
}

/// Fewer hits produce one line each.
#[tokio::test]
async fn place_search_lists_every_place_when_fewer_than_five() {
    let (qa, _h1) = start_test_server(backend_handler(StaticBackend("from qa"))).await;
    let (map, _h2) = start_test_server(backend_handler(place_search(2))).await;
    let (router, _h3) = start_router(&qa, &map).await;

    let answer = ask(&router, "find the location of cafes").await;
    assert_eq!(answer.lines().count(), 3, "got: {}", answer);
}

/// No hits give the explicit "No places found" message.
#[tokio::test]
async fn place_search_reports_empty_results() {
    let (qa, _h1) = start_test_server(backend_handler(StaticBackend("from qa"))).await;
    let (map, _h2) = start_test_server(backend_handler(place_search(0))).await;
    let (router, _h3) = start_router(&qa, &map).await;

    assert_eq!(
        ask(&router, "place with cafes").await,
        "No places found for 'cafes' near 'Satpaev University, Almaty'."
    );
}

/// An unusable extraction is answered, not failed.
#[tokio::test]
async fn place_search_reports_failed_extraction() {
    let backend = PlaceSearch::new(
        Arc::new(FixedExtractor(None)),
        Arc::new(CountingPlaces { count: 3 }),
        Arc::new(InMemorySessionStore::new()),
    );
    let (qa, _h1) = start_test_server(backend_handler(StaticBackend("from qa"))).await;
    let (map, _h2) = start_test_server(backend_handler(backend)).await;
    let (router, _h3) = start_router(&qa, &map).await;

    assert_eq!(
        ask(&router, "карта").await,
        "Could not extract place type, location, or radius from the prompt."
    );
}

// ===========================================================================
// Failure diagnostics
// ===========================================================================

/// A JSON-RPC error object surfaces its message in the answer.
#[tokio::test]
async fn backend_error_message_is_shown() {
    let (qa, _h1) = start_raw_backend(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "error": {"code": -32000, "message": "X"}
    }))
    .await;
    let (map, _h2) = start_test_server(backend_handler(StaticBackend("from map"))).await;
    let (router, _h3) = start_router(&qa, &map).await;

    assert_eq!(ask(&router, "hello").await, "Backend agent error: X");
}

/// A failing backend service is reported through its error object.
#[tokio::test]
async fn failing_backend_is_reported() {
    let (qa, _h1) = start_test_server(backend_handler(FailingBackend)).await;
    let (map, _h2) = start_test_server(backend_handler(StaticBackend("from map"))).await;
    let (router, _h3) = start_router(&qa, &map).await;

    let answer = ask(&router, "hello").await;
    assert!(answer.starts_with("Backend agent error: "), "got: {}", answer);
    assert!(answer.contains("backend intentionally failed"));
}

/// An unreachable backend yields a diagnostic instead of a protocol error.
#[tokio::test]
async fn unreachable_backend_yields_diagnostic() {
    let qa = unused_base_url().await;
    let (map, _h2) = start_test_server(backend_handler(StaticBackend("from map"))).await;
    let (router, _h3) = start_router(&qa, &map).await;

    let answer = ask(&router, "hello").await;
    assert!(
        answer.starts_with("Backend agent unavailable: "),
        "got: {}",
        answer
    );
}

/// A non-2xx answer from a backend is reported as unavailable, not parsed.
#[tokio::test]
async fn non_success_status_yields_unavailable() {
    let (qa, _h1) = start_raw_backend_with_status(
        StatusCode::BAD_GATEWAY,
        json!({"jsonrpc": "2.0", "id": 1, "result": {"parts": [{"kind": "text", "text": "ok"}]}}),
    )
    .await;
    let (map, _h2) = start_test_server(backend_handler(StaticBackend("from map"))).await;
    let (router, _h3) = start_router(&qa, &map).await;

    let answer = ask(&router, "hello").await;
    assert!(
        answer.starts_with("Backend agent unavailable: HTTP 502"),
        "got: {}",
        answer
    );
}

/// A result without parts is a parse failure.
#[tokio::test]
async fn result_without_parts_is_a_parse_failure() {
    let (qa, _h1) = start_raw_backend(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": {"role": "agent"}
    }))
    .await;
    let (map, _h2) = start_test_server(backend_handler(StaticBackend("from map"))).await;
    let (router, _h3) = start_router(&qa, &map).await;

    let answer = ask(&router, "hello").await;
    assert!(
        answer.starts_with("Failed to parse backend agent response: "),
        "got: {}",
        answer
    );
}

/// The nested `{root: {text}}` part shape is understood.
#[tokio::test]
async fn nested_part_shape_is_normalized() {
    let (qa, _h1) = start_raw_backend(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": {"parts": [{"root": {"kind": "text", "text": "nested answer"}}]}
    }))
    .await;
    let (map, _h2) = start_test_server(backend_handler(StaticBackend("from map"))).await;
    let (router, _h3) = start_router(&qa, &map).await;

    assert_eq!(ask(&router, "hello").await, "nested answer");
}

// ===========================================================================
// In-process transports
// ===========================================================================

/// The dispatcher works the same over in-process transports.
#[tokio::test]
async fn dispatcher_over_local_transports() {
    let mut transports: HashMap<Label, Arc<dyn Transport>> = HashMap::new();
    transports.insert(
        Label::Qa,
        Arc::new(LocalTransport::new(backend_handler(StaticBackend("local qa")))),
    );
    transports.insert(
        Label::Map,
        Arc::new(LocalTransport::new(backend_handler(place_search(1)))),
    );
    let dispatcher = Dispatcher::new(transports).unwrap();

    assert_eq!(dispatcher.route("tell me about the project").await, "local qa");
    assert_eq!(
        dispatcher.route("координаты кофейни").await,
        "Top Cafes near Satpaev University, Almaty (radius: 800m):\n\
         1. Cafe 1 (Rating: 4.5) - Satpaev St 1"
    );
}

/// A failing in-process backend still produces a diagnostic.
#[tokio::test]
async fn local_failing_backend_yields_diagnostic() {
    let mut transports: HashMap<Label, Arc<dyn Transport>> = HashMap::new();
    transports.insert(
        Label::Qa,
        Arc::new(LocalTransport::new(backend_handler(FailingBackend))),
    );
    transports.insert(
        Label::Map,
        Arc::new(LocalTransport::new(backend_handler(StaticBackend("map")))),
    );
    let dispatcher = Dispatcher::new(transports).unwrap();

    let answer = dispatcher.route("hello").await;
    assert!(answer.starts_with("Backend agent error: "), "got: {}", answer);
}
