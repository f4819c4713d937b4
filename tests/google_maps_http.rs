//! `GoogleMapsClient` against a local stand-in for the Maps web services.

use std::collections::HashMap;

use a2a_router::backends::PlacesApi;
use a2a_router::providers::GoogleMapsClient;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

type Params = Query<HashMap<String, String>>;

async fn geocode(Query(params): Params) -> Json<Value> {
    if params.get("key").map(String::as_str) != Some("test-key") {
        return Json(json!({"status": "REQUEST_DENIED", "results": []}));
    }
    match params.get("address").map(String::as_str) {
        Some("Satbayev University, Almaty") => Json(json!({
            "status": "OK",
            "results": [{"geometry": {"location": {"lat": 43.2365, "lng": 76.9305}}}]
        })),
        _ => Json(json!({"status": "ZERO_RESULTS", "results": []})),
    }
}

async fn nearby(Query(params): Params) -> (StatusCode, Json<Value>) {
    let expected = [
        ("key", "test-key"),
        ("location", "43.2365,76.9305"),
        ("radius", "1000"),
        ("keyword", "cafe"),
        ("rankby", "prominence"),
    ];
    if expected
        .iter()
        .any(|(k, v)| params.get(*k).map(String::as_str) != Some(*v))
    {
        return (StatusCode::BAD_REQUEST, Json(json!({"params": params})));
    }
    (
        StatusCode::OK,
        Json(json!({
            "status": "OK",
            "results": [
                {"name": "Coffee Boom", "vicinity": "Abay Ave 10", "rating": 4.6},
                {"name": "Nedelka", "vicinity": "Satpaev St 22", "rating": 4}
            ]
        })),
    )
}

/// Serve the fake API under `/maps/api` and return a client pointed at it.
async fn start_maps() -> (GoogleMapsClient, tokio::task::JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = Router::new()
        .route("/maps/api/geocode/json", get(geocode))
        .route("/maps/api/place/nearbysearch/json", get(nearby));
    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = GoogleMapsClient::new("test-key")
        .unwrap()
        .with_base_url(format!("http://{}/maps/api", addr));
    (client, handle)
}

#[tokio::test]
async fn geocode_sends_address_and_key() {
    let (maps, _h) = start_maps().await;

    let point = maps.geocode("Satbayev University, Almaty").await.unwrap();
    assert_eq!(point, (43.2365, 76.9305));
}

#[tokio::test]
async fn geocode_miss_names_the_location() {
    let (maps, _h) = start_maps().await;

    let err = maps.geocode("Atlantis").await.unwrap_err();
    assert_eq!(err.to_string(), "Could not geocode location: Atlantis");
}

#[tokio::test]
async fn nearby_sends_search_parameters() {
    let (maps, _h) = start_maps().await;

    let places = maps.nearby(43.2365, 76.9305, "cafe", 1000).await.unwrap();
    let names: Vec<&str> = places.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Coffee Boom", "Nedelka"]);
    assert_eq!(places[1].rating.as_ref().unwrap().to_string(), "4");
}

#[tokio::test]
async fn nearby_http_error_is_reported() {
    let (maps, _h) = start_maps().await;

    let err = maps.nearby(0.0, 0.0, "cafe", 1000).await.unwrap_err();
    assert!(err.to_string().starts_with("HTTP 400"), "got: {}", err);
}
