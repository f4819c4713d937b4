//! Google Maps geocoding and nearby search.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::backends::{Place, PlacesApi};
use crate::error::{A2AError, A2AResult};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api";

/// [`PlacesApi`] over the Geocoding and Places (nearby search) web services.
#[derive(Clone)]
pub struct GoogleMapsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GoogleMapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMapsClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GoogleMapsClient {
    pub fn new(api_key: impl Into<String>) -> A2AResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| A2AError::Transport(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at another host serving the same `/geocode` and
    /// `/place` paths.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn get(&self, path: &str, query: &[(&str, String)]) -> A2AResult<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Calling Google Maps");
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| A2AError::Transport(format!("HTTP request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(A2AError::Http {
                status: status.as_u16(),
                body,
            });
        }
        response
            .json()
            .await
            .map_err(|e| A2AError::InvalidJson(format!("failed to parse Maps response: {e}")))
    }
}

#[async_trait]
impl PlacesApi for GoogleMapsClient {
    async fn geocode(&self, location: &str) -> A2AResult<(f64, f64)> {
        let body = self
            .get("/geocode/json", &[("address", location.to_string())])
            .await?;
        decode_geocode(&body, location)
    }

    async fn nearby(
        &self,
        lat: f64,
        lng: f64,
        keyword: &str,
        radius: u32,
    ) -> A2AResult<Vec<Place>> {
        let body = self
            .get(
                "/place/nearbysearch/json",
                &[
                    ("location", format!("{},{}", lat, lng)),
                    ("radius", radius.to_string()),
                    ("keyword", keyword.to_string()),
                    ("rankby", "prominence".to_string()),
                ],
            )
            .await?;
        decode_nearby(&body)
    }
}

fn status(body: &Value) -> &str {
    body["status"].as_str().unwrap_or("UNKNOWN")
}

fn decode_geocode(body: &Value, location: &str) -> A2AResult<(f64, f64)> {
    let point = &body["results"][0]["geometry"]["location"];
    match (status(body), point["lat"].as_f64(), point["lng"].as_f64()) {
        ("OK", Some(lat), Some(lng)) => Ok((lat, lng)),
        _ => Err(A2AError::Other(format!(
            "Could not geocode location: {}",
            location
        ))),
    }
}

/// `ZERO_RESULTS` is an empty list; any other non-`OK` status is an error.
fn decode_nearby(body: &Value) -> A2AResult<Vec<Place>> {
    match status(body) {
        "OK" => serde_json::from_value(body["results"].clone()).map_err(|e| {
            A2AError::InvalidJson(format!("unexpected nearby search result: {e}"))
        }),
        "ZERO_RESULTS" => Ok(Vec::new()),
        other => Err(A2AError::Other(format!("Places API error: {}", other))),
    }
}
