//! Place search: prompt → structured query → geocode → nearby places.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use tracing::{info, warn};

use crate::error::A2AResult;
use crate::session::{RetryPolicy, Session, SessionEstablisher, SessionStore};

use super::{run_blocking, Backend};

/// How many places make it into an answer.
const MAX_LISTED: usize = 5;

/// The session the extractor runs in.
pub const MAP_SESSION: (&str, &str, &str) = ("onaitabu_map", "user_map", "map_session_1");

/// What the extractor pulls out of a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceQuery {
    pub place_type: String,
    /// Full address of the search center.
    pub location: String,
    /// Search radius in meters.
    pub radius: u32,
}

impl PlaceQuery {
    /// All three fields are needed to search.
    pub fn is_complete(&self) -> bool {
        !self.place_type.trim().is_empty() && !self.location.trim().is_empty() && self.radius > 0
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    #[serde(default)]
    pub name: String,
    /// Short address.
    #[serde(default)]
    pub vicinity: String,
    /// Kept as the number the API sent, so `4` stays `4` and `4.5` stays `4.5`.
    #[serde(default)]
    pub rating: Option<Number>,
}

/// Blocking LLM call that turns a free-form prompt into a [`PlaceQuery`].
///
/// `Ok(None)` means the model gave nothing usable.
pub trait PlaceExtractor: Send + Sync {
    fn extract(&self, session: &Session, prompt: &str) -> A2AResult<Option<PlaceQuery>>;
}

/// Geocoding and nearby search.
#[async_trait]
pub trait PlacesApi: Send + Sync {
    /// Resolve an address to `(lat, lng)`.
    async fn geocode(&self, location: &str) -> A2AResult<(f64, f64)>;

    /// Places around a point, ranked by prominence.
    async fn nearby(&self, lat: f64, lng: f64, keyword: &str, radius: u32)
        -> A2AResult<Vec<Place>>;
}

/// Backend answering "find me X near Y" prompts.
pub struct PlaceSearch {
    extractor: Arc<dyn PlaceExtractor>,
    places: Arc<dyn PlacesApi>,
    sessions: Arc<dyn SessionStore>,
    establisher: SessionEstablisher,
}

impl PlaceSearch {
    pub fn new(
        extractor: Arc<dyn PlaceExtractor>,
        places: Arc<dyn PlacesApi>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            extractor,
            places,
            sessions,
            establisher: SessionEstablisher::default(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.establisher = SessionEstablisher::new(policy);
        self
    }
}

#[async_trait]
impl Backend for PlaceSearch {
    fn name(&self) -> &str {
        "map"
    }

    async fn answer(&self, query: &str) -> A2AResult<String> {
        let (app_name, user_id, session_id) = MAP_SESSION;
        let key = Session::new(app_name, user_id, session_id);
        self.sessions.create_session(&key).await?;
        let Some(session) = self.establisher.establish(self.sessions.as_ref(), &key).await else {
            return Ok("Could not establish a session, please try again.".to_string());
        };

        let extractor = Arc::clone(&self.extractor);
        let prompt = query.to_owned();
        let extracted = run_blocking(move || extractor.extract(&session, &prompt)).await?;
        let place_query = match extracted {
            Some(q) if q.is_complete() => q,
            other => {
                warn!(extracted = ?other, "Incomplete place query");
                return Ok(
                    "Could not extract place type, location, or radius from the prompt."
                        .to_string(),
                );
            }
        };

        let (lat, lng) = self.places.geocode(&place_query.location).await?;
        let places = self
            .places
            .nearby(lat, lng, &place_query.place_type, place_query.radius)
            .await?;
        info!(
            place_type = %place_query.place_type,
            found = places.len(),
            "Nearby search finished"
        );
        Ok(format_places(&place_query, &places))
    }
}

/// Render search hits as the answer text.
///
/// At most five numbered lines under a header; an explicit message when
/// nothing was found.
pub fn format_places(query: &PlaceQuery, places: &[Place]) -> String {
    if places.is_empty() {
        return format!(
            "No places found for '{}' near '{}'.",
            query.place_type, query.location
        );
    }
    let mut out = format!(
        "Top {} near {} (radius: {}m):",
        title_case(&query.place_type),
        query.location,
        query.radius
    );
    for (i, place) in places.iter().take(MAX_LISTED).enumerate() {
        let rating = place
            .rating
            .as_ref()
            .map(|r| r.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        out.push_str(&format!(
            "\n{}. {} (Rating: {}) - {}",
            i + 1,
            place.name,
            rating,
            place.vicinity
        ));
    }
    out
}

/// Upper-case the first letter of every word, lower-case the rest.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
