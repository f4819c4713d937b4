//! OpenAI-backed collaborators for the two backends.
//!
//! Both run on the blocking pool (see [`run_blocking`](crate::backends)), so
//! they use `reqwest::blocking`. The client is built per call so it is
//! created and dropped on the worker thread, never inside the async runtime.

use std::time::Duration;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::backends::{DocumentAgent, DocumentAnswer, PlaceExtractor, PlaceQuery};
use crate::config::OpenAiSettings;
use crate::error::{A2AError, A2AResult};
use crate::session::Session;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const DOCUMENT_INSTRUCTIONS: &str = "You are an assistant for a mobile application. \
If the question is about the application, use the file_search tool to look it up in the \
project document. Otherwise answer as a general-purpose model. Always state the source of \
the answer: \"pdf\" or \"llm\".";

const EXTRACTOR_INSTRUCTIONS: &str = "You extract structured information from user queries \
about places. Given a prompt like 'best cafes near Satpaev University', extract the place \
type (with full information, including specifics about the place), the location formatted \
as a full address, and a search radius in meters. Reply with a JSON object with the keys \
\"place_type\", \"location\" and \"radius\".";

fn blocking_client() -> A2AResult<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()
        .map_err(|e| A2AError::Transport(format!("failed to build HTTP client: {e}")))
}

/// POST a JSON body and return the JSON reply, mapping API errors.
fn post_json(settings: &OpenAiSettings, path: &str, body: &Value) -> A2AResult<Value> {
    let url = format!("{}{}", settings.base_url, path);
    debug!(url = %url, model = %settings.model, "Calling OpenAI");
    let response = blocking_client()?
        .post(&url)
        .bearer_auth(&settings.api_key)
        .json(body)
        .send()
        .map_err(|e| {
            if e.is_timeout() {
                A2AError::Timeout(format!("request timed out: {e}"))
            } else {
                A2AError::Transport(format!("HTTP request failed: {e}"))
            }
        })?;

    let status = response.status();
    let text = response
        .text()
        .map_err(|e| A2AError::Transport(format!("failed to read response body: {e}")))?;
    if !status.is_success() {
        return Err(A2AError::Http {
            status: status.as_u16(),
            body: api_error_message(&text),
        });
    }
    serde_json::from_str(&text)
        .map_err(|e| A2AError::InvalidJson(format!("failed to parse OpenAI response: {e}")))
}

/// The `error.message` of an API error body, or the body itself.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

/// Document agent over the Responses API with `file_search` on an existing
/// vector store.
#[derive(Debug, Clone)]
pub struct OpenAiDocumentAgent {
    settings: OpenAiSettings,
    vector_store_id: String,
}

impl OpenAiDocumentAgent {
    pub fn new(settings: OpenAiSettings, vector_store_id: impl Into<String>) -> Self {
        Self {
            settings,
            vector_store_id: vector_store_id.into(),
        }
    }

    fn request_body(&self, query: &str) -> Value {
        json!({
            "model": self.settings.model,
            "instructions": DOCUMENT_INSTRUCTIONS,
            "input": query,
            "tools": [{
                "type": "file_search",
                "vector_store_ids": [self.vector_store_id],
            }],
            "text": {
                "format": {
                    "type": "json_schema",
                    "name": "document_answer",
                    "strict": true,
                    "schema": {
                        "type": "object",
                        "properties": {
                            "answer": {"type": "string"},
                            "source": {"type": "string", "enum": ["pdf", "llm"]},
                        },
                        "required": ["answer", "source"],
                        "additionalProperties": false,
                    },
                },
            },
        })
    }
}

impl DocumentAgent for OpenAiDocumentAgent {
    fn run_sync(&self, query: &str) -> A2AResult<DocumentAnswer> {
        let response = post_json(&self.settings, "/responses", &self.request_body(query))?;
        decode_document_answer(&response)
    }
}

/// Concatenated `output_text` of every message item in a Responses API reply.
fn responses_output_text(response: &Value) -> String {
    response["output"]
        .as_array()
        .into_iter()
        .flatten()
        .filter(|item| item["type"] == "message")
        .flat_map(|item| item["content"].as_array().into_iter().flatten())
        .filter(|content| content["type"] == "output_text")
        .filter_map(|content| content["text"].as_str())
        .collect()
}

fn decode_document_answer(response: &Value) -> A2AResult<DocumentAnswer> {
    let text = responses_output_text(response);
    if text.trim().is_empty() {
        return Err(A2AError::invalid_agent_response(
            "model returned no output text",
        ));
    }
    serde_json::from_str(&text).map_err(|e| {
        A2AError::invalid_agent_response(format!("model output is not a document answer: {e}"))
    })
}

/// Place extractor over chat completions in JSON mode.
#[derive(Debug, Clone)]
pub struct OpenAiPlaceExtractor {
    settings: OpenAiSettings,
}

impl OpenAiPlaceExtractor {
    pub fn new(settings: OpenAiSettings) -> Self {
        Self { settings }
    }

    fn request_body(&self, session: &Session, prompt: &str) -> Value {
        json!({
            "model": self.settings.model,
            "user": session.user_id,
            "response_format": {"type": "json_object"},
            "messages": [
                {"role": "system", "content": EXTRACTOR_INSTRUCTIONS},
                {"role": "user", "content": prompt},
            ],
        })
    }
}

impl PlaceExtractor for OpenAiPlaceExtractor {
    fn extract(&self, session: &Session, prompt: &str) -> A2AResult<Option<PlaceQuery>> {
        let body = self.request_body(session, prompt);
        let response = post_json(&self.settings, "/chat/completions", &body)?;
        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or_default()
            .trim();
        if content.is_empty() {
            warn!("Extractor returned an empty response");
            return Ok(None);
        }
        let parsed = parse_place_query(content);
        if parsed.is_none() {
            warn!(raw = %content, "Could not parse extractor output");
        }
        Ok(parsed)
    }
}

/// Parse the extractor's JSON, accepting a radius sent as number or string.
fn parse_place_query(content: &str) -> Option<PlaceQuery> {
    let value: Value = serde_json::from_str(content).ok()?;
    let radius = match &value["radius"] {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|r| *r >= 0.0).map(|r| r.round() as u64))?,
        Value::String(s) => s.trim().trim_end_matches('m').trim().parse().ok()?,
        _ => return None,
    };
    Some(PlaceQuery {
        place_type: value["place_type"].as_str()?.to_string(),
        location: value["location"].as_str()?.to_string(),
        radius: u32::try_from(radius).ok()?,
    })
}
