//! Dispatcher/Router
//!
//! Classifies a query, sends it to the backend registered for the label and
//! turns whatever comes back into answer text. Dispatch never fails: a
//! backend that errors, cannot be reached or replies with garbage produces a
//! human-readable diagnostic instead.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, warn};

use crate::classifier::{KeywordClassifier, Label};
use crate::client::{build_request, BackendReply, JsonRpcTransport, Transport, TransportConfig};
use crate::config::RouterConfig;
use crate::error::{A2AError, A2AResult};
use crate::normalize::{display_value, extract_text};
use crate::server::{query_text, RequestHandler};
use crate::types::{Message, SendMessageParams};
use crate::utils::{new_agent_text_message, new_user_text_message, DEFAULT_RPC_URL};

/// Label → backend base URL.
///
/// Every label must be mapped; a gap is a configuration error caught at
/// start-up, never a routing failure at request time.
#[derive(Debug, Clone, PartialEq)]
pub struct BackendRegistry {
    bases: HashMap<Label, String>,
}

impl BackendRegistry {
    pub fn new<I, S>(entries: I) -> A2AResult<Self>
    where
        I: IntoIterator<Item = (Label, S)>,
        S: Into<String>,
    {
        let mut bases = HashMap::new();
        for (label, base) in entries {
            let base: String = base.into();
            if !(base.starts_with("http://") || base.starts_with("https://")) {
                return Err(A2AError::Config(format!(
                    "backend URL for '{}' must be http(s), got {:?}",
                    label, base
                )));
            }
            bases.insert(label, base.trim_end_matches('/').to_string());
        }
        if let Some(missing) = Label::ALL.iter().find(|l| !bases.contains_key(*l)) {
            return Err(A2AError::Config(format!(
                "no backend URL registered for '{}'",
                missing
            )));
        }
        Ok(Self { bases })
    }

    pub fn from_config(config: &RouterConfig) -> A2AResult<Self> {
        Self::new([
            (Label::Map, config.map_url.as_str()),
            (Label::Qa, config.answer_question_url.as_str()),
        ])
    }

    pub fn base_url(&self, label: Label) -> Option<&str> {
        self.bases.get(&label).map(String::as_str)
    }

    /// The JSON-RPC endpoint for a label: `<base>/`.
    pub fn endpoint(&self, label: Label) -> Option<String> {
        self.base_url(label)
            .map(|base| format!("{}{}", base, DEFAULT_RPC_URL))
    }
}

/// Routes queries to backends.
pub struct Dispatcher {
    classifier: KeywordClassifier,
    transports: HashMap<Label, Arc<dyn Transport>>,
    next_id: AtomicI64,
}

impl Dispatcher {
    /// Create a dispatcher with one transport per label and the default
    /// keyword rules.
    pub fn new(transports: HashMap<Label, Arc<dyn Transport>>) -> A2AResult<Self> {
        if let Some(missing) = Label::ALL.iter().find(|l| !transports.contains_key(*l)) {
            return Err(A2AError::Config(format!(
                "no backend transport for '{}'",
                missing
            )));
        }
        Ok(Self {
            classifier: KeywordClassifier::default(),
            transports,
            next_id: AtomicI64::new(1),
        })
    }

    /// Create a dispatcher that reaches every backend over HTTP.
    pub fn over_http(registry: &BackendRegistry, config: TransportConfig) -> A2AResult<Self> {
        let mut transports: HashMap<Label, Arc<dyn Transport>> = HashMap::new();
        for label in Label::ALL {
            if let Some(endpoint) = registry.endpoint(label) {
                transports.insert(
                    label,
                    Arc::new(JsonRpcTransport::with_config(endpoint, config.clone())),
                );
            }
        }
        Self::new(transports)
    }

    pub fn with_classifier(mut self, classifier: KeywordClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn classify(&self, query: &str) -> Label {
        self.classifier.classify(query)
    }

    /// Answer a query. Always returns text.
    pub async fn route(&self, query: &str) -> String {
        let label = self.classify(query);
        info!(label = %label, "Routing query");
        self.dispatch(label, query).await
    }

    /// Send a query to the backend for `label`, skipping classification.
    pub async fn dispatch(&self, label: Label, query: &str) -> String {
        let Some(transport) = self.transports.get(&label) else {
            // Unreachable for dispatchers built through `new`.
            return format!("Backend agent unavailable: no backend for '{}'", label);
        };

        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let reply = match build_request(id, new_user_text_message(query)) {
            Ok(request) => transport.send(&request).await,
            Err(e) => Err(e),
        };

        let answer = match reply {
            Ok(BackendReply::Result(payload)) => {
                extract_text(&payload).map_err(|e| parse_failure(&e))
            }
            Ok(BackendReply::Error(error)) => Err(format!(
                "Backend agent error: {}",
                error_message(&error)
            )),
            Err(e) if e.is_malformed_reply() => Err(parse_failure(&e)),
            Err(e) => Err(format!("Backend agent unavailable: {}", e)),
        };

        answer.unwrap_or_else(|diagnostic| {
            warn!(label = %label, diagnostic = %diagnostic, "Backend call recovered");
            diagnostic
        })
    }
}

fn parse_failure(e: &A2AError) -> String {
    format!("Failed to parse backend agent response: {}", e)
}

/// The `message` of a JSON-RPC error object, or the whole error as text.
/// Strings are shown without JSON quotes.
fn error_message(error: &Value) -> String {
    display_value(error.get("message").unwrap_or(error))
}

/// The router's own Message-Send endpoint.
pub struct RouterHandler {
    dispatcher: Arc<Dispatcher>,
}

impl RouterHandler {
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self { dispatcher }
    }
}

#[async_trait]
impl RequestHandler for RouterHandler {
    async fn on_message_send(&self, params: SendMessageParams) -> A2AResult<Message> {
        let query = query_text(&params)?;
        let answer = self.dispatcher.route(query).await;
        Ok(new_agent_text_message(answer))
    }
}
