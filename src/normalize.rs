//! Response normalization.
//!
//! Backends reply with a message-like `result` whose first part can arrive in
//! structurally different shapes depending on the transport that produced it:
//!
//! - a flat JSON mapping, `{"kind": "text", "text": "..."}`
//! - a typed protocol [`Part`], when the reply never left the process
//! - a wrapper with a `root` indirection, `{"root": {"kind": "text", "text": "..."}}`
//!
//! [`PartRepr`] names those shapes explicitly. The decoder runs once, at the
//! transport boundary, and [`extract_text`] resolves the text in a fixed
//! order: mapping, object, nested object, then the string representation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{A2AError, A2AResult};
use crate::types::{Message, Part};

/// A part wrapped in a `root` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootedPart {
    pub root: Part,
}

/// One reply part, tagged by the shape it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum PartRepr {
    /// A plain key-value mapping decoded from JSON.
    Mapping(Map<String, Value>),
    /// A typed part exposing its text directly.
    Object(Part),
    /// A wrapper exposing its text through `root`.
    Nested(RootedPart),
    /// Anything else.
    Other(Value),
}

impl PartRepr {
    /// Decode a wire value.
    ///
    /// Mapping-form is tried first (any object carrying a `text` key), then
    /// nested-object-form (an object whose `root` carries a `text` string).
    /// Remaining objects stay mappings; non-objects become [`PartRepr::Other`].
    pub fn decode(value: Value) -> Self {
        match value {
            Value::Object(map) if map.contains_key("text") => PartRepr::Mapping(map),
            Value::Object(map) => match rooted_text(&map) {
                Some(text) => PartRepr::Nested(RootedPart {
                    root: Part::text(text),
                }),
                None => PartRepr::Mapping(map),
            },
            other => PartRepr::Other(other),
        }
    }

    /// Resolve the text of this part. Never fails.
    pub fn text(&self) -> String {
        match self {
            PartRepr::Mapping(map) => match map.get("text") {
                Some(text) => display_value(text),
                None => Value::Object(map.clone()).to_string(),
            },
            PartRepr::Object(part) => part.as_text().to_string(),
            PartRepr::Nested(rooted) => rooted.root.as_text().to_string(),
            PartRepr::Other(value) => display_value(value),
        }
    }
}

fn rooted_text(map: &Map<String, Value>) -> Option<&str> {
    map.get("root")?.get("text")?.as_str()
}

pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The decoded `result` of a backend reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplyPayload {
    parts: Vec<PartRepr>,
}

impl ReplyPayload {
    /// Decode the `result` member of a JSON-RPC response.
    ///
    /// Fails when `result` has no `parts` array.
    pub fn decode(result: Value) -> A2AResult<Self> {
        let parts = match result {
            Value::Object(mut obj) => obj.remove("parts"),
            other => {
                return Err(A2AError::invalid_agent_response(format!(
                    "result is not an object: {}",
                    other
                )))
            }
        };
        match parts {
            Some(Value::Array(parts)) => Ok(Self {
                parts: parts.into_iter().map(PartRepr::decode).collect(),
            }),
            Some(other) => Err(A2AError::invalid_agent_response(format!(
                "'parts' is not an array: {}",
                other
            ))),
            None => Err(A2AError::invalid_agent_response(
                "result has no 'parts' field",
            )),
        }
    }

    /// Wrap a typed message that was produced in-process.
    pub fn from_message(message: Message) -> Self {
        Self {
            parts: message.parts.into_iter().map(PartRepr::Object).collect(),
        }
    }

    pub fn parts(&self) -> &[PartRepr] {
        &self.parts
    }
}

/// Extract the answer text from `parts[0]`.
///
/// The only failure is a reply without any part.
pub fn extract_text(payload: &ReplyPayload) -> A2AResult<String> {
    payload
        .parts
        .first()
        .map(PartRepr::text)
        .ok_or_else(|| A2AError::invalid_agent_response("result has no parts"))
}
