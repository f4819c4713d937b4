//! Building outbound [`Message`] values.

use crate::types::{Message, Part, Role};
use uuid::Uuid;

/// Creates a new agent message containing a single text Part.
///
/// Every reply produced by a `message/send` endpoint goes through here, so
/// the outbound role is always `agent`.
///
/// # Example
///
/// ```
/// use a2a_router::utils::new_agent_text_message;
///
/// let message = new_agent_text_message("Hello, I'm an agent");
/// assert_eq!(message.role, a2a_router::types::Role::Agent);
/// ```
pub fn new_agent_text_message(text: impl Into<String>) -> Message {
    new_text_message(Role::Agent, text)
}

/// Creates a new user message containing a single text Part.
pub fn new_user_text_message(text: impl Into<String>) -> Message {
    new_text_message(Role::User, text)
}

fn new_text_message(role: Role, text: impl Into<String>) -> Message {
    Message {
        message_id: Uuid::new_v4().to_string(),
        role,
        kind: "message".to_string(),
        parts: vec![Part::text(text)],
        context_id: None,
        metadata: None,
    }
}
