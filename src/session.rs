//! Conversation sessions and the bounded retry that establishes them.
//!
//! A session is created in an external store and then looked up. Creation
//! may become visible only after some delay, so [`SessionEstablisher`] polls
//! the store with a fixed backoff for a bounded number of attempts and then
//! gives up with `None` instead of raising.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::error::A2AResult;

/// Key triple identifying a conversation context in a [`SessionStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Session {
    pub app_name: String,
    pub user_id: String,
    pub session_id: String,
}

impl Session {
    pub fn new(
        app_name: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            app_name: app_name.into(),
            user_id: user_id.into(),
            session_id: session_id.into(),
        }
    }
}

/// Trait for the external store that owns sessions.
///
/// Sessions are created once, looked up repeatedly and never destroyed here.
/// Lookups may lag behind creation.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create the session, or return it if it already exists.
    async fn create_session(&self, key: &Session) -> A2AResult<Session>;

    /// Look a session up. `None` means the store does not (yet) know it.
    async fn get_session(&self, key: &Session) -> A2AResult<Option<Session>>;
}

/// In-memory session store backed by a `HashSet`.
///
/// Creation is visible immediately. All sessions are lost when the process
/// exits.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashSet<Session>>>,
}

impl InMemorySessionStore {
    /// Create a new empty in-memory session store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn create_session(&self, key: &Session) -> A2AResult<Session> {
        let mut sessions = self.sessions.write().await;
        let is_new = sessions.insert(key.clone());
        debug!(session_id = %key.session_id, is_new, "Session created");
        Ok(key.clone())
    }

    async fn get_session(&self, key: &Session) -> A2AResult<Option<Session>> {
        Ok(self.sessions.read().await.get(key).cloned())
    }
}

/// Attempt bound and fixed backoff for session lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Maximum number of lookups.
    pub max_retries: u32,
    /// Pause between two lookups.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            delay: Duration::from_millis(100),
        }
    }
}

/// States of one establishment run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EstablishState {
    /// About to issue lookup number `n` (1-based).
    Attempting(u32),
    /// A lookup returned the session. Terminal.
    Succeeded(Session),
    /// `max_retries` lookups found nothing. Terminal.
    Exhausted,
}

/// Polls a [`SessionStore`] until a session shows up or the policy runs out.
#[derive(Debug, Clone, Default)]
pub struct SessionEstablisher {
    policy: RetryPolicy,
}

impl SessionEstablisher {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Run the state machine to a terminal state.
    ///
    /// Issues at most `max_retries` lookups and returns on the first one that
    /// finds the session. Store errors count as absence. The delay is a real
    /// suspension point; no delay follows the final attempt.
    pub async fn establish(&self, store: &dyn SessionStore, key: &Session) -> Option<Session> {
        let mut state = EstablishState::Attempting(1);
        loop {
            state = match state {
                EstablishState::Attempting(n) if n > self.policy.max_retries => {
                    EstablishState::Exhausted
                }
                EstablishState::Attempting(n) => self.attempt(store, key, n).await,
                EstablishState::Succeeded(session) => return Some(session),
                EstablishState::Exhausted => {
                    error!(
                        session_id = %key.session_id,
                        attempts = self.policy.max_retries,
                        "Failed to retrieve session after multiple retries"
                    );
                    return None;
                }
            };
        }
    }

    async fn attempt(&self, store: &dyn SessionStore, key: &Session, n: u32) -> EstablishState {
        let found = match store.get_session(key).await {
            Ok(found) => found,
            Err(e) => {
                warn!(attempt = n, error = %e, "Session lookup failed");
                None
            }
        };

        match found {
            Some(session) => {
                info!(attempt = n, session_id = %key.session_id, "Session retrieved");
                EstablishState::Succeeded(session)
            }
            None => {
                warn!(attempt = n, session_id = %key.session_id, "Session not found");
                if n < self.policy.max_retries {
                    tokio::time::sleep(self.policy.delay).await;
                }
                EstablishState::Attempting(n + 1)
            }
        }
    }
}

/// Look a session up with bounded retries.
///
/// Returns `None` once the policy is exhausted; callers abort their request
/// on `None`.
pub async fn get_session(
    store: &dyn SessionStore,
    key: &Session,
    policy: RetryPolicy,
) -> Option<Session> {
    SessionEstablisher::new(policy).establish(store, key).await
}
