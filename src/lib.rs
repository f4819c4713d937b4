//! # a2a-router: keyword-routed A2A front agent
//!
//! A front-facing agent receives a natural-language query over the
//! [A2A protocol](https://a2a-protocol.org/latest/specification/)
//! (`message/send`, JSON-RPC 2.0 over HTTP), classifies its intent and
//! forwards it to one of two backend agents:
//!
//! - a **document Q&A** agent that answers from an indexed project document
//!   and falls back to general model knowledge
//! - a **place search** agent that extracts `{place_type, location, radius}`
//!   from the prompt, geocodes the location and lists nearby places
//!
//! Every request path ends in a text answer. Backend failures come back to
//! the caller as readable diagnostics, never as protocol faults.
//!
//! ## Feature flags
//!
//! | Feature  | Default | Description |
//! |----------|---------|-------------|
//! | `client` | yes     | Outbound JSON-RPC transport and HTTP-backed collaborators (reqwest) |
//! | `server` | yes     | Message-Send endpoint and agent card discovery (axum) |
//! | `full`   | no      | Enable all features |
//!
//! The router itself ([`dispatch`]) needs both.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use a2a_router::cards::router_card;
//! use a2a_router::client::TransportConfig;
//! use a2a_router::config::RouterConfig;
//! use a2a_router::dispatch::{BackendRegistry, Dispatcher, RouterHandler};
//! use a2a_router::server::a2a_router;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RouterConfig::from_env()?;
//!     let registry = BackendRegistry::from_config(&config)?;
//!     let dispatcher = Dispatcher::over_http(&registry, TransportConfig::default())?;
//!     let handler = Arc::new(RouterHandler::new(Arc::new(dispatcher)));
//!
//!     let app = a2a_router(handler, router_card(config.public_url.clone()));
//!     let listener = tokio::net::TcpListener::bind(config.bind).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! Each service provides:
//! - `POST /`: JSON-RPC 2.0 endpoint
//! - `GET /.well-known/agent.json`: agent card discovery
//!
//! ## Architecture
//!
//! - [`classifier`]: keyword classifier, query → [`classifier::Label`]
//! - [`normalize`]: reply parts decoded into an explicit tagged union
//! - [`session`]: session store and the bounded retry that establishes a session
//! - [`backends`]: document Q&A and place search behind `answer(query)`
//! - `client`: outbound transports and the `message/send` envelope
//! - `server`: the Message-Send endpoint and its axum routes
//! - `dispatch`: backend registry, dispatcher and the router's own handler
//! - `providers`: OpenAI and Google Maps collaborators
//! - [`config`]: environment-driven start-up configuration

pub mod backends;
pub mod builders;
pub mod cards;
pub mod classifier;
pub mod config;
pub mod error;
pub mod normalize;
pub mod session;
pub mod types;
pub mod utils;

#[cfg(feature = "client")]
pub mod client;

#[cfg(feature = "client")]
pub mod providers;

#[cfg(feature = "server")]
pub mod server;

#[cfg(all(feature = "client", feature = "server"))]
pub mod dispatch;

/// Prelude module that re-exports commonly used types and traits.
///
/// # Example
///
/// ```
/// use a2a_router::prelude::*;
///
/// assert_eq!(classify("where is the location of the museum"), Label::Map);
/// ```
pub mod prelude {
    // Core types
    pub use crate::types::{
        AgentCapabilities, AgentCard, AgentSkill, Message, Part, Role, SendMessageConfiguration,
        SendMessageParams,
    };

    // Error types
    pub use crate::error::{A2AError, A2AResult};

    // Routing and backends
    pub use crate::backends::Backend;
    pub use crate::builders::AgentCardBuilder;
    pub use crate::classifier::{classify, KeywordClassifier, Label};
    pub use crate::normalize::{extract_text, PartRepr, ReplyPayload};
    pub use crate::session::{get_session, RetryPolicy, Session, SessionStore};

    #[cfg(feature = "client")]
    pub use crate::client::{JsonRpcTransport, Transport};

    #[cfg(feature = "server")]
    pub use crate::server::{a2a_router, BackendHandler, RequestHandler};

    #[cfg(all(feature = "client", feature = "server"))]
    pub use crate::dispatch::{BackendRegistry, Dispatcher, RouterHandler};
}

// Re-export core types at crate root for convenience.
pub use builders::AgentCardBuilder;
pub use error::{A2AError, A2AResult};
pub use types::*;
