//! A2A server side: the Message-Send endpoint each service exposes.
//!
//! - [`RequestHandler`] trait: `message/send` plus the inert protocol stubs
//! - [`BackendHandler`]: adapts a [`Backend`](crate::backends::Backend) to
//!   the endpoint contract
//! - [`a2a_router`]: ready-made axum routes for A2A services
//!
//! # Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use a2a_router::server::*;
//!
//! let handler: Arc<dyn RequestHandler> = Arc::new(BackendHandler::new(backend));
//! let app = a2a_router(handler, agent_card);
//! ```

pub mod axum_integration;
pub mod request_handler;

pub use axum_integration::{a2a_router, serve};
pub use request_handler::{query_text, BackendHandler, RequestHandler};
