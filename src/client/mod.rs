//! Outbound side: how the router reaches its backends.
//!
//! - [`Transport`] / [`JsonRpcTransport`]: pluggable transport layer, JSON-RPC
//!   over HTTP by default
//! - [`LocalTransport`]: in-process calls into a
//!   [`RequestHandler`](crate::server::RequestHandler)
//! - [`build_request`]: the `message/send` envelope
//! - [`BackendReply`]: a reply decoded at the transport boundary
//!
//! # Quick Start
//!
//! ```no_run
//! use a2a_router::client::{build_request, JsonRpcTransport, Transport};
//! use a2a_router::utils::new_user_text_message;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = JsonRpcTransport::new("http://localhost:8001/");
//! let request = build_request(1, new_user_text_message("What does the app do?"))?;
//! let reply = transport.send(&request).await?;
//! println!("{:?}", reply);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "server")]
mod local;
mod transport;

#[cfg(feature = "server")]
pub use local::LocalTransport;
pub use transport::{
    build_request, decode_response, BackendReply, JsonRpcTransport, Transport, TransportConfig,
};
