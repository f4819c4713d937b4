//! Helpers for building and reading messages.

pub mod constants;
pub mod message;
pub mod parts;

pub use constants::*;
pub use message::*;
pub use parts::*;
