//! Concrete collaborators used by the service binaries.
//!
//! - [`OpenAiDocumentAgent`]: Responses API with `file_search`
//! - [`OpenAiPlaceExtractor`]: chat completions in JSON mode
//! - [`GoogleMapsClient`]: geocoding and nearby search

mod google_maps;
mod openai;

pub use google_maps::GoogleMapsClient;
pub use openai::{OpenAiDocumentAgent, OpenAiPlaceExtractor};
