//! Backend agents.
//!
//! A backend wraps one capability behind `answer(query) -> text`. The
//! tool-augmented work it does (LLM calls, geocoding, place search) is owned
//! by collaborators injected at construction, so the backends themselves
//! stay testable without network access.

use async_trait::async_trait;

use crate::error::{A2AError, A2AResult};

pub mod document_qa;
pub mod place_search;

pub use document_qa::{AnswerSource, DocumentAgent, DocumentAnswer, DocumentQa};
pub use place_search::{
    format_places, Place, PlaceExtractor, PlaceQuery, PlaceSearch, PlacesApi, MAP_SESSION,
};

/// One specialized capability.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Answer a query with plain text.
    async fn answer(&self, query: &str) -> A2AResult<String>;
}

/// Run a blocking collaborator call on the blocking thread pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> A2AResult<T>
where
    F: FnOnce() -> A2AResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| A2AError::internal_error(format!("blocking task failed: {}", e)))?
}
