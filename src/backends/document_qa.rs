//! Document question answering.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::A2AResult;

use super::{run_blocking, Backend};

/// Where an answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerSource {
    /// Found in the indexed project document.
    Pdf,
    /// General model knowledge.
    Llm,
}

impl fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnswerSource::Pdf => f.write_str("pdf"),
            AnswerSource::Llm => f.write_str("llm"),
        }
    }
}

/// Structured output of the document agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentAnswer {
    pub answer: String,
    pub source: AnswerSource,
}

/// A blocking agent that answers from a document store, falling back to
/// general knowledge.
pub trait DocumentAgent: Send + Sync {
    fn run_sync(&self, query: &str) -> A2AResult<DocumentAnswer>;
}

/// Backend answering questions about the project document.
pub struct DocumentQa {
    agent: Arc<dyn DocumentAgent>,
}

impl DocumentQa {
    pub fn new(agent: Arc<dyn DocumentAgent>) -> Self {
        Self { agent }
    }
}

#[async_trait]
impl Backend for DocumentQa {
    fn name(&self) -> &str {
        "answer_question"
    }

    async fn answer(&self, query: &str) -> A2AResult<String> {
        let agent = Arc::clone(&self.agent);
        let query = query.to_owned();
        let result = run_blocking(move || agent.run_sync(&query)).await?;
        debug!(source = %result.source, "Document agent answered");
        Ok(format!("{}\n(Source: {})", result.answer, result.source))
    }
}
