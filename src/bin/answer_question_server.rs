//! Document Q&A backend agent (port 8001 by default).

use std::sync::Arc;

use a2a_router::backends::DocumentQa;
use a2a_router::cards::answer_question_card;
use a2a_router::config::{load_dotenv, AnswerQuestionConfig};
use a2a_router::providers::OpenAiDocumentAgent;
use a2a_router::server::{a2a_router, serve, BackendHandler};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv = load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    if let Some(path) = dotenv {
        info!(path = %path.display(), "Loaded .env");
    }

    let config = AnswerQuestionConfig::from_env()?;
    info!(
        model = %config.openai.model,
        vector_store = %config.vector_store_id,
        "Document agent configured"
    );

    let agent = OpenAiDocumentAgent::new(config.openai.clone(), config.vector_store_id.clone());
    let backend = Arc::new(DocumentQa::new(Arc::new(agent)));
    let handler = Arc::new(BackendHandler::new(backend));
    let app = a2a_router(handler, answer_question_card(config.public_url.clone()));
    serve(config.bind, app).await?;
    Ok(())
}
