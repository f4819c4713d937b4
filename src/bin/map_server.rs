//! Place-search backend agent (port 8002 by default).

use std::sync::Arc;

use a2a_router::backends::PlaceSearch;
use a2a_router::cards::map_card;
use a2a_router::config::{load_dotenv, MapConfig};
use a2a_router::providers::{GoogleMapsClient, OpenAiPlaceExtractor};
use a2a_router::server::{a2a_router, serve, BackendHandler};
use a2a_router::session::InMemorySessionStore;
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

    let config = MapConfig::from_env()?;
    info!(
        model = %config.openai.model,
        max_retries = config.session_retry.max_retries,
        "Place search configured"
    );

    let backend = PlaceSearch::new(
        Arc::new(OpenAiPlaceExtractor::new(config.openai.clone())),
        Arc::new(GoogleMapsClient::new(config.google_maps_api_key.clone())?),
        Arc::new(InMemorySessionStore::new()),
    )
    .with_retry_policy(config.session_retry);
    let handler = Arc::new(BackendHandler::new(Arc::new(backend)));
    let app = a2a_router(handler, map_card(config.public_url.clone()));
    serve(config.bind, app).await?;
    Ok(())
}
