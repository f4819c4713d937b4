//! Front-facing router agent (port 8000 by default).

use std::sync::Arc;

use a2a_router::cards::router_card;
use a2a_router::client::TransportConfig;
use a2a_router::config::{load_dotenv, RouterConfig};
use a2a_router::dispatch::{BackendRegistry, Dispatcher, RouterHandler};
use a2a_router::server::{a2a_router, serve};
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

    let config = RouterConfig::from_env()?;
    let registry = BackendRegistry::from_config(&config)?;
    let dispatcher = Dispatcher::over_http(
        &registry,
        TransportConfig {
            timeout: config.backend_timeout,
            ..TransportConfig::default()
        },
    )?;
    info!(
        answer_question = %config.answer_question_url,
        map = %config.map_url,
        "Backends registered"
    );

    let handler = Arc::new(RouterHandler::new(Arc::new(dispatcher)));
    let app = a2a_router(handler, router_card(config.public_url.clone()));
    serve(config.bind, app).await?;
    Ok(())
}
