use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use translator_dispatch::config::Config;
use translator_dispatch::detector::HeuristicDetector;
use translator_dispatch::generator::OpenAiGenerator;
use translator_dispatch::server::{self, AppState};
use translator_dispatch::{Dispatcher, TranslatorRegistry};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("translator_dispatch=info".parse()?),
        )
        .init();

    info!("Starting translator dispatch service");

    let config = Config::from_env()?;

    // Registry must be fully populated before the dispatcher is shared
    let registry = TranslatorRegistry::with_builtin();
    info!("Registered {} translators", registry.len());

    let generator = OpenAiGenerator::from_config(reqwest::Client::new(), &config);
    let dispatcher = Dispatcher::new(
        Arc::new(registry),
        Arc::new(HeuristicDetector),
        Arc::new(generator),
    );

    if config.api_key.is_none() {
        info!("API_KEY not set, /api routes are unauthenticated");
    }

    let app = server::router(AppState {
        dispatcher: Arc::new(dispatcher),
        api_key: config.api_key.clone(),
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
