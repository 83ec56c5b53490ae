//! Main entry point for the ConcreteVision image generation service

use std::sync::Arc;

use concrete_vision::{api, config::Settings, generator::Generator, AppState};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = Settings::load()?;
    settings.validate()?;

    init_tracing(&settings.logging.level, &settings.logging.format);

    info!("Starting ConcreteVision image generation service");
    info!(
        "Loaded configuration: server={}:{}",
        settings.server.host, settings.server.port
    );

    // Initialize the generator before the server accepts traffic
    let generator = Arc::new(Generator::initialize(&settings.generator).await);
    info!(
        model_loaded = generator.model_loaded(),
        placeholder_mode = generator.placeholder_mode(),
        device = generator.device().as_str(),
        "Generator ready"
    );

    let addr = format!("{}:{}", settings.server.host, settings.server.port);

    // Create application state and build the router
    let state = Arc::new(AppState::new(settings, generator));
    let app = api::routes::create_router(state);

    info!("Server listening on {}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(level: &str, format: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.to_string()));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}
