use anyhow::Context;
use blog_api::{AppState, config::AppConfig, routes};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env()?;
    let addr = config.bind_addr.clone();

    // Create application state
    let state = AppState::in_memory(config);
    let app = routes::router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("API Endpoints:");
    info!("  GET    /health           - Health check");
    info!("  GET    /graphql          - GraphiQL explorer");
    info!("  POST   /graphql          - Queries and mutations (Bearer token optional)");

    axum::serve(listener, app).await?;

    Ok(())
}
