use anyhow::Result;
use tracing::info;

use fleet_registry_api::{app, config, middleware, services};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!("Starting Fleet Registry API v{}", env!("CARGO_PKG_VERSION"));

    // Create database pool for the configured backend
    let pool = persistence::db::create_pool(&config.database.pool_config()).await?;

    // Prepare the schema
    let kind = persistence::db::StoreKind::from_url(&config.database.url)?;
    persistence::schema::init_schema(&pool, kind).await?;
    info!("Schema ready");

    // Create the first operator account when configured
    services::bootstrap_operator(&pool, &config.auth).await?;

    // Build application
    let addr = config.socket_addr();
    let app = app::create_app(config, pool)?;

    // Start server
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
