use risk_dashboard::{
    api::create_router,
    client::{ApiClient, NoCookies},
    config::Config,
    observability::init_tracing,
};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load()?;
    config.validate()?;

    // Initialize tracing/logging
    init_tracing(&config.observability);

    tracing::info!("Starting risk dashboard");
    tracing::info!("Configuration loaded: {:?}", config.server);

    if config.jwt_secret().is_none() {
        tracing::warn!("No SSO secret configured; /auth will answer 500 until one is set");
    }

    // Shared client for the risk API; request handlers attach cookies per call
    let api_client = ApiClient::new(&config.api, Arc::new(NoCookies))?;
    tracing::info!(base_url = %api_client.base_url(), "Risk API client ready");

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    // Create router
    let app = create_router(Arc::new(config), api_client);

    tracing::info!("Listening on http://{}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("Risk dashboard is ready to accept requests");

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}
