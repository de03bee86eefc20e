use mcp_mealie::{MealieConfig, MealieMcpServer};
use rmcp::transport::sse_server::{SseServer, SseServerConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".to_string().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MealieConfig::from_env()?;

    // Probe the gateway before serving. A failed probe is a warning, not
    // a startup failure: the Mealie instance may simply not be up yet.
    tracing::info!("Checking connection to Mealie at {}...", config.base_url);
    let probe = MealieMcpServer::new(&config);
    match probe.test_connection().await {
        Ok(about) => {
            let version = about
                .get("version")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown");
            tracing::info!("Connected to Mealie (version {})", version);
        }
        Err(e) => {
            tracing::warn!("Could not reach Mealie: {}", e);
            tracing::warn!("Please verify:");
            tracing::warn!("  - MEALIE_URL is correct: {}", config.base_url);
            tracing::warn!("  - MEALIE_API_TOKEN is a valid API token");
            tracing::warn!("  - The Mealie server is running and accessible");
            tracing::warn!("The server will start anyway; tools will fail until Mealie is reachable.");
        }
    }

    // Create server configuration and start SSE server
    let sse_config = SseServerConfig {
        bind: config.bind_addr.parse()?,
        sse_path: "/sse".to_string(),
        post_path: "/message".to_string(),
        ct: tokio_util::sync::CancellationToken::new(),
        sse_keep_alive: None,
    };

    tracing::info!("Mealie MCP Server listening on {}", sse_config.bind);

    // serve_with_config handles binding, axum server setup, and graceful shutdown internally
    let sse_server = SseServer::serve_with_config(sse_config).await?;

    let service_config = config.clone();
    let ct = sse_server.with_service(move || MealieMcpServer::new(&service_config));

    tracing::info!("Mealie MCP Server started successfully");

    // Wait for Ctrl+C
    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutting down...");
    ct.cancel();

    Ok(())
}
