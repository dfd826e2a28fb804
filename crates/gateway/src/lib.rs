//! API Gateway Library
//!
//! HTTP surface of the application: the user sync endpoint consumed by the
//! identity client, health checks and OpenAPI docs. The user service is
//! embedded in-process.

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod routes;
pub mod state;

use std::net::SocketAddr;

use tower_http::trace::TraceLayer;
use tracing::info;

use user_service_lib::config::UserServiceConfig;

use crate::config::GatewayConfig;
use crate::routes::create_router;
use crate::state::AppState;

/// Boxed error returned by the server entry points.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Run the gateway on the given host and port (for CLI and combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), BoxError> {
    let mut config = GatewayConfig::from_env();
    config.host = host.to_string();
    config.port = port;

    run_server_with_config(config, UserServiceConfig::from_env()).await
}

/// Run the HTTP server with the given configuration.
pub async fn run_server_with_config(
    config: GatewayConfig,
    user_config: UserServiceConfig,
) -> Result<(), BoxError> {
    // Embedded user service (owns the database)
    let user_sync = user_service_lib::build_user_sync(&user_config).await?;

    let state = AppState::new(user_sync);
    let app = create_router(state).layer(TraceLayer::new_for_http());

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
