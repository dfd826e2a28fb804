//! API Gateway - HTTP REST API for Empleo.social.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gateway_lib::config::GatewayConfig;
use gateway_lib::BoxError;

#[derive(Parser)]
#[command(name = "gateway")]
#[command(about = "HTTP API for Empleo.social")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Bind host (defaults to GATEWAY_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Bind port (defaults to GATEWAY_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = GatewayConfig::from_env();

    match cli.command {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or(config.host);
            let port = port.unwrap_or(config.port);
            gateway_lib::run_embedded(&host, port).await?;
        }
    }

    Ok(())
}
