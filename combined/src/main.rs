//! Combined binary for Empleo.social - HTTP server, migrations and auth
//! commands in one executable.

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use domain::UserRole;
use identity_client::{IdentityClient, IdentityProvider, SignUpCredentials, SignUpFeedback};

#[derive(Parser)]
#[command(name = "empleo")]
#[command(about = "Empleo.social server and account tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server with the embedded user service
    Serve {
        #[arg(long, env = "GATEWAY_HOST", default_value = "0.0.0.0")]
        host: String,
        #[arg(long, env = "GATEWAY_PORT", default_value = "3000")]
        port: u16,
    },
    /// Run database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Register an account with the identity provider and sync it locally
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        name: Option<String>,
        /// CANDIDATE or RECRUITER
        #[arg(long, default_value = "CANDIDATE")]
        role: UserRole,
    },
    /// Sign in with email and password and print the signed-in user
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[derive(Subcommand, Clone, Copy)]
enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => {
            info!("Starting Empleo.social on http://{}:{}", host, port);
            if let Err(e) = gateway_lib::run_embedded(&host, port).await {
                error!("Server failed: {}", e);
                return Err(e);
            }
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateAction::Up => user_service_lib::MigrateAction::Up,
                MigrateAction::Down => user_service_lib::MigrateAction::Down,
                MigrateAction::Status => user_service_lib::MigrateAction::Status,
                MigrateAction::Fresh => user_service_lib::MigrateAction::Fresh,
            };

            user_service_lib::run_migrations(migrate_action).await?;
        }
        Commands::Signup {
            email,
            password,
            name,
            role,
        } => {
            let client = IdentityClient::from_env()?;
            let mut credentials = SignUpCredentials::new(email, password).with_role(role);
            if let Some(name) = name {
                credentials = credentials.with_name(name);
            }

            let feedback = SignUpFeedback::from_result(&client.sign_up(credentials).await);
            println!("{}", feedback.message());
            if feedback.is_error() {
                return Err(feedback.message().into());
            }
        }
        Commands::Login { email, password } => {
            let client = IdentityClient::from_env()?;
            let session = client.sign_in(&email, &password).await?;
            println!(
                "Signed in as {} ({})",
                session.user.email.as_deref().unwrap_or("<no email>"),
                session.user.id
            );
        }
    }

    Ok(())
}
