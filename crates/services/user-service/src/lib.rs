//! User Service Library
//!
//! Owns the local user table: schema migrations, the SeaORM-backed
//! repository and the sync use case that reconciles identity provider users.
//! The HTTP gateway embeds it in-process.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use tracing::info;

use crate::config::UserServiceConfig;
use crate::infra::Database;
use crate::repository::UserStore;
use crate::service::{UserSync, UserSynchronizer};

/// Connect to the database, apply migrations and build the sync service.
pub async fn build_user_sync(
    config: &UserServiceConfig,
) -> Result<Arc<dyn UserSync>, Box<dyn std::error::Error + Send + Sync>> {
    let db = Database::connect(config).await?;
    let user_repo = Arc::new(UserStore::new(db.get_connection()));
    Ok(Arc::new(UserSynchronizer::new(user_repo)))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let config = UserServiceConfig::from_env();
    let db = Database::connect_without_migrations(&config).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
