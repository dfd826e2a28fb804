//! User repository implementation.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    Set, SqlErr,
};

use super::entities::user::{self, ActiveModel, Entity as UserEntity};
use crate::infra::Database;
use common::{AppError, AppResult};
use domain::{User, MSG_SYNC_CONFLICT};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Records whose id equals `id` or whose email equals `email`.
    ///
    /// At most two rows: one matched by id, one by email.
    async fn find_by_id_or_email(&self, id: &str, email: &str) -> AppResult<Vec<User>>;

    /// Insert a new user. A duplicate id or email yields `AppError::Conflict`.
    async fn create(&self, user: User) -> AppResult<User>;

    /// Check store connectivity
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of UserRepository backed by SeaORM
pub struct UserStore {
    db: DatabaseConnection,
}

impl UserStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for UserStore {
    async fn find_by_id_or_email(&self, id: &str, email: &str) -> AppResult<Vec<User>> {
        let models = UserEntity::find()
            .filter(
                Condition::any()
                    .add(user::Column::Id.eq(id))
                    .add(user::Column::Email.eq(email)),
            )
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        models
            .into_iter()
            .map(|model| User::try_from(model).map_err(AppError::from))
            .collect()
    }

    async fn create(&self, user: User) -> AppResult<User> {
        let active_model = ActiveModel {
            id: Set(user.id),
            email: Set(user.email),
            name: Set(user.name),
            role: Set(user.role.to_string()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        };

        let model = active_model.insert(&self.db).await.map_err(write_error)?;
        Ok(User::try_from(model)?)
    }

    async fn ping(&self) -> AppResult<()> {
        Database::from_connection(self.db.clone())
            .ping()
            .await
            .map_err(AppError::from)
    }
}

/// Unique violations mean another record already owns the id or email.
fn write_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict(MSG_SYNC_CONFLICT),
        _ => AppError::from(err),
    }
}
