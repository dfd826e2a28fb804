//! User sync service - reconciles identity provider users into the local store.
//!
//! A sync either confirms an exact existing record, creates a new one, or
//! rejects a partial match as a conflict. It writes at most one record.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use common::{AppError, AppResult};
use domain::{SyncOutcome, SyncUser, User, MSG_MISSING_ID_OR_EMAIL, MSG_SYNC_CONFLICT};

use crate::repository::UserRepository;

/// User sync trait for dependency injection.
#[async_trait]
pub trait UserSync: Send + Sync {
    /// Reconcile a provider identity into the local user table
    async fn sync_user(&self, request: SyncUser) -> AppResult<SyncOutcome>;

    /// Check that the backing store answers
    async fn ping(&self) -> AppResult<()>;
}

/// Concrete implementation of UserSync using repository.
pub struct UserSynchronizer {
    repo: Arc<dyn UserRepository>,
}

impl UserSynchronizer {
    /// Create new sync service instance with repository
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// Existing record for this identity, or a conflict if the match is partial.
    async fn find_existing(&self, request: &SyncUser) -> AppResult<Option<User>> {
        let found = self
            .repo
            .find_by_id_or_email(&request.id, &request.email)
            .await?;

        let mut existing = None;
        for user in found {
            if let Err(e) = request.reconcile(&user) {
                warn!(
                    subject = %request.id,
                    existing = %user.id,
                    "Sync conflict: id or email already bound to another identity"
                );
                return Err(e.into());
            }
            existing = Some(user);
        }
        Ok(existing)
    }
}

#[async_trait]
impl UserSync for UserSynchronizer {
    async fn sync_user(&self, request: SyncUser) -> AppResult<SyncOutcome> {
        if request.id.trim().is_empty() || request.email.trim().is_empty() {
            return Err(AppError::validation(MSG_MISSING_ID_OR_EMAIL));
        }

        if let Some(user) = self.find_existing(&request).await? {
            debug!(user_id = %user.id, "User already in sync");
            return Ok(SyncOutcome::AlreadyInSync(user));
        }

        match self.repo.create(User::from_sync(request.clone())).await {
            Ok(user) => {
                info!(user_id = %user.id, role = %user.role, "User synced");
                Ok(SyncOutcome::Created(user))
            }
            // A concurrent sync inserted first: judge against what it wrote.
            Err(AppError::Conflict(_)) => match self.find_existing(&request).await? {
                Some(user) => Ok(SyncOutcome::AlreadyInSync(user)),
                None => Err(AppError::conflict(MSG_SYNC_CONFLICT)),
            },
            Err(e) => Err(e),
        }
    }

    async fn ping(&self) -> AppResult<()> {
        self.repo.ping().await
    }
}
