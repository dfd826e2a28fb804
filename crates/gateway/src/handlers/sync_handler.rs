//! User sync handler.
//!
//! Called by the identity client right after the provider confirms a
//! sign-up, to mirror the provider user into the local table.

use axum::{extract::State, http::StatusCode, response::Json, routing::post, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use common::AppResult;
use domain::{DomainResult, SyncUser, UserRole};

use crate::extractors::ValidatedJson;
use crate::state::AppState;

/// Provider identity to reconcile.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SyncUserRequest {
    /// Identity provider subject id
    #[validate(
        required(message = "Missing user ID or email"),
        length(min = 1, message = "Missing user ID or email")
    )]
    #[schema(example = "3f1c7a52-8a57-4c43-9b0e-2f2d51b4c6a1")]
    pub id: Option<String>,
    /// Email confirmed by the provider
    #[validate(
        required(message = "Missing user ID or email"),
        length(min = 1, message = "Missing user ID or email")
    )]
    #[schema(example = "ana@example.com")]
    pub email: Option<String>,
    /// Display name
    #[schema(example = "Ana Pérez")]
    pub name: Option<String>,
    /// Requested role, CANDIDATE when absent
    pub role: Option<UserRole>,
}

impl SyncUserRequest {
    /// Convert into the domain request once fields are known to be present.
    pub fn into_sync_user(self) -> DomainResult<SyncUser> {
        SyncUser::new(
            self.id.unwrap_or_default(),
            self.email.unwrap_or_default(),
            self.name,
            self.role,
        )
    }
}

/// Sync result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncUserResponse {
    #[schema(example = "User synced successfully")]
    pub message: String,
    /// Local user id (equal to the subject id)
    pub user_id: String,
}

/// Create authentication routes
pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/sync-user", post(sync_user))
}

/// Mirror an identity provider user into the local user table
#[utoipa::path(
    post,
    path = "/api/auth/sync-user",
    tag = "Authentication",
    request_body = SyncUserRequest,
    responses(
        (status = 200, description = "User already exists and is in sync", body = SyncUserResponse),
        (status = 201, description = "User synced successfully", body = SyncUserResponse),
        (status = 400, description = "Missing user ID or email"),
        (status = 409, description = "ID or email bound to a different identity"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn sync_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<SyncUserRequest>,
) -> AppResult<(StatusCode, Json<SyncUserResponse>)> {
    let request = payload.into_sync_user()?;
    let outcome = state.user_sync.sync_user(request).await?;

    let status = if outcome.is_created() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(SyncUserResponse {
            message: outcome.message().to_string(),
            user_id: outcome.user().id.clone(),
        }),
    ))
}
