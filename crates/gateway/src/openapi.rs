//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::handlers::sync_handler::{SyncUserRequest, SyncUserResponse};
use domain::UserRole;

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(crate::handlers::sync_handler::sync_user),
    components(schemas(SyncUserRequest, SyncUserResponse, UserRole)),
    tags((name = "Authentication", description = "Identity provider synchronization"))
)]
pub struct ApiDoc;
