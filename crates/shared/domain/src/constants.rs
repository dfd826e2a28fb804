//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// User Roles
// =============================================================================

/// Default role assigned to new users
pub const ROLE_CANDIDATE: &str = "CANDIDATE";

/// Role for users publishing job offers
pub const ROLE_RECRUITER: &str = "RECRUITER";

// =============================================================================
// Sync messages
// =============================================================================

/// Sync payload without subject id or email
pub const MSG_MISSING_ID_OR_EMAIL: &str = "Missing user ID or email";

/// Existing record matches on exactly one of id/email
pub const MSG_SYNC_CONFLICT: &str = "User conflict: ID or email mismatch with existing record";

/// Existing record matches on both id and email
pub const MSG_ALREADY_IN_SYNC: &str = "User already exists and is in sync";

/// New record created
pub const MSG_SYNCED: &str = "User synced successfully";

// =============================================================================
// Routes
// =============================================================================

/// Path of the sync endpoint, shared by the server and the identity client
pub const SYNC_USER_PATH: &str = "/api/auth/sync-user";

/// Path the identity provider redirects to after email confirmation
pub const AUTH_CALLBACK_PATH: &str = "/auth/callback";
