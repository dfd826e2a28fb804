//! Identity client errors.
//!
//! Sign-up keeps provider failures and sync failures apart: a sync failure
//! still carries the user the provider created.

use thiserror::Error;

use crate::types::{ProviderUser, Session};

/// Fallback when the sync endpoint rejects without a message.
pub const MSG_SYNC_FAILED: &str = "Failed to sync user with database";

/// Errors from the identity provider.
#[derive(Error, Debug)]
pub enum IdentityError {
    /// Provider answered with a non-success status
    #[error("{message}")]
    Provider { status: u16, message: String },

    /// Provider could not be reached
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected provider response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl IdentityError {
    /// HTTP status returned by the provider, if it answered
    pub fn status(&self) -> Option<u16> {
        match self {
            IdentityError::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type IdentityResult<T> = Result<T, IdentityError>;

/// Errors calling the gateway sync endpoint.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Network error syncing user: {0}")]
    Network(#[source] reqwest::Error),

    #[error("{message}")]
    Endpoint { status: u16, message: String },
}

/// Sign-up failure, one variant per channel.
#[derive(Error, Debug)]
pub enum SignUpError {
    /// Rejected locally before any network call
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Provider(#[from] IdentityError),

    /// Provider created the user but the local sync failed
    #[error("{source}")]
    Sync {
        user: ProviderUser,
        session: Option<Session>,
        #[source]
        source: SyncError,
    },

    /// Provider answered without a user and without an error
    #[error("Unknown sign-up issue: no user data returned by the identity provider")]
    Unknown,
}
