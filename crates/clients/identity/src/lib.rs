//! Identity Client Library
//!
//! Talks to the hosted identity provider (GoTrue REST API) and mirrors new
//! sign-ups into the local user table through the gateway's sync endpoint.
//! [`AuthStore`] keeps the signed-in user observable for the rest of the app.

pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod store;
pub mod sync;
pub mod types;

pub use client::{AuthSubscription, IdentityClient, IdentityProvider};
pub use config::IdentityConfig;
pub use error::{IdentityError, IdentityResult, SignUpError, SyncError};
pub use forms::{auth_callback_redirect, SignUpFeedback};
pub use store::{AuthSnapshot, AuthStore};
pub use sync::SyncClient;
pub use types::{
    AuthChangeEvent, AuthStateChange, ProviderUser, Session, SignUpCredentials, SignUpSuccess,
    SyncResponse, UserMetadata,
};
