//! Identity client configuration.

use common::{env_any, env_or, env_parse};
use domain::{AUTH_CALLBACK_PATH, SYNC_USER_PATH};

use crate::error::{IdentityError, IdentityResult};

/// Identity provider and application endpoints.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Identity provider base URL (project URL, without `/auth/v1`)
    pub provider_url: String,
    /// Public anon key sent as `apikey` on every provider call
    pub anon_key: String,
    /// Public URL of this application
    pub app_url: String,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl IdentityConfig {
    pub fn new(
        provider_url: impl Into<String>,
        anon_key: impl Into<String>,
        app_url: impl Into<String>,
    ) -> Self {
        Self {
            provider_url: provider_url.into(),
            anon_key: anon_key.into(),
            app_url: app_url.into(),
            request_timeout_ms: 10_000,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// `SUPABASE_URL` and `SUPABASE_ANON_KEY` are required.
    pub fn from_env() -> IdentityResult<Self> {
        let provider_url = env_any(&["SUPABASE_URL", "NEXT_PUBLIC_SUPABASE_URL"])
            .ok_or_else(|| IdentityError::Config("SUPABASE_URL is not set".to_string()))?;
        let anon_key = env_any(&["SUPABASE_ANON_KEY", "NEXT_PUBLIC_SUPABASE_ANON_KEY"])
            .ok_or_else(|| IdentityError::Config("SUPABASE_ANON_KEY is not set".to_string()))?;

        Ok(Self {
            provider_url,
            anon_key,
            app_url: env_or(&["APP_URL"], "http://localhost:3000"),
            request_timeout_ms: env_parse(&["IDENTITY_TIMEOUT_MS"], 10_000),
        })
    }

    /// Provider auth endpoint for `path`.
    pub fn auth_endpoint(&self, path: &str) -> String {
        format!("{}/auth/v1{}", self.provider_url.trim_end_matches('/'), path)
    }

    /// Where the confirmation email sends the user back to.
    pub fn redirect_url(&self) -> String {
        format!("{}{}", self.app_url.trim_end_matches('/'), AUTH_CALLBACK_PATH)
    }

    /// Gateway sync endpoint.
    pub fn sync_url(&self) -> String {
        format!("{}{}", self.app_url.trim_end_matches('/'), SYNC_USER_PATH)
    }
}
