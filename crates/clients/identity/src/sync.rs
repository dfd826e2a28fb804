//! Client for the gateway's user sync endpoint.

use serde_json::Value;
use tracing::{debug, warn};

use domain::SyncUser;

use crate::error::{SyncError, MSG_SYNC_FAILED};
use crate::types::SyncResponse;

/// Posts provider identities to `POST /api/auth/sync-user`.
#[derive(Debug, Clone)]
pub struct SyncClient {
    http: reqwest::Client,
    url: String,
}

impl SyncClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// Mirror `request` into the local user table. Not retried.
    pub async fn sync_user(&self, request: &SyncUser) -> Result<SyncResponse, SyncError> {
        let response = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Sync endpoint unreachable");
                SyncError::Network(e)
            })?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .unwrap_or(MSG_SYNC_FAILED)
                .to_string();
            warn!(status = status.as_u16(), %message, "Sync endpoint rejected user");
            return Err(SyncError::Endpoint {
                status: status.as_u16(),
                message,
            });
        }

        debug!(user_id = %request.id, "User synced");
        Ok(serde_json::from_value(body).unwrap_or_else(|_| SyncResponse {
            message: String::new(),
            user_id: request.id.clone(),
        }))
    }
}
