//! Identity provider client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, warn};
use validator::Validate;

use common::first_message;
use domain::SyncUser;

use crate::config::IdentityConfig;
use crate::error::{IdentityError, IdentityResult, SignUpError};
use crate::sync::SyncClient;
use crate::types::{
    AuthChangeEvent, AuthStateChange, ProviderUser, Session, SignUpCredentials, SignUpResponse,
    SignUpSuccess, UserMetadata,
};

const EVENT_CAPACITY: usize = 16;

/// Identity provider operations, injectable for tests.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Register with the provider, then mirror the user locally
    async fn sign_up(&self, credentials: SignUpCredentials)
        -> Result<SignUpSuccess, SignUpError>;

    /// Password sign-in; stores the session and emits `SignedIn`
    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<Session>;

    /// Revoke and forget the session; emits `SignedOut`
    async fn sign_out(&self) -> IdentityResult<()>;

    /// User behind the held session, `None` when signed out
    async fn current_user(&self) -> IdentityResult<Option<ProviderUser>>;

    /// Auth change stream, starting with `InitialSession`
    async fn subscribe(&self) -> AuthSubscription;
}

/// Receiver side of the auth change stream. Dropping it unsubscribes.
pub struct AuthSubscription {
    initial: Option<AuthStateChange>,
    receiver: broadcast::Receiver<AuthStateChange>,
}

impl AuthSubscription {
    pub fn new(session: Option<Session>, receiver: broadcast::Receiver<AuthStateChange>) -> Self {
        Self {
            initial: Some(AuthStateChange {
                event: AuthChangeEvent::InitialSession,
                session,
            }),
            receiver,
        }
    }

    /// Next event, or `None` once the provider is gone. Cancel safe.
    pub async fn next(&mut self) -> Option<AuthStateChange> {
        if let Some(initial) = self.initial.take() {
            return Some(initial);
        }

        loop {
            match self.receiver.recv().await {
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Auth subscriber lagged behind");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}

/// GoTrue REST client holding the current session.
pub struct IdentityClient {
    http: reqwest::Client,
    config: IdentityConfig,
    sync: SyncClient,
    session: RwLock<Option<Session>>,
    events: broadcast::Sender<AuthStateChange>,
}

impl IdentityClient {
    pub fn new(config: IdentityConfig) -> IdentityResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;
        let sync = SyncClient::new(http.clone(), config.sync_url());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            http,
            config,
            sync,
            session: RwLock::new(None),
            events,
        })
    }

    /// Build from `SUPABASE_URL`, `SUPABASE_ANON_KEY` and `APP_URL`.
    pub fn from_env() -> IdentityResult<Self> {
        Self::new(IdentityConfig::from_env()?)
    }

    /// Currently held session
    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.config.auth_endpoint(path))
            .header("apikey", &self.config.anon_key)
    }

    /// Send and turn non-success statuses into `IdentityError::Provider`.
    async fn send(&self, req: RequestBuilder) -> IdentityResult<Response> {
        let response = req.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body: Value = response.json().await.unwrap_or(Value::Null);
        let message = provider_message(&body)
            .or_else(|| status.canonical_reason().map(String::from))
            .unwrap_or_else(|| format!("Identity provider returned {}", status));

        Err(IdentityError::Provider {
            status: status.as_u16(),
            message,
        })
    }

    async fn execute<T: DeserializeOwned>(&self, req: RequestBuilder) -> IdentityResult<T> {
        let response = self.send(req).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| IdentityError::Decode(e.to_string()))
    }

    async fn set_session(&self, session: Option<Session>, event: AuthChangeEvent) {
        *self.session.write().await = session.clone();
        // No subscribers is fine
        let _ = self.events.send(AuthStateChange { event, session });
    }
}

/// Error text from a GoTrue error body; the field name varies by endpoint.
fn provider_message(body: &Value) -> Option<String> {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .filter(|message| !message.is_empty())
        .map(String::from)
}

/// Sync payload: provider metadata wins over what the form asked for.
fn sync_request(user: &ProviderUser, credentials: &SignUpCredentials) -> SyncUser {
    let metadata = &user.user_metadata;
    let role = metadata
        .role
        .as_deref()
        .and_then(|role| role.parse().ok())
        .or(credentials.role)
        .unwrap_or_default();

    SyncUser {
        id: user.id.clone(),
        email: user
            .email
            .clone()
            .filter(|email| !email.is_empty())
            .unwrap_or_else(|| credentials.email.clone()),
        name: metadata
            .name
            .clone()
            .filter(|name| !name.is_empty())
            .or_else(|| credentials.name.clone()),
        role: Some(role),
    }
}

#[async_trait]
impl IdentityProvider for IdentityClient {
    async fn sign_up(
        &self,
        credentials: SignUpCredentials,
    ) -> Result<SignUpSuccess, SignUpError> {
        credentials
            .validate()
            .map_err(|e| SignUpError::Validation(first_message(&e)))?;

        #[derive(Serialize)]
        struct SignUpBody<'a> {
            email: &'a str,
            password: &'a str,
            data: UserMetadata,
        }

        let body = SignUpBody {
            email: &credentials.email,
            password: &credentials.password,
            data: UserMetadata {
                name: credentials.name.clone(),
                role: Some(credentials.role.unwrap_or_default().to_string()),
            },
        };
        let req = self
            .request(Method::POST, "/signup")
            .query(&[("redirect_to", self.config.redirect_url())])
            .json(&body);

        let response: SignUpResponse = self.execute(req).await.map_err(|e| {
            warn!(error = %e, "Identity provider sign-up failed");
            SignUpError::Provider(e)
        })?;

        let Some((user, session)) = response.into_parts() else {
            warn!("Identity provider returned neither a user nor an error");
            return Err(SignUpError::Unknown);
        };

        if let Some(session) = &session {
            self.set_session(Some(session.clone()), AuthChangeEvent::SignedIn)
                .await;
        }

        let request = sync_request(&user, &credentials);
        if let Err(source) = self.sync.sync_user(&request).await {
            return Err(SignUpError::Sync {
                user,
                session,
                source,
            });
        }

        info!(user_id = %user.id, confirmed = session.is_some(), "User signed up");
        Ok(SignUpSuccess { user, session })
    }

    async fn sign_in(&self, email: &str, password: &str) -> IdentityResult<Session> {
        #[derive(Serialize)]
        struct PasswordGrant<'a> {
            email: &'a str,
            password: &'a str,
        }

        let req = self
            .request(Method::POST, "/token")
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password });

        let session: Session = self.execute(req).await.map_err(|e| {
            warn!(error = %e, "Identity provider sign-in failed");
            e
        })?;

        self.set_session(Some(session.clone()), AuthChangeEvent::SignedIn)
            .await;
        info!(user_id = %session.user.id, "User signed in");
        Ok(session)
    }

    async fn sign_out(&self) -> IdentityResult<()> {
        if let Some(session) = self.session().await {
            let req = self
                .request(Method::POST, "/logout")
                .bearer_auth(&session.access_token);

            match self.send(req).await {
                Ok(_) => {}
                // Token already expired or revoked
                Err(IdentityError::Provider { status, .. })
                    if status == StatusCode::UNAUTHORIZED.as_u16()
                        || status == StatusCode::NOT_FOUND.as_u16() =>
                {
                    debug!(status, "Session already gone at the provider");
                }
                Err(e) => {
                    warn!(error = %e, "Identity provider sign-out failed");
                    return Err(e);
                }
            }
        }

        self.set_session(None, AuthChangeEvent::SignedOut).await;
        Ok(())
    }

    async fn current_user(&self) -> IdentityResult<Option<ProviderUser>> {
        let Some(session) = self.session().await else {
            return Ok(None);
        };

        let req = self
            .request(Method::GET, "/user")
            .bearer_auth(&session.access_token);
        let user: ProviderUser = self.execute(req).await?;
        Ok(Some(user))
    }

    async fn subscribe(&self) -> AuthSubscription {
        // Subscribe before reading so no event falls between the two
        let receiver = self.events.subscribe();
        AuthSubscription::new(self.session().await, receiver)
    }
}
