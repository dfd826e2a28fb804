//! Identity provider wire types.

use serde::{Deserialize, Serialize};
use validator::Validate;

use domain::UserRole;

/// Profile data stored with the provider user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Raw role string; the provider does not validate it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// User as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderUser {
    /// Subject id
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: UserMetadata,
}

/// Access and refresh tokens plus the user they belong to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub expires_at: Option<u64>,
    pub refresh_token: String,
    pub user: ProviderUser,
}

/// Sign-up body shapes.
///
/// Auto-confirmed projects answer with a session, others with the bare user.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum SignUpResponse {
    Session(Session),
    User(ProviderUser),
    Wrapped {
        #[serde(default)]
        user: Option<ProviderUser>,
        #[serde(default)]
        session: Option<Session>,
    },
}

impl SignUpResponse {
    /// The created user and the session, when one was issued.
    pub(crate) fn into_parts(self) -> Option<(ProviderUser, Option<Session>)> {
        match self {
            SignUpResponse::Session(session) => Some((session.user.clone(), Some(session))),
            SignUpResponse::User(user) => Some((user, None)),
            SignUpResponse::Wrapped {
                user: Some(user),
                session,
            } => Some((user, session)),
            SignUpResponse::Wrapped {
                user: None,
                session: Some(session),
            } => Some((session.user.clone(), Some(session))),
            SignUpResponse::Wrapped {
                user: None,
                session: None,
            } => None,
        }
    }
}

/// Auth lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeEvent {
    /// First event of every subscription, with the session held at that time
    InitialSession,
    SignedIn,
    SignedOut,
}

/// Event fanned out to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthStateChange {
    pub event: AuthChangeEvent,
    pub session: Option<Session>,
}

/// Sign-up form input.
#[derive(Clone, Validate)]
pub struct SignUpCredentials {
    #[validate(email(message = "Correo electrónico inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,
    pub name: Option<String>,
    /// Requested role, CANDIDATE when absent
    pub role: Option<UserRole>,
}

impl SignUpCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            name: None,
            role: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = Some(role);
        self
    }
}

impl std::fmt::Debug for SignUpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpCredentials")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("name", &self.name)
            .field("role", &self.role)
            .finish()
    }
}

/// Successful sign-up. `session` is absent while email confirmation is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpSuccess {
    pub user: ProviderUser,
    pub session: Option<Session>,
}

/// Sync endpoint answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub message: String,
    pub user_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_json() -> serde_json::Value {
        json!({
            "id": "sub-1",
            "aud": "authenticated",
            "email": "ana@example.com",
            "user_metadata": {"name": "Ana", "role": "RECRUITER", "email_verified": false}
        })
    }

    #[test]
    fn pending_confirmation_is_a_bare_user() {
        let body: SignUpResponse = serde_json::from_value(user_json()).unwrap();
        let (user, session) = body.into_parts().unwrap();
        assert_eq!(user.id, "sub-1");
        assert_eq!(user.user_metadata.role.as_deref(), Some("RECRUITER"));
        assert!(session.is_none());
    }

    #[test]
    fn auto_confirm_carries_a_session() {
        let body: SignUpResponse = serde_json::from_value(json!({
            "access_token": "at",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1700000000u64,
            "refresh_token": "rt",
            "user": user_json()
        }))
        .unwrap();
        let (user, session) = body.into_parts().unwrap();
        assert_eq!(user.email.as_deref(), Some("ana@example.com"));
        assert_eq!(session.unwrap().access_token, "at");
    }

    #[test]
    fn empty_body_has_no_user() {
        let body: SignUpResponse = serde_json::from_value(json!({})).unwrap();
        assert!(body.into_parts().is_none());

        let body: SignUpResponse =
            serde_json::from_value(json!({"user": null, "session": null})).unwrap();
        assert!(body.into_parts().is_none());
    }

    #[test]
    fn short_password_is_rejected() {
        let credentials = SignUpCredentials::new("a@x.com", "12345");
        let errors = credentials.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("password"));
        assert!(!format!("{:?}", credentials).contains("12345"));
    }
}
