//! User domain entity and sync types.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{MSG_SYNC_CONFLICT, ROLE_CANDIDATE, ROLE_RECRUITER};
use crate::error::{DomainError, DomainResult};

/// User roles enumeration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    #[default]
    Candidate,
    Recruiter,
}

impl UserRole {
    /// Wire and storage name of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Candidate => ROLE_CANDIDATE,
            UserRole::Recruiter => ROLE_RECRUITER,
        }
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_CANDIDATE => Ok(UserRole::Candidate),
            ROLE_RECRUITER => Ok(UserRole::Recruiter),
            other => Err(DomainError::validation(format!("Invalid role: {}", other))),
        }
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Local user record.
///
/// `id` is the identity provider's subject id, never generated locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user record from a sync request
    pub fn from_sync(sync: SyncUser) -> Self {
        let now = Utc::now();
        Self {
            id: sync.id,
            email: sync.email,
            name: sync.name,
            role: sync.role.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Identity pushed by the identity provider side for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncUser {
    /// Identity provider subject id
    pub id: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl SyncUser {
    /// Build a sync request, rejecting a blank id or email.
    pub fn new(
        id: impl Into<String>,
        email: impl Into<String>,
        name: Option<String>,
        role: Option<UserRole>,
    ) -> DomainResult<Self> {
        let id = id.into();
        let email = email.into();
        if id.trim().is_empty() || email.trim().is_empty() {
            return Err(DomainError::validation(crate::MSG_MISSING_ID_OR_EMAIL));
        }
        Ok(Self {
            id,
            email,
            name,
            role,
        })
    }

    /// Whether `existing` is exactly this identity.
    pub fn matches(&self, existing: &User) -> bool {
        existing.id == self.id && existing.email == self.email
    }

    /// Decide what to do with a record found by id or email.
    ///
    /// An exact match is in sync; anything else is a conflict. Email changes
    /// for a known subject id land here too.
    pub fn reconcile(&self, existing: &User) -> DomainResult<()> {
        if self.matches(existing) {
            Ok(())
        } else {
            Err(DomainError::conflict(MSG_SYNC_CONFLICT))
        }
    }
}

/// Result of a successful sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Record already present with the same id and email; nothing written
    AlreadyInSync(User),
    /// New record created
    Created(User),
}

impl SyncOutcome {
    /// The local record after the sync
    pub fn user(&self) -> &User {
        match self {
            SyncOutcome::AlreadyInSync(user) | SyncOutcome::Created(user) => user,
        }
    }

    /// Whether this sync wrote a record
    pub fn is_created(&self) -> bool {
        matches!(self, SyncOutcome::Created(_))
    }

    /// Human readable description returned to the caller
    pub fn message(&self) -> &'static str {
        match self {
            SyncOutcome::AlreadyInSync(_) => crate::MSG_ALREADY_IN_SYNC,
            SyncOutcome::Created(_) => crate::MSG_SYNCED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, email: &str) -> User {
        User::from_sync(SyncUser::new(id, email, None, None).unwrap())
    }

    #[test]
    fn role_wire_names() {
        assert_eq!(
            serde_json::to_string(&UserRole::Recruiter).unwrap(),
            "\"RECRUITER\""
        );
        assert_eq!(
            serde_json::from_str::<UserRole>("\"CANDIDATE\"").unwrap(),
            UserRole::Candidate
        );
        assert!(serde_json::from_str::<UserRole>("\"ADMIN\"").is_err());
        assert_eq!("RECRUITER".parse::<UserRole>().unwrap(), UserRole::Recruiter);
        assert!("recruiter".parse::<UserRole>().is_err());
    }

    #[test]
    fn new_user_defaults_to_candidate() {
        let created = user("sub-1", "a@x.com");
        assert_eq!(created.role, UserRole::Candidate);
        assert_eq!(created.created_at, created.updated_at);
    }

    #[test]
    fn blank_id_or_email_is_rejected() {
        assert!(matches!(
            SyncUser::new("", "a@x.com", None, None),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            SyncUser::new("sub-1", "  ", None, None),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn reconcile_accepts_exact_match_only() {
        let existing = user("sub-1", "a@x.com");

        let same = SyncUser::new("sub-1", "a@x.com", Some("Ana".into()), None).unwrap();
        assert!(same.reconcile(&existing).is_ok());

        let new_email = SyncUser::new("sub-1", "b@x.com", None, None).unwrap();
        assert_eq!(
            new_email.reconcile(&existing),
            Err(DomainError::conflict(MSG_SYNC_CONFLICT))
        );

        let new_id = SyncUser::new("sub-2", "a@x.com", None, None).unwrap();
        assert!(new_id.reconcile(&existing).is_err());
    }

    #[test]
    fn sync_user_omits_absent_optionals() {
        let sync = SyncUser::new("sub-1", "a@x.com", None, None).unwrap();
        let json = serde_json::to_value(&sync).unwrap();
        assert_eq!(json, serde_json::json!({"id": "sub-1", "email": "a@x.com"}));
    }
}
