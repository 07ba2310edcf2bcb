//! Local identity directory and the current-session lifecycle built on it.
//!
//! Both halves write through to the injected [`platform_host::LocalStore`] before touching their
//! in-memory copy, so a failed write never leaves memory ahead of durable storage.

mod credentials;
mod session;

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

pub use credentials::CredentialStore;
pub use session::SessionManager;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Declined or failed identity operations.
pub enum AuthError {
    /// Another identity already uses this normalized email.
    #[error("an account with this email already exists")]
    DuplicateEmail,
    /// Unknown email or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,
    /// A required input was blank.
    #[error("`{0}` must not be empty")]
    MissingField(&'static str),
    /// The durable store rejected the write; in-memory state is unchanged.
    #[error("local storage failure: {0}")]
    Storage(String),
}

/// Normalizes an email for comparison: surrounding whitespace removed, lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub(crate) fn require(value: &str, field: &'static str) -> Result<(), AuthError> {
    if value.trim().is_empty() {
        Err(AuthError::MissingField(field))
    } else {
        Ok(())
    }
}

fn password_digest(id: &str, password: &str) -> String {
    hex::encode(Sha256::digest(format!("{id}:{password}").as_bytes()))
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredIdentity")]
/// A registered user record as kept by the [`CredentialStore`].
pub struct Identity {
    /// Stable id assigned at registration (`user_<unix ms>`).
    pub id: String,
    /// Display name; not unique.
    pub username: String,
    /// Normalized email; unique across the store.
    pub email: String,
    password_digest: String,
}

impl Identity {
    pub(crate) fn new(id: String, username: &str, email: String, password: &str) -> Self {
        let password_digest = password_digest(&id, password);
        Self {
            id,
            username: username.trim().to_string(),
            email,
            password_digest,
        }
    }

    /// Returns `true` when `password` is exactly the registered password.
    pub fn verify_password(&self, password: &str) -> bool {
        !self.password_digest.is_empty()
            && password_digest(&self.id, password) == self.password_digest
    }

    /// Returns the projection of this identity that never carries the password.
    pub fn to_public(&self) -> PublicIdentity {
        PublicIdentity {
            id: self.id.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

// Older records kept the password in clear text under `password`.
#[derive(Deserialize)]
struct StoredIdentity {
    id: String,
    username: String,
    email: String,
    #[serde(default)]
    password_digest: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

impl From<StoredIdentity> for Identity {
    fn from(stored: StoredIdentity) -> Self {
        let password_digest = match (stored.password_digest, stored.password) {
            (Some(digest), _) => digest,
            (None, Some(password)) => password_digest(&stored.id, &password),
            (None, None) => String::new(),
        };
        Self {
            email: normalize_email(&stored.email),
            id: stored.id,
            username: stored.username,
            password_digest,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Identity fields safe to hold in a session, persist, or show to other users.
pub struct PublicIdentity {
    /// Stable identity id.
    pub id: String,
    /// Display name.
    pub username: String,
    /// Normalized email.
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// The current session. Authenticated exactly when an identity is present.
pub struct Session {
    identity: Option<PublicIdentity>,
}

impl Session {
    pub(crate) fn signed_in(identity: PublicIdentity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    /// Returns the signed-in identity, if any.
    pub fn identity(&self) -> Option<&PublicIdentity> {
        self.identity.as_ref()
    }

    /// Returns `true` when an identity is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  A@B.com "), "a@b.com");
    }

    #[test]
    fn password_verification_is_exact() {
        let identity = Identity::new("user_1".into(), "abc", "a@b.com".into(), "p1");
        assert!(identity.verify_password("p1"));
        assert!(!identity.verify_password("P1"));
        assert!(!identity.verify_password("p1 "));
    }

    #[test]
    fn serialized_identity_never_contains_clear_text_password() {
        let identity = Identity::new("user_1".into(), "abc", "a@b.com".into(), "hunter2");
        let raw = serde_json::to_string(&identity).expect("serialize");
        assert!(!raw.contains("hunter2"));
        let back: Identity = serde_json::from_str(&raw).expect("deserialize");
        assert_eq!(back, identity);
    }

    #[test]
    fn legacy_clear_text_records_still_verify() {
        let raw = r#"{"id":"user_7","username":"old","email":"Old@Example.com","password":"pw"}"#;
        let identity: Identity = serde_json::from_str(raw).expect("legacy record");
        assert_eq!(identity.email, "old@example.com");
        assert!(identity.verify_password("pw"));
    }

    #[test]
    fn records_without_any_secret_never_verify() {
        let raw = r#"{"id":"user_8","username":"x","email":"x@y.z"}"#;
        let identity: Identity = serde_json::from_str(raw).expect("record");
        assert!(!identity.verify_password(""));
    }

    #[test]
    fn debug_output_hides_the_digest() {
        let identity = Identity::new("user_1".into(), "abc", "a@b.com".into(), "p1");
        assert!(!format!("{identity:?}").contains(&password_digest("user_1", "p1")));
    }
}
