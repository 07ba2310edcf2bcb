use std::rc::Rc;

use leptos::logging;
use platform_host::{
    load_record_with, next_monotonic_timestamp_ms, save_record_with, LocalRecordError, LocalStore,
};
use serde_json::Value;

use super::{normalize_email, require, AuthError, Identity, PublicIdentity};
use crate::persistence::IDENTITIES_KEY;

/// Durable directory of registered identities, keyed by normalized email.
pub struct CredentialStore {
    store: Rc<dyn LocalStore>,
    identities: Vec<Identity>,
}

impl CredentialStore {
    /// Loads the identity list from `store`.
    ///
    /// A missing, unreadable, or non-array record yields an empty directory. Entries that do not
    /// decode as identities are skipped and the rest are kept.
    pub fn load(store: Rc<dyn LocalStore>) -> Self {
        let entries = match load_record_with::<_, Vec<Value>>(store.as_ref(), IDENTITIES_KEY) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(LocalRecordError::Malformed { key, message }) => {
                logging::warn!("discarding malformed identity list `{key}`: {message}");
                Vec::new()
            }
            Err(err) => {
                logging::warn!("identity list load failed: {err}");
                Vec::new()
            }
        };
        let identities = entries
            .into_iter()
            .enumerate()
            .filter_map(|(index, entry)| match serde_json::from_value::<Identity>(entry) {
                Ok(identity) => Some(identity),
                Err(err) => {
                    logging::warn!("skipping identity entry {index}: {err}");
                    None
                }
            })
            .collect();
        Self { store, identities }
    }

    /// Creates and persists a new identity.
    ///
    /// # Errors
    ///
    /// [`AuthError::MissingField`] for blank input, [`AuthError::DuplicateEmail`] when the
    /// normalized email is taken, [`AuthError::Storage`] when the write fails. The directory is
    /// unchanged on every error.
    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<Identity, AuthError> {
        require(username, "username")?;
        require(email, "email")?;
        require(password, "password")?;

        let email = normalize_email(email);
        if self.find_by_email(&email).is_some() {
            return Err(AuthError::DuplicateEmail);
        }

        let id = format!("user_{}", next_monotonic_timestamp_ms());
        let identity = Identity::new(id, username, email, password);

        let mut next = self.identities.clone();
        next.push(identity.clone());
        save_record_with(self.store.as_ref(), IDENTITIES_KEY, &next).map_err(AuthError::Storage)?;
        self.identities = next;
        Ok(identity)
    }

    /// Looks up an identity by email (normalized before comparison).
    pub fn find_by_email(&self, email: &str) -> Option<&Identity> {
        let email = normalize_email(email);
        self.identities.iter().find(|identity| identity.email == email)
    }

    /// Returns identities whose username or email contains `term`, ignoring case.
    ///
    /// A blank term matches nothing.
    pub fn search(&self, term: &str) -> Vec<PublicIdentity> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }
        self.identities
            .iter()
            .filter(|identity| {
                identity.username.to_lowercase().contains(&term) || identity.email.contains(&term)
            })
            .map(Identity::to_public)
            .collect()
    }

    /// Number of registered identities.
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Returns `true` when nobody is registered.
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub(super) fn forget_all(&mut self) {
        self.identities.clear();
    }
}
