use std::rc::Rc;

use leptos::logging;
use platform_host::{load_record_with, save_record_with, LocalRecordError, LocalStore};

use super::{require, AuthError, CredentialStore, PublicIdentity, Session};
use crate::persistence::SESSION_KEY;

/// Owns the current [`Session`] and the [`CredentialStore`] it authenticates against.
pub struct SessionManager {
    store: Rc<dyn LocalStore>,
    credentials: CredentialStore,
    session: Session,
}

impl SessionManager {
    /// Loads the identity directory. The session starts empty until [`Self::restore`] runs.
    pub fn new(store: Rc<dyn LocalStore>) -> Self {
        Self {
            credentials: CredentialStore::load(store.clone()),
            store,
            session: Session::default(),
        }
    }

    /// Returns the current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Returns the identity directory.
    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Restores the persisted session projection, if any.
    ///
    /// A malformed projection is discarded and removed; this never fails the caller.
    pub fn restore(&mut self) -> &Session {
        self.session = match load_record_with::<_, PublicIdentity>(self.store.as_ref(), SESSION_KEY)
        {
            Ok(Some(identity)) => Session::signed_in(identity),
            Ok(None) => Session::default(),
            Err(LocalRecordError::Malformed { key, message }) => {
                logging::warn!("discarding malformed session `{key}`: {message}");
                if let Err(err) = self.store.remove_item(SESSION_KEY) {
                    logging::warn!("failed to remove malformed session: {err}");
                }
                Session::default()
            }
            Err(err) => {
                logging::warn!("session restore failed: {err}");
                Session::default()
            }
        };
        &self.session
    }

    /// Signs in with an email (normalized) and the exact password.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for an unknown email or wrong password, in which case the
    /// current session is untouched.
    pub fn login(&mut self, email: &str, password: &str) -> Result<PublicIdentity, AuthError> {
        require(email, "email")?;
        require(password, "password")?;

        let identity = self
            .credentials
            .find_by_email(email)
            .filter(|identity| identity.verify_password(password))
            .ok_or(AuthError::InvalidCredentials)?
            .to_public();
        self.establish(identity.clone())?;
        logging::log!("signed in as {}", identity.email);
        Ok(identity)
    }

    /// Registers a new identity and signs it in.
    ///
    /// # Errors
    ///
    /// Propagates [`CredentialStore::register`] errors with the session untouched. If the identity
    /// is stored but the session write fails, the identity stays registered and
    /// [`AuthError::Storage`] is returned.
    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<PublicIdentity, AuthError> {
        let identity = self
            .credentials
            .register(username, email, password)?
            .to_public();
        self.establish(identity.clone())?;
        logging::log!("registered {}", identity.email);
        Ok(identity)
    }

    /// Clears the session and its persisted projection. Calling it while signed out succeeds.
    ///
    /// # Errors
    ///
    /// [`AuthError::Storage`] when the projection cannot be removed; the session is kept.
    pub fn logout(&mut self) -> Result<(), AuthError> {
        self.store
            .remove_item(SESSION_KEY)
            .map_err(AuthError::Storage)?;
        self.session = Session::default();
        Ok(())
    }

    /// Wipes every local record (identities and session). Irreversible.
    ///
    /// # Errors
    ///
    /// [`AuthError::Storage`] when the store cannot be cleared; memory is kept as it was.
    pub fn reset_all(&mut self) -> Result<(), AuthError> {
        self.store.clear().map_err(AuthError::Storage)?;
        self.credentials.forget_all();
        self.session = Session::default();
        logging::warn!("local identity store reset");
        Ok(())
    }

    /// Searches the identity directory; see [`CredentialStore::search`].
    pub fn search_identities(&self, term: &str) -> Vec<PublicIdentity> {
        self.credentials.search(term)
    }

    fn establish(&mut self, identity: PublicIdentity) -> Result<(), AuthError> {
        save_record_with(self.store.as_ref(), SESSION_KEY, &identity)
            .map_err(AuthError::Storage)?;
        self.session = Session::signed_in(identity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use platform_host::MemoryLocalStore;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::persistence::IDENTITIES_KEY;

    fn manager() -> (MemoryLocalStore, SessionManager) {
        let store = MemoryLocalStore::default();
        let manager = SessionManager::new(Rc::new(store.clone()));
        (store, manager)
    }

    #[test]
    fn register_then_login_with_normalized_email() {
        let (_, mut sessions) = manager();
        sessions.register("abc", "A@B.com ", "p1").expect("register");
        sessions.logout().expect("logout");

        let identity = sessions.login("a@b.com", "p1").expect("login");
        assert_eq!(identity.username, "abc");
        assert!(sessions.session().is_authenticated());

        sessions.logout().expect("logout");
        assert_eq!(
            sessions.login("a@b.com", "wrong"),
            Err(AuthError::InvalidCredentials)
        );
        assert!(!sessions.session().is_authenticated());
    }

    #[test]
    fn unknown_email_is_invalid_credentials() {
        let (_, mut sessions) = manager();
        assert_eq!(
            sessions.login("nobody@x.y", "p"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn persisted_projection_has_no_password() {
        let (store, mut sessions) = manager();
        sessions.register("abc", "a@b.com", "secret-pw").expect("register");

        let raw = store
            .get_item(SESSION_KEY)
            .expect("read")
            .expect("session persisted");
        let value: serde_json::Value = serde_json::from_str(&raw).expect("json");
        assert!(value.get("password").is_none());
        assert!(value.get("password_digest").is_none());
        assert!(!raw.contains("secret-pw"));
    }

    #[test]
    fn duplicate_registration_keeps_current_session() {
        let (_, mut sessions) = manager();
        let first = sessions.register("abc", "a@b.com", "p1").expect("register");
        assert_eq!(
            sessions.register("again", "A@b.com", "p2"),
            Err(AuthError::DuplicateEmail)
        );
        assert_eq!(sessions.session().identity(), Some(&first));
    }

    #[test]
    fn restore_picks_up_previous_session() {
        let (store, mut sessions) = manager();
        let identity = sessions.register("abc", "a@b.com", "p1").expect("register");

        let mut restored = SessionManager::new(Rc::new(store));
        assert!(!restored.session().is_authenticated());
        assert_eq!(restored.restore().identity(), Some(&identity));
    }

    #[test]
    fn malformed_session_is_discarded_on_restore() {
        let store = MemoryLocalStore::default();
        store.set_item(SESSION_KEY, "[1, 2").expect("seed");
        let mut sessions = SessionManager::new(Rc::new(store.clone()));

        assert!(!sessions.restore().is_authenticated());
        assert_eq!(store.get_item(SESSION_KEY).expect("read"), None);
    }

    #[test]
    fn logout_is_idempotent() {
        let (store, mut sessions) = manager();
        sessions.register("abc", "a@b.com", "p1").expect("register");
        sessions.logout().expect("first logout");
        sessions.logout().expect("second logout");
        assert!(!sessions.session().is_authenticated());
        assert_eq!(store.get_item(SESSION_KEY).expect("read"), None);
    }

    #[test]
    fn failed_session_write_leaves_session_empty() {
        let (store, mut sessions) = manager();
        sessions.register("abc", "a@b.com", "p1").expect("register");
        sessions.logout().expect("logout");

        store.set_read_only(true);
        let err = sessions.login("a@b.com", "p1").expect_err("read-only");
        assert!(matches!(err, AuthError::Storage(_)));
        assert!(!sessions.session().is_authenticated());
    }

    #[test]
    fn failed_logout_keeps_session() {
        let (store, mut sessions) = manager();
        sessions.register("abc", "a@b.com", "p1").expect("register");
        store.set_read_only(true);
        assert!(sessions.logout().is_err());
        assert!(sessions.session().is_authenticated());
    }

    #[test]
    fn reset_all_wipes_identities_and_session() {
        let (store, mut sessions) = manager();
        sessions.register("abc", "a@b.com", "p1").expect("register");
        sessions.reset_all().expect("reset");

        assert!(!sessions.session().is_authenticated());
        assert!(sessions.credentials().is_empty());
        assert!(store.get_item(IDENTITIES_KEY).expect("read").is_none());
        assert_eq!(
            sessions.login("a@b.com", "p1"),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn blank_login_input_is_declined() {
        let (_, mut sessions) = manager();
        assert_eq!(
            sessions.login(" ", "p"),
            Err(AuthError::MissingField("email"))
        );
        assert_eq!(
            sessions.login("a@b.com", ""),
            Err(AuthError::MissingField("password"))
        );
    }
}
