//! Runtime provider and context wiring for the photo feed.
//!
//! This module owns the long-lived reducer container, the effect queue, and the session manager
//! shared by every view under [`GalleryProvider`]. Rendering stays with the embedding site.
#![allow(clippy::clone_on_copy)]

use std::{cell::RefCell, rc::Rc};

use leptos::*;
use platform_host::{next_monotonic_timestamp_ms, HostServices};

use crate::{
    config::GalleryConfig,
    effect_executor,
    identity::{AuthError, PublicIdentity, Session, SessionManager},
    model::GalleryState,
    reducer::{reduce_gallery, GalleryAction, GalleryEffect},
    view::{gallery_view, GalleryView},
};

#[derive(Clone, Copy)]
/// Leptos context for reading gallery/session state and dispatching [`GalleryAction`] values.
pub struct GalleryRuntimeContext {
    /// Host service bundle effects run against.
    pub host: StoredValue<HostServices>,
    /// Reactive gallery state.
    pub state: RwSignal<GalleryState>,
    /// Reactive session state, mirrored from the session manager after every change.
    pub session: RwSignal<Session>,
    /// Identity directory and session lifecycle.
    pub sessions: StoredValue<Rc<RefCell<SessionManager>>>,
    /// Queue of effects emitted by the reducer and drained by [`effect_executor::install`].
    pub effects: RwSignal<Vec<GalleryEffect>>,
    /// Reducer dispatch callback.
    pub dispatch: Callback<GalleryAction>,
}

impl GalleryRuntimeContext {
    /// Builds the runtime and restores any persisted session.
    ///
    /// Must run inside a reactive owner; the executor is not installed here.
    pub fn new(host_services: HostServices, config: GalleryConfig) -> Self {
        let mut manager = SessionManager::new(host_services.local_store.clone());
        let restored = manager.restore().clone();

        let host = store_value(host_services);
        let state = create_rw_signal(GalleryState::new(config));
        let session = create_rw_signal(restored);
        let sessions = store_value(Rc::new(RefCell::new(manager)));
        let effects = create_rw_signal(Vec::<GalleryEffect>::new());

        let dispatch = Callback::new(move |action: GalleryAction| {
            let mut gallery = state.get_untracked();
            let previous = gallery.clone();

            match reduce_gallery(&mut gallery, action) {
                Ok(new_effects) => {
                    if gallery != previous {
                        state.set(gallery);
                    }
                    if !new_effects.is_empty() {
                        let mut queue = effects.get_untracked();
                        queue.extend(new_effects);
                        effects.set(queue);
                    }
                }
                Err(err) => logging::warn!("gallery reducer error: {err}"),
            }
        });

        Self {
            host,
            state,
            session,
            sessions,
            effects,
            dispatch,
        }
    }

    /// Dispatches a reducer action through the runtime context callback.
    pub fn dispatch_action(&self, action: GalleryAction) {
        self.dispatch.call(action);
    }

    /// Uploads the selected file under a fresh timestamped key.
    pub fn upload(&self) {
        self.dispatch_action(GalleryAction::ConfirmUpload {
            now_ms: next_monotonic_timestamp_ms(),
        });
    }

    /// Reactive feed projection, empty while signed out.
    pub fn view(&self) -> GalleryView {
        self.session
            .with(|session| self.state.with(|state| gallery_view(state, session)))
    }

    /// Signs in and loads the feed.
    pub fn login(&self, email: &str, password: &str) -> Result<PublicIdentity, AuthError> {
        let identity = self.with_sessions(|manager| manager.login(email, password))?;
        self.dispatch_action(GalleryAction::RefreshRequested);
        Ok(identity)
    }

    /// Registers, signs in, and loads the feed.
    pub fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<PublicIdentity, AuthError> {
        let identity =
            self.with_sessions(|manager| manager.register(username, email, password))?;
        self.dispatch_action(GalleryAction::RefreshRequested);
        Ok(identity)
    }

    /// Signs out. The feed view locks immediately and per-user overlays are dropped.
    pub fn logout(&self) -> Result<(), AuthError> {
        self.with_sessions(SessionManager::logout)?;
        self.dispatch_action(GalleryAction::SessionEnded);
        Ok(())
    }

    /// Wipes every local identity and the session.
    pub fn reset_all(&self) -> Result<(), AuthError> {
        self.with_sessions(SessionManager::reset_all)?;
        self.dispatch_action(GalleryAction::SessionEnded);
        Ok(())
    }

    /// Searches registered identities by username or email.
    pub fn search_identities(&self, term: &str) -> Vec<PublicIdentity> {
        self.sessions
            .get_value()
            .borrow()
            .search_identities(term)
    }

    fn with_sessions<T>(
        &self,
        op: impl FnOnce(&mut SessionManager) -> Result<T, AuthError>,
    ) -> Result<T, AuthError> {
        let manager = self.sessions.get_value();
        let mut manager = manager.borrow_mut();
        let result = op(&mut manager);
        let current = manager.session().clone();
        drop(manager);

        if self.session.get_untracked() != current {
            self.session.set(current);
        }
        if let Err(err) = &result {
            logging::warn!("session operation declined: {err}");
        }
        result
    }
}

#[component]
/// Provides [`GalleryRuntimeContext`] to descendant components and loads the feed for a restored
/// session.
pub fn GalleryProvider(
    /// Injected browser or in-memory host bundle assembled by the entry layer.
    host_services: HostServices,
    /// Bucket settings and key prefix.
    config: GalleryConfig,
    children: Children,
) -> impl IntoView {
    let runtime = GalleryRuntimeContext::new(host_services, config);

    provide_context(runtime.clone());

    effect_executor::install(runtime);
    if runtime.session.get_untracked().is_authenticated() {
        runtime.dispatch_action(GalleryAction::RefreshRequested);
    }

    children().into_view()
}

/// Returns the current [`GalleryRuntimeContext`].
///
/// # Panics
///
/// Panics if called outside [`GalleryProvider`].
pub fn use_gallery_runtime() -> GalleryRuntimeContext {
    use_context::<GalleryRuntimeContext>().expect("GalleryRuntimeContext not provided")
}
