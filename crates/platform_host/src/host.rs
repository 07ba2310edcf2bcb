//! Shared host-bundle model for browser and headless runtime composition.

use std::rc::Rc;

use crate::{
    DialogService, LocalStore, MemoryLocalStore, MemoryObjectStore, ObjectStoreService,
    ScriptedDialogService,
};

/// Stable host strategy selected for the current build/runtime composition path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostStrategy {
    /// Browser-backed runtime composition.
    Browser,
    /// In-process adapters with no durable or remote side effects.
    InMemory,
}

impl HostStrategy {
    /// Returns a stable string token for diagnostics.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Browser => "browser",
            Self::InMemory => "in-memory",
        }
    }
}

/// Runtime-selected host service bundle injected into the gallery runtime.
///
/// All environment-specific service selection happens before this bundle crosses into
/// `gallery_runtime`, which keeps the runtime decoupled from browser adapter details.
#[derive(Clone)]
pub struct HostServices {
    /// Durable local record store (identities and the session projection).
    pub local_store: Rc<dyn LocalStore>,
    /// Remote bucket holding the gallery objects.
    pub object_store: Rc<dyn ObjectStoreService>,
    /// Confirmation prompts and user-visible notices.
    pub dialogs: Rc<dyn DialogService>,
    /// Stable strategy identifier for diagnostics.
    pub host_strategy: HostStrategy,
}

impl HostServices {
    /// Builds an in-memory bundle from concrete adapters the caller keeps handles to.
    pub fn in_memory(
        local_store: MemoryLocalStore,
        object_store: MemoryObjectStore,
        dialogs: ScriptedDialogService,
    ) -> Self {
        Self {
            local_store: Rc::new(local_store),
            object_store: Rc::new(object_store),
            dialogs: Rc::new(dialogs),
            host_strategy: HostStrategy::InMemory,
        }
    }
}

impl std::fmt::Debug for HostServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostServices")
            .field("host_strategy", &self.host_strategy)
            .finish_non_exhaustive()
    }
}
