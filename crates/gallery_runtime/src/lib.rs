//! Photo-feed runtime: local identities and sessions, the object-store backed gallery reducer,
//! its effect runner, and the Leptos provider wiring both into a page.

pub mod config;
pub mod controller;
pub mod effect_executor;
pub mod effects;
pub mod identity;
pub mod likes;
pub mod model;
pub mod overlay;
pub mod persistence;
pub mod reducer;
pub mod runtime_context;
pub mod view;

pub use config::{normalize_prefix, ConfigError, GalleryConfig, DEFAULT_PREFIX};
pub use controller::GalleryController;
pub use effects::run_gallery_effect;
pub use identity::{
    normalize_email, AuthError, CredentialStore, Identity, PublicIdentity, Session,
    SessionManager,
};
pub use likes::{LikeCache, LikeState};
pub use model::*;
pub use overlay::Overlay;
pub use reducer::{reduce_gallery, GalleryAction, GalleryEffect, GalleryError};
pub use runtime_context::{use_gallery_runtime, GalleryProvider, GalleryRuntimeContext};
pub use view::{gallery_view, GalleryItem, GalleryView};
