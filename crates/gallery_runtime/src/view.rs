//! Read-only projection of gallery state for the presentation layer.

use crate::{
    identity::{PublicIdentity, Session},
    likes::LikeState,
    model::{GalleryActivity, GalleryState, MediaKind, Notice},
    overlay::Overlay,
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// One rendered feed entry.
pub struct GalleryItem {
    /// Object key.
    pub key: String,
    /// Key without the prefix.
    pub display_name: String,
    /// Display name without the upload timestamp.
    pub caption: String,
    /// Public object URL.
    pub url: String,
    /// Image or link.
    pub kind: MediaKind,
    /// Like counter.
    pub like: LikeState,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Everything a feed page renders.
pub struct GalleryView {
    /// Signed-in identity; `None` means the feed is locked.
    pub owner: Option<PublicIdentity>,
    /// Feed entries, newest first.
    pub items: Vec<GalleryItem>,
    /// Number of posts in the snapshot.
    pub post_count: usize,
    /// Operation in flight.
    pub activity: GalleryActivity,
    /// Visible overlay.
    pub overlay: Overlay,
    /// Notice awaiting dismissal.
    pub notice: Option<Notice>,
    /// Name of the file selected for upload.
    pub pending_file_name: Option<String>,
    /// Entry shown in the image viewer.
    pub viewer: Option<GalleryItem>,
}

impl GalleryView {
    /// Returns `true` while a mutating operation is in flight.
    pub fn is_busy(&self) -> bool {
        self.activity.is_busy()
    }
}

/// Projects `state` for rendering. Signed-out sessions get an empty, overlay-free view.
pub fn gallery_view(state: &GalleryState, session: &Session) -> GalleryView {
    let Some(owner) = session.identity() else {
        return GalleryView::default();
    };

    let prefix = state.prefix();
    let items: Vec<GalleryItem> = state
        .snapshot
        .iter()
        .map(|object| GalleryItem {
            key: object.key.clone(),
            display_name: object.display_name(prefix).to_string(),
            caption: object.caption(prefix).to_string(),
            url: state.config.object_url(&object.key),
            kind: object.media_kind(),
            like: state.likes.get(&object.key).unwrap_or_default(),
        })
        .collect();
    let viewer = state
        .overlay
        .viewer_key()
        .and_then(|key| items.iter().find(|item| item.key == key).cloned());

    GalleryView {
        owner: Some(owner.clone()),
        post_count: items.len(),
        items,
        activity: state.activity,
        overlay: state.overlay.clone(),
        notice: state.notice.clone(),
        pending_file_name: state.pending_upload.as_ref().map(|file| file.name.clone()),
        viewer,
    }
}

#[cfg(test)]
mod tests {
    use platform_host::ObjectStoreConfig;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        config::GalleryConfig,
        likes::LikeCache,
        model::MediaObject,
        reducer::{reduce_gallery, GalleryAction},
    };

    fn loaded_state() -> GalleryState {
        let config = GalleryConfig::new(
            ObjectStoreConfig {
                bucket: "photos".into(),
                region: "us-west-2".into(),
                storage_host: None,
                access_key_id: String::new(),
                secret_access_key: String::new(),
            },
            None,
        )
        .expect("config");
        let mut state = GalleryState::with_likes(config, LikeCache::with_seed(5));
        reduce_gallery(&mut state, GalleryAction::RefreshRequested).expect("refresh");
        reduce_gallery(
            &mut state,
            GalleryAction::ListingLoaded {
                objects: vec![
                    MediaObject::new("uploads/1_old.txt", 1),
                    MediaObject::new("uploads/2_new.jpg", 2),
                ],
            },
        )
        .expect("loaded");
        reduce_gallery(
            &mut state,
            GalleryAction::OpenImageViewer {
                key: "uploads/2_new.jpg".into(),
            },
        )
        .expect("viewer");
        state
    }

    fn signed_in() -> Session {
        Session::signed_in(PublicIdentity {
            id: "user_1".into(),
            username: "abc".into(),
            email: "a@b.com".into(),
        })
    }

    #[test]
    fn signed_out_view_is_empty() {
        let view = gallery_view(&loaded_state(), &Session::default());
        assert_eq!(view, GalleryView::default());
    }

    #[test]
    fn signed_in_view_projects_items_and_viewer() {
        let state = loaded_state();
        let view = gallery_view(&state, &signed_in());

        assert_eq!(view.post_count, 2);
        assert_eq!(view.items[0].caption, "new.jpg");
        assert_eq!(view.items[0].kind, MediaKind::Image);
        assert_eq!(
            view.items[0].url,
            "https://photos.s3.us-west-2.amazonaws.com/uploads/2_new.jpg"
        );
        assert_eq!(view.items[1].kind, MediaKind::Link);
        assert_eq!(view.items[1].display_name, "1_old.txt");
        assert_eq!(
            view.viewer.as_ref().map(|item| item.key.as_str()),
            Some("uploads/2_new.jpg")
        );
        assert_eq!(
            view.items[0].like,
            state.likes.get("uploads/2_new.jpg").expect("seeded")
        );
        assert!(!view.is_busy());
    }
}
