//! Reducer actions, side-effect intents, and transition logic for the gallery.

use std::collections::HashMap;

use platform_host::{PutObjectRequest, SelectedFile};
use thiserror::Error;

use crate::{
    model::{GalleryActivity, GalleryState, MediaObject, Notice},
    overlay::Overlay,
};

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";
const EDIT_UNAVAILABLE: &str = "Editing posts is not available yet.";

#[derive(Debug, Clone, PartialEq)]
/// Actions accepted by [`reduce_gallery`].
pub enum GalleryAction {
    /// Start a listing refresh.
    RefreshRequested,
    /// A listing finished.
    ListingLoaded {
        /// Objects as returned by the store, in any order.
        objects: Vec<MediaObject>,
    },
    /// A listing failed.
    ListingFailed {
        /// Store error.
        message: String,
    },
    /// Remember the file picked for the next upload.
    SelectFile(SelectedFile),
    /// Show the upload dialog.
    OpenUploadDialog,
    /// Close the upload dialog and forget the selected file.
    CancelUpload,
    /// Upload the selected file.
    ConfirmUpload {
        /// Timestamp embedded in the new key.
        now_ms: u64,
    },
    /// The upload finished.
    UploadCompleted {
        /// Key written.
        key: String,
    },
    /// The upload failed.
    UploadFailed {
        /// Store error.
        message: String,
    },
    /// Show the context menu for a key.
    OpenContextMenu {
        /// Object key.
        key: String,
    },
    /// "Delete" chosen in the context menu.
    RequestDelete {
        /// Object key.
        key: String,
    },
    /// The user confirmed the delete prompt.
    ConfirmDelete {
        /// Object key.
        key: String,
    },
    /// The user declined the delete prompt.
    CancelDelete {
        /// Object key.
        key: String,
    },
    /// The delete finished.
    DeleteCompleted {
        /// Object key.
        key: String,
    },
    /// The delete failed.
    DeleteFailed {
        /// Object key.
        key: String,
        /// Store error.
        message: String,
    },
    /// "Edit" chosen in the context menu.
    RequestEdit {
        /// Object key.
        key: String,
    },
    /// Show the image viewer for a key.
    OpenImageViewer {
        /// Object key.
        key: String,
    },
    /// Flip the like state of a key.
    ToggleLike {
        /// Object key.
        key: String,
    },
    /// Close whichever overlay is open.
    CloseOverlay,
    /// Clear the current notice.
    DismissNotice,
    /// The signed-in identity left; drop per-user view state.
    SessionEnded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Side-effect intents emitted by [`reduce_gallery`] for the host layer to execute.
pub enum GalleryEffect {
    /// List every object under the prefix.
    ListObjects {
        /// Key prefix.
        prefix: String,
    },
    /// Write one object.
    PutObject(PutObjectRequest),
    /// Delete one object.
    DeleteObject {
        /// Object key.
        key: String,
    },
    /// Ask the user to confirm a delete.
    PromptDelete {
        /// Object key.
        key: String,
        /// Prompt text.
        message: String,
    },
    /// Show a notice to the user.
    Announce(Notice),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Rejected gallery actions and store failures.
pub enum GalleryError {
    /// Another mutating operation is in flight.
    #[error("gallery is busy ({0})")]
    Busy(GalleryActivity),
    /// Upload confirmed without a selected file.
    #[error("no file selected")]
    NoFileSelected,
    /// Delete or edit requested without the context menu open on that key.
    #[error("context menu is not open for `{0}`")]
    ContextMenuNotOpen(String),
    /// Delete confirmation arrived for a key that is not awaiting one.
    #[error("no delete is pending for `{0}`")]
    NoPendingDelete(String),
    /// The object store failed; the previous state is kept.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),
}

fn ensure_idle(state: &GalleryState) -> Result<(), GalleryError> {
    if state.activity.is_busy() {
        Err(GalleryError::Busy(state.activity))
    } else {
        Ok(())
    }
}

fn begin_refresh(state: &mut GalleryState, effects: &mut Vec<GalleryEffect>) {
    state.activity = GalleryActivity::Refreshing;
    effects.push(GalleryEffect::ListObjects {
        prefix: state.prefix().to_string(),
    });
}

fn raise(state: &mut GalleryState, effects: &mut Vec<GalleryEffect>, notice: Notice) {
    state.notice = Some(notice.clone());
    effects.push(GalleryEffect::Announce(notice));
}

fn close_context_menu_for(state: &mut GalleryState, key: &str) -> Result<(), GalleryError> {
    if state.overlay.context_menu_key() != Some(key) {
        return Err(GalleryError::ContextMenuNotOpen(key.to_string()));
    }
    state.overlay = Overlay::None;
    Ok(())
}

/// Orders a listing newest first, keeping one entry per key.
///
/// Duplicate keys keep their most recent entry; equal timestamps fall back to descending key
/// order so the result is deterministic. Folder markers (keys equal to the prefix or ending in
/// `/`) are dropped.
pub fn normalize_listing(prefix: &str, objects: Vec<MediaObject>) -> Vec<MediaObject> {
    let mut newest: HashMap<String, MediaObject> = HashMap::with_capacity(objects.len());
    for object in objects {
        if object.key == prefix || object.key.ends_with('/') {
            continue;
        }
        match newest.get(&object.key) {
            Some(existing) if existing.last_modified_unix_ms >= object.last_modified_unix_ms => {}
            _ => {
                newest.insert(object.key.clone(), object);
            }
        }
    }
    let mut listing: Vec<MediaObject> = newest.into_values().collect();
    listing.sort_by(|a, b| {
        b.last_modified_unix_ms
            .cmp(&a.last_modified_unix_ms)
            .then_with(|| b.key.cmp(&a.key))
    });
    listing
}

/// Builds the key for an upload: `<prefix><timestamp>_<file name>`.
///
/// Any directory part of the picked name is dropped.
pub fn upload_key(prefix: &str, now_ms: u64, file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or("upload");
    format!("{prefix}{now_ms}_{base}")
}

/// Applies a [`GalleryAction`] to the gallery state and collects resulting side effects.
///
/// # Errors
///
/// Returns [`GalleryError::Busy`] when a mutating action arrives while another is in flight,
/// [`GalleryError::NoFileSelected`] for an upload without a file,
/// [`GalleryError::ContextMenuNotOpen`] for delete/edit outside the item's context menu, and
/// [`GalleryError::NoPendingDelete`] for a stray confirmation. State is unchanged on error,
/// except that a delete request always closes the item's context menu first.
///
/// Delete completions for a key that is not in flight are ignored.
pub fn reduce_gallery(
    state: &mut GalleryState,
    action: GalleryAction,
) -> Result<Vec<GalleryEffect>, GalleryError> {
    let mut effects = Vec::new();
    match action {
        GalleryAction::RefreshRequested => {
            ensure_idle(state)?;
            begin_refresh(state, &mut effects);
        }
        GalleryAction::ListingLoaded { objects } => {
            state.snapshot = normalize_listing(state.prefix(), objects);
            state
                .likes
                .seed(state.snapshot.iter().map(|object| object.key.as_str()));
            if let Some(key) = state
                .overlay
                .context_menu_key()
                .or(state.overlay.viewer_key())
            {
                if state.object(key).is_none() {
                    state.overlay = Overlay::None;
                }
            }
            state.activity = GalleryActivity::Idle;
        }
        GalleryAction::ListingFailed { message } => {
            state.activity = GalleryActivity::Idle;
            raise(state, &mut effects, Notice::storage_unavailable(&message));
        }
        GalleryAction::SelectFile(file) => {
            if state.activity == GalleryActivity::Uploading {
                return Err(GalleryError::Busy(state.activity));
            }
            state.pending_upload = Some(file);
        }
        GalleryAction::OpenUploadDialog => {
            state.overlay = Overlay::UploadDialog;
        }
        GalleryAction::CancelUpload => {
            if state.activity == GalleryActivity::Uploading {
                return Err(GalleryError::Busy(state.activity));
            }
            state.pending_upload = None;
            if state.overlay.is_upload_dialog() {
                state.overlay = Overlay::None;
            }
        }
        GalleryAction::ConfirmUpload { now_ms } => {
            ensure_idle(state)?;
            let file = state
                .pending_upload
                .as_ref()
                .ok_or(GalleryError::NoFileSelected)?;
            let content_type = if file.content_type.trim().is_empty() {
                FALLBACK_CONTENT_TYPE.to_string()
            } else {
                file.content_type.clone()
            };
            let request = PutObjectRequest {
                key: upload_key(state.prefix(), now_ms, &file.name),
                bytes: file.bytes.clone(),
                content_type,
            };
            state.activity = GalleryActivity::Uploading;
            effects.push(GalleryEffect::PutObject(request));
        }
        GalleryAction::UploadCompleted { key } => {
            state.pending_upload = None;
            if state.overlay.is_upload_dialog() {
                state.overlay = Overlay::None;
            }
            let name = MediaObject::new(key, 0).caption(state.prefix()).to_string();
            raise(state, &mut effects, Notice::success(format!("Uploaded {name}.")));
            begin_refresh(state, &mut effects);
        }
        GalleryAction::UploadFailed { message } => {
            state.activity = GalleryActivity::Idle;
            raise(state, &mut effects, Notice::storage_unavailable(&message));
        }
        GalleryAction::OpenContextMenu { key } => {
            state.overlay = Overlay::ContextMenu(key);
        }
        GalleryAction::RequestDelete { key } => {
            close_context_menu_for(state, &key)?;
            ensure_idle(state)?;
            let name = MediaObject::new(key.clone(), 0)
                .display_name(state.prefix())
                .to_string();
            state.activity = GalleryActivity::Deleting;
            state.pending_delete = Some(key.clone());
            effects.push(GalleryEffect::PromptDelete {
                key,
                message: format!("Delete \"{name}\"? This cannot be undone."),
            });
        }
        GalleryAction::ConfirmDelete { key } => {
            if state.pending_delete.as_deref() != Some(key.as_str()) {
                return Err(GalleryError::NoPendingDelete(key));
            }
            state.deleting = state.pending_delete.take();
            effects.push(GalleryEffect::DeleteObject { key });
        }
        GalleryAction::CancelDelete { key } => {
            if state.pending_delete.as_deref() != Some(key.as_str()) {
                return Err(GalleryError::NoPendingDelete(key));
            }
            state.pending_delete = None;
            state.activity = GalleryActivity::Idle;
        }
        GalleryAction::DeleteCompleted { key } => {
            if state.deleting.as_deref() != Some(key.as_str()) {
                return Ok(effects);
            }
            state.deleting = None;
            let name = MediaObject::new(key, 0).caption(state.prefix()).to_string();
            raise(state, &mut effects, Notice::success(format!("Deleted {name}.")));
            begin_refresh(state, &mut effects);
        }
        GalleryAction::DeleteFailed { key, message } => {
            if state.deleting.as_deref() != Some(key.as_str()) {
                return Ok(effects);
            }
            state.deleting = None;
            state.activity = GalleryActivity::Idle;
            raise(state, &mut effects, Notice::storage_unavailable(&message));
        }
        GalleryAction::RequestEdit { key } => {
            close_context_menu_for(state, &key)?;
            raise(state, &mut effects, Notice::info(EDIT_UNAVAILABLE));
        }
        GalleryAction::OpenImageViewer { key } => {
            state.overlay = Overlay::ImageViewer(key);
        }
        GalleryAction::ToggleLike { key } => {
            state.likes.toggle(&key);
        }
        GalleryAction::CloseOverlay => {
            state.overlay = Overlay::None;
        }
        GalleryAction::DismissNotice => {
            state.notice = None;
        }
        GalleryAction::SessionEnded => {
            state.overlay = Overlay::None;
            state.pending_upload = None;
            state.notice = None;
        }
    }
    Ok(effects)
}
