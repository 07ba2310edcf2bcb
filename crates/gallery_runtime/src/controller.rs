//! Headless gallery driver: runs the reducer and its effects to completion, one action at a time.

use std::collections::VecDeque;

use leptos::logging;
use platform_host::{next_monotonic_timestamp_ms, HostServices, SelectedFile};

use crate::{
    config::GalleryConfig,
    effects::run_gallery_effect,
    likes::LikeState,
    model::GalleryState,
    reducer::{reduce_gallery, GalleryAction, GalleryError},
};

/// Owns [`GalleryState`] and the host services its effects run against.
///
/// Every public operation drains the full action → effect → action chain before returning, so
/// callers always observe the gallery back at rest (or waiting on nothing).
pub struct GalleryController {
    host: HostServices,
    state: GalleryState,
}

impl GalleryController {
    /// Creates a controller with an empty gallery.
    pub fn new(host: HostServices, config: GalleryConfig) -> Self {
        Self::with_state(host, GalleryState::new(config))
    }

    /// Creates a controller around prepared state.
    pub fn with_state(host: HostServices, state: GalleryState) -> Self {
        Self { host, state }
    }

    /// Current gallery state.
    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    /// Host services effects run against.
    pub fn host(&self) -> &HostServices {
        &self.host
    }

    /// Dispatches `action` and every follow-up action its effects produce.
    ///
    /// # Errors
    ///
    /// Returns the reducer error if `action` itself is rejected, or
    /// [`GalleryError::StorageUnavailable`] when an object-store call in the chain failed. In the
    /// failure case the state has already recorded the notice and kept its previous snapshot.
    pub async fn dispatch(&mut self, action: GalleryAction) -> Result<(), GalleryError> {
        let mut queue = VecDeque::from([action]);
        let mut first = true;
        let mut storage_failure = None;

        while let Some(action) = queue.pop_front() {
            if let GalleryAction::ListingFailed { message }
            | GalleryAction::UploadFailed { message }
            | GalleryAction::DeleteFailed { message, .. } = &action
            {
                storage_failure = Some(message.clone());
            }

            let effects = match reduce_gallery(&mut self.state, action) {
                Ok(effects) => effects,
                Err(err) if first => return Err(err),
                Err(err) => {
                    logging::warn!("gallery reducer rejected follow-up action: {err}");
                    continue;
                }
            };
            first = false;

            for effect in effects {
                if let Some(next) = run_gallery_effect(&self.host, effect).await {
                    queue.push_back(next);
                }
            }
        }

        match storage_failure {
            Some(message) => Err(GalleryError::StorageUnavailable(message)),
            None => Ok(()),
        }
    }

    /// Reloads the listing.
    pub async fn refresh(&mut self) -> Result<(), GalleryError> {
        self.dispatch(GalleryAction::RefreshRequested).await
    }

    /// Remembers the file to upload next.
    pub async fn select_file(&mut self, file: SelectedFile) -> Result<(), GalleryError> {
        self.dispatch(GalleryAction::SelectFile(file)).await
    }

    /// Shows the upload dialog.
    pub async fn open_upload_dialog(&mut self) -> Result<(), GalleryError> {
        self.dispatch(GalleryAction::OpenUploadDialog).await
    }

    /// Uploads the selected file under a fresh timestamped key, then refreshes.
    pub async fn upload(&mut self) -> Result<(), GalleryError> {
        let now_ms = next_monotonic_timestamp_ms();
        self.dispatch(GalleryAction::ConfirmUpload { now_ms }).await
    }

    /// Closes the upload dialog and forgets the selected file.
    pub async fn cancel_upload(&mut self) -> Result<(), GalleryError> {
        self.dispatch(GalleryAction::CancelUpload).await
    }

    /// Shows the context menu for `key`.
    pub async fn open_context_menu(&mut self, key: &str) -> Result<(), GalleryError> {
        self.dispatch(GalleryAction::OpenContextMenu {
            key: key.to_string(),
        })
        .await
    }

    /// Deletes `key` after confirmation. The context menu for `key` must be open.
    pub async fn remove(&mut self, key: &str) -> Result<(), GalleryError> {
        self.dispatch(GalleryAction::RequestDelete {
            key: key.to_string(),
        })
        .await
    }

    /// "Edit" from the context menu of `key`.
    pub async fn edit(&mut self, key: &str) -> Result<(), GalleryError> {
        self.dispatch(GalleryAction::RequestEdit {
            key: key.to_string(),
        })
        .await
    }

    /// Shows `key` in the image viewer.
    pub async fn open_image_viewer(&mut self, key: &str) -> Result<(), GalleryError> {
        self.dispatch(GalleryAction::OpenImageViewer {
            key: key.to_string(),
        })
        .await
    }

    /// Flips the like state of `key` and returns the new state.
    pub async fn toggle_like(&mut self, key: &str) -> Result<LikeState, GalleryError> {
        self.dispatch(GalleryAction::ToggleLike {
            key: key.to_string(),
        })
        .await?;
        Ok(self.state.likes.get(key).unwrap_or_default())
    }

    /// Drops the overlay, selected file, and notice left by the previous identity.
    pub async fn end_session(&mut self) -> Result<(), GalleryError> {
        self.dispatch(GalleryAction::SessionEnded).await
    }

    /// Closes whichever overlay is open.
    pub async fn close_overlay(&mut self) -> Result<(), GalleryError> {
        self.dispatch(GalleryAction::CloseOverlay).await
    }

    /// Clears the current notice.
    pub async fn dismiss_notice(&mut self) -> Result<(), GalleryError> {
        self.dispatch(GalleryAction::DismissNotice).await
    }
}
