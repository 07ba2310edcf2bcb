//! Executes [`GalleryEffect`] intents against the injected host services.

use leptos::logging;
use platform_host::HostServices;

use crate::{
    model::MediaObject,
    reducer::{GalleryAction, GalleryEffect},
};

/// Runs one effect and returns the action reporting its outcome, if any.
///
/// Store failures never escape: they come back as the matching `*Failed` action.
pub async fn run_gallery_effect(
    host: &HostServices,
    effect: GalleryEffect,
) -> Option<GalleryAction> {
    match effect {
        GalleryEffect::ListObjects { prefix } => {
            match host.object_store.list_objects(&prefix).await {
                Ok(objects) => {
                    logging::log!("listed {} objects under `{prefix}`", objects.len());
                    Some(GalleryAction::ListingLoaded {
                        objects: objects.into_iter().map(MediaObject::from).collect(),
                    })
                }
                Err(message) => {
                    logging::warn!("listing `{prefix}` failed: {message}");
                    Some(GalleryAction::ListingFailed { message })
                }
            }
        }
        GalleryEffect::PutObject(request) => match host.object_store.put_object(&request).await {
            Ok(()) => {
                logging::log!("uploaded `{}` ({} bytes)", request.key, request.bytes.len());
                Some(GalleryAction::UploadCompleted { key: request.key })
            }
            Err(message) => {
                logging::warn!("upload of `{}` failed: {message}", request.key);
                Some(GalleryAction::UploadFailed { message })
            }
        },
        GalleryEffect::DeleteObject { key } => match host.object_store.delete_object(&key).await {
            Ok(()) => {
                logging::log!("deleted `{key}`");
                Some(GalleryAction::DeleteCompleted { key })
            }
            Err(message) => {
                logging::warn!("delete of `{key}` failed: {message}");
                Some(GalleryAction::DeleteFailed { key, message })
            }
        },
        GalleryEffect::PromptDelete { key, message } => {
            if host.dialogs.confirm(&message).await {
                Some(GalleryAction::ConfirmDelete { key })
            } else {
                Some(GalleryAction::CancelDelete { key })
            }
        }
        GalleryEffect::Announce(notice) => {
            host.dialogs.alert(&notice.message).await;
            None
        }
    }
}
