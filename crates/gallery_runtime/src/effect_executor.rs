//! Effect-queue executor for reducer-emitted gallery effects.

use leptos::*;

use crate::{effects::run_gallery_effect, runtime_context::GalleryRuntimeContext};

/// Installs the executor that drains queued gallery effects in order.
pub fn install(runtime: GalleryRuntimeContext) {
    // Take the batch before running it so follow-up dispatches queue a fresh batch instead of
    // being overwritten by the in-flight drain.
    create_effect(move |_| {
        let queued = runtime.effects.get();
        if queued.is_empty() {
            return;
        }

        runtime.effects.set(Vec::new());

        let host = runtime.host.get_value();
        spawn_local(async move {
            for effect in queued {
                if let Some(next) = run_gallery_effect(&host, effect).await {
                    runtime.dispatch_action(next);
                }
            }
        });
    });
}
