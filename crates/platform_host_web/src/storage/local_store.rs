//! `localStorage`-backed local record store.
//!
//! Every call goes straight to `window.localStorage`, so a write is durable by the time the call
//! returns. On non-wasm targets the store behaves like an empty, write-accepting store.

use platform_host::LocalStore;

#[derive(Debug, Clone, Copy, Default)]
/// Browser local record store backed by `window.localStorage`.
pub struct WebLocalStore;

#[cfg(target_arch = "wasm32")]
fn storage() -> Result<web_sys::Storage, String> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or_else(|| "localStorage unavailable".to_string())
}

impl LocalStore for WebLocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        #[cfg(target_arch = "wasm32")]
        {
            storage()?
                .get_item(key)
                .map_err(|e| format!("localStorage get_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    fn set_item(&self, key: &str, raw_json: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            storage()?
                .set_item(key, raw_json)
                .map_err(|e| format!("localStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw_json);
            Ok(())
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            storage()?
                .remove_item(key)
                .map_err(|e| format!("localStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }

    fn clear(&self) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            storage()?
                .clear()
                .map_err(|e| format!("localStorage clear failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Ok(())
        }
    }
}
