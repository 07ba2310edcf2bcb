//! Synchronous local key/value record storage contracts and adapters.

use std::{cell::RefCell, collections::BTreeMap, fmt, rc::Rc};

use serde::{de::DeserializeOwned, Serialize};

/// Host service for small JSON records kept in the client's durable key/value store.
///
/// Calls are synchronous at this boundary because the browser store they model
/// (`window.localStorage`) is synchronous and uncontended for a single tab.
pub trait LocalStore {
    /// Loads the raw text stored under `key`.
    fn get_item(&self, key: &str) -> Result<Option<String>, String>;

    /// Stores raw text under `key`, replacing any previous value.
    fn set_item(&self, key: &str, raw_json: &str) -> Result<(), String>;

    /// Removes `key`. Removing a missing key succeeds.
    fn remove_item(&self, key: &str) -> Result<(), String>;

    /// Removes every record in the store.
    fn clear(&self) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Local store that keeps nothing; used on targets without durable storage.
pub struct NoopLocalStore;

impl LocalStore for NoopLocalStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, String> {
        Ok(None)
    }

    fn set_item(&self, _key: &str, _raw_json: &str) -> Result<(), String> {
        Ok(())
    }

    fn remove_item(&self, _key: &str) -> Result<(), String> {
        Ok(())
    }

    fn clear(&self) -> Result<(), String> {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
/// In-memory local store keyed by string. Clones share the same records.
pub struct MemoryLocalStore {
    inner: Rc<RefCell<BTreeMap<String, String>>>,
    read_only: Rc<RefCell<bool>>,
}

impl MemoryLocalStore {
    /// Returns the stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().keys().cloned().collect()
    }

    /// Makes every subsequent write fail, mimicking a full or blocked browser store.
    pub fn set_read_only(&self, read_only: bool) {
        *self.read_only.borrow_mut() = read_only;
    }

    fn ensure_writable(&self, op: &str) -> Result<(), String> {
        if *self.read_only.borrow() {
            return Err(format!("local store is read-only: {op}"));
        }
        Ok(())
    }
}

impl LocalStore for MemoryLocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, String> {
        Ok(self.inner.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, raw_json: &str) -> Result<(), String> {
        self.ensure_writable("set_item")?;
        self.inner
            .borrow_mut()
            .insert(key.to_string(), raw_json.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), String> {
        self.ensure_writable("remove_item")?;
        self.inner.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), String> {
        self.ensure_writable("clear")?;
        self.inner.borrow_mut().clear();
        Ok(())
    }
}

/// Failure reading a typed record from a [`LocalStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalRecordError {
    /// The store itself could not be read.
    Unavailable(String),
    /// A record exists but is not valid JSON for the expected shape.
    Malformed {
        /// Record key.
        key: String,
        /// Deserializer message.
        message: String,
    },
}

impl fmt::Display for LocalRecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(message) => write!(f, "local store unavailable: {message}"),
            Self::Malformed { key, message } => {
                write!(f, "malformed local record `{key}`: {message}")
            }
        }
    }
}

impl std::error::Error for LocalRecordError {}

/// Loads and deserializes a typed record through a [`LocalStore`] implementation.
///
/// # Errors
///
/// Returns [`LocalRecordError::Unavailable`] when the store read fails and
/// [`LocalRecordError::Malformed`] when the stored text does not deserialize.
pub fn load_record_with<S: LocalStore + ?Sized, T: DeserializeOwned>(
    store: &S,
    key: &str,
) -> Result<Option<T>, LocalRecordError> {
    let Some(raw) = store.get_item(key).map_err(LocalRecordError::Unavailable)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|err| LocalRecordError::Malformed {
            key: key.to_string(),
            message: err.to_string(),
        })
}

/// Serializes and saves a typed record through a [`LocalStore`] implementation.
///
/// # Errors
///
/// Returns an error when serialization or the store write fails.
pub fn save_record_with<S: LocalStore + ?Sized, T: Serialize + ?Sized>(
    store: &S,
    key: &str,
    value: &T,
) -> Result<(), String> {
    let raw = serde_json::to_string(value).map_err(|e| e.to_string())?;
    store.set_item(key, &raw)
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        name: String,
    }

    #[test]
    fn memory_store_round_trip_remove_and_clear() {
        let store = MemoryLocalStore::default();
        let store_obj: &dyn LocalStore = &store;

        store_obj.set_item("a", "{\"k\":1}").expect("set a");
        store_obj.set_item("b", "[]").expect("set b");
        assert_eq!(
            store_obj.get_item("a").expect("get"),
            Some("{\"k\":1}".to_string())
        );

        store_obj.remove_item("a").expect("remove");
        store_obj.remove_item("a").expect("remove missing");
        assert_eq!(store.keys(), vec!["b".to_string()]);

        store_obj.clear().expect("clear");
        assert!(store.keys().is_empty());
    }

    #[test]
    fn clones_share_records() {
        let store = MemoryLocalStore::default();
        let other = store.clone();
        store.set_item("shared", "1").expect("set");
        assert_eq!(other.get_item("shared").expect("get"), Some("1".to_string()));
    }

    #[test]
    fn read_only_store_rejects_writes_and_keeps_records() {
        let store = MemoryLocalStore::default();
        store.set_item("k", "1").expect("set");
        store.set_read_only(true);

        assert!(store.set_item("k", "2").is_err());
        assert!(store.clear().is_err());
        assert_eq!(store.get_item("k").expect("get"), Some("1".to_string()));
    }

    #[test]
    fn typed_helpers_report_missing_and_malformed_records() {
        let store = MemoryLocalStore::default();

        let missing: Option<Record> = load_record_with(&store, "rec").expect("missing is ok");
        assert_eq!(missing, None);

        save_record_with(
            &store,
            "rec",
            &Record {
                name: "feed".to_string(),
            },
        )
        .expect("save");
        let loaded: Option<Record> = load_record_with(&store, "rec").expect("load");
        assert_eq!(loaded.map(|r| r.name), Some("feed".to_string()));

        store.set_item("rec", "{not json").expect("set junk");
        let err = load_record_with::<_, Record>(&store, "rec").expect_err("junk must fail");
        assert!(matches!(err, LocalRecordError::Malformed { ref key, .. } if key == "rec"));
    }

    #[test]
    fn noop_store_is_empty_and_successful() {
        let store = NoopLocalStore;
        store.set_item("k", "1").expect("set");
        assert_eq!(store.get_item("k").expect("get"), None);
        store.clear().expect("clear");
    }
}
