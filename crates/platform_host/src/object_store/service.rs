//! Remote object-store service contracts.

use std::{cell::RefCell, collections::BTreeMap, future::Future, pin::Pin, rc::Rc};

use super::types::{PutObjectRequest, StoredObject};

/// Object-safe boxed future used by [`ObjectStoreService`] async methods.
pub type ObjectStoreFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Host service for the remote bucket backing the gallery.
///
/// Every call is one independent network operation; implementations do not retry.
pub trait ObjectStoreService {
    /// Lists every object whose key starts with `prefix`.
    fn list_objects<'a>(
        &'a self,
        prefix: &'a str,
    ) -> ObjectStoreFuture<'a, Result<Vec<StoredObject>, String>>;

    /// Creates or overwrites one object.
    fn put_object<'a>(
        &'a self,
        request: &'a PutObjectRequest,
    ) -> ObjectStoreFuture<'a, Result<(), String>>;

    /// Deletes one object. Deleting a missing key succeeds.
    fn delete_object<'a>(&'a self, key: &'a str) -> ObjectStoreFuture<'a, Result<(), String>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Object store used when no bucket is configured; every call fails.
pub struct NoopObjectStoreService;

impl NoopObjectStoreService {
    fn unsupported_error(op: &str) -> String {
        format!("object store unavailable: {op}")
    }
}

impl ObjectStoreService for NoopObjectStoreService {
    fn list_objects<'a>(
        &'a self,
        _prefix: &'a str,
    ) -> ObjectStoreFuture<'a, Result<Vec<StoredObject>, String>> {
        Box::pin(async { Err(Self::unsupported_error("list_objects")) })
    }

    fn put_object<'a>(
        &'a self,
        _request: &'a PutObjectRequest,
    ) -> ObjectStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Err(Self::unsupported_error("put_object")) })
    }

    fn delete_object<'a>(&'a self, _key: &'a str) -> ObjectStoreFuture<'a, Result<(), String>> {
        Box::pin(async { Err(Self::unsupported_error("delete_object")) })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct MemoryObject {
    bytes: Vec<u8>,
    content_type: String,
    last_modified_unix_ms: u64,
}

#[derive(Debug, Default)]
struct MemoryObjectStoreInner {
    objects: BTreeMap<String, MemoryObject>,
    offline: bool,
}

#[derive(Debug, Clone, Default)]
/// In-memory bucket. Clones share the same objects.
///
/// Writes are stamped with [`crate::next_monotonic_timestamp_ms`], so later writes always sort
/// as more recent.
pub struct MemoryObjectStore {
    inner: Rc<RefCell<MemoryObjectStoreInner>>,
}

impl MemoryObjectStore {
    /// Inserts an object with an explicit last-modified timestamp.
    pub fn insert_object(&self, key: impl Into<String>, last_modified_unix_ms: u64) {
        self.inner.borrow_mut().objects.insert(
            key.into(),
            MemoryObject {
                bytes: Vec::new(),
                content_type: "application/octet-stream".to_string(),
                last_modified_unix_ms,
            },
        );
    }

    /// Makes every call fail while `offline` is set.
    pub fn set_offline(&self, offline: bool) {
        self.inner.borrow_mut().offline = offline;
    }

    /// Returns the stored keys in sorted order.
    pub fn keys(&self) -> Vec<String> {
        self.inner.borrow().objects.keys().cloned().collect()
    }

    /// Returns the stored body and content type for `key`.
    pub fn object(&self, key: &str) -> Option<(Vec<u8>, String)> {
        self.inner
            .borrow()
            .objects
            .get(key)
            .map(|object| (object.bytes.clone(), object.content_type.clone()))
    }

    fn ensure_online(&self, op: &str) -> Result<(), String> {
        if self.inner.borrow().offline {
            return Err(format!("object store offline: {op}"));
        }
        Ok(())
    }
}

impl ObjectStoreService for MemoryObjectStore {
    fn list_objects<'a>(
        &'a self,
        prefix: &'a str,
    ) -> ObjectStoreFuture<'a, Result<Vec<StoredObject>, String>> {
        Box::pin(async move {
            self.ensure_online("list_objects")?;
            Ok(self
                .inner
                .borrow()
                .objects
                .iter()
                .filter(|(key, _)| key.starts_with(prefix))
                .map(|(key, object)| StoredObject {
                    key: key.clone(),
                    last_modified_unix_ms: object.last_modified_unix_ms,
                    size_bytes: Some(object.bytes.len() as u64),
                })
                .collect())
        })
    }

    fn put_object<'a>(
        &'a self,
        request: &'a PutObjectRequest,
    ) -> ObjectStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.ensure_online("put_object")?;
            self.inner.borrow_mut().objects.insert(
                request.key.clone(),
                MemoryObject {
                    bytes: request.bytes.clone(),
                    content_type: request.content_type.clone(),
                    last_modified_unix_ms: crate::time::next_monotonic_timestamp_ms(),
                },
            );
            Ok(())
        })
    }

    fn delete_object<'a>(&'a self, key: &'a str) -> ObjectStoreFuture<'a, Result<(), String>> {
        Box::pin(async move {
            self.ensure_online("delete_object")?;
            self.inner.borrow_mut().objects.remove(key);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use super::*;

    #[test]
    fn memory_store_lists_by_prefix_and_deletes_idempotently() {
        let store = MemoryObjectStore::default();
        let store_obj: &dyn ObjectStoreService = &store;
        store.insert_object("uploads/1_a.png", 10);
        store.insert_object("other/2_b.png", 20);

        let listed = block_on(store_obj.list_objects("uploads/")).expect("list");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key, "uploads/1_a.png");
        assert_eq!(listed[0].last_modified_unix_ms, 10);

        block_on(store_obj.delete_object("uploads/1_a.png")).expect("delete");
        block_on(store_obj.delete_object("uploads/1_a.png")).expect("delete missing");
        assert_eq!(store.keys(), vec!["other/2_b.png".to_string()]);
    }

    #[test]
    fn memory_store_put_keeps_body_and_content_type() {
        let store = MemoryObjectStore::default();
        let request = PutObjectRequest {
            key: "uploads/5_cat.jpg".to_string(),
            bytes: vec![1, 2, 3],
            content_type: "image/jpeg".to_string(),
        };
        block_on(store.put_object(&request)).expect("put");

        assert_eq!(
            store.object("uploads/5_cat.jpg"),
            Some((vec![1, 2, 3], "image/jpeg".to_string()))
        );
    }

    #[test]
    fn offline_memory_store_fails_every_call() {
        let store = MemoryObjectStore::default();
        store.set_offline(true);
        assert!(block_on(store.list_objects("")).is_err());
        assert!(block_on(store.delete_object("k")).is_err());
    }

    #[test]
    fn noop_object_store_reports_unavailable() {
        let store = NoopObjectStoreService;
        let err = block_on(store.list_objects("uploads/")).expect_err("list should fail");
        assert!(err.contains("list_objects"));
    }
}
