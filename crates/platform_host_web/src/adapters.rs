use std::rc::Rc;

use platform_host::{
    HostServices, HostStrategy, NoopObjectStoreService, ObjectStoreConfig, ObjectStoreFuture,
    ObjectStoreService, PutObjectRequest, StoredObject,
};

use crate::{S3ObjectStoreService, WebDialogService, WebLocalStore};

/// Adapter enum that erases the concrete bucket backend behind [`ObjectStoreService`].
#[derive(Debug, Clone)]
pub enum ObjectStoreServiceAdapter {
    /// Signed S3 REST calls against the configured bucket.
    Browser(S3ObjectStoreService),
    /// Fallback used when no bucket is configured; every call fails.
    Unconfigured(NoopObjectStoreService),
}

impl ObjectStoreServiceAdapter {
    /// Returns `true` when the adapter talks to a real bucket.
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Browser(_))
    }
}

impl ObjectStoreService for ObjectStoreServiceAdapter {
    fn list_objects<'a>(
        &'a self,
        prefix: &'a str,
    ) -> ObjectStoreFuture<'a, Result<Vec<StoredObject>, String>> {
        match self {
            Self::Browser(service) => service.list_objects(prefix),
            Self::Unconfigured(service) => service.list_objects(prefix),
        }
    }

    fn put_object<'a>(
        &'a self,
        request: &'a PutObjectRequest,
    ) -> ObjectStoreFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(service) => service.put_object(request),
            Self::Unconfigured(service) => service.put_object(request),
        }
    }

    fn delete_object<'a>(&'a self, key: &'a str) -> ObjectStoreFuture<'a, Result<(), String>> {
        match self {
            Self::Browser(service) => service.delete_object(key),
            Self::Unconfigured(service) => service.delete_object(key),
        }
    }
}

/// Builds the bucket adapter; a config without bucket or region yields the unconfigured fallback.
pub fn object_store_service(config: Option<&ObjectStoreConfig>) -> ObjectStoreServiceAdapter {
    match config {
        Some(config) if !config.bucket.trim().is_empty() && !config.region.trim().is_empty() => {
            ObjectStoreServiceAdapter::Browser(S3ObjectStoreService::new(config.clone()))
        }
        _ => ObjectStoreServiceAdapter::Unconfigured(NoopObjectStoreService),
    }
}

/// Builds the localStorage-backed record store.
pub fn local_store() -> WebLocalStore {
    WebLocalStore
}

/// Builds the window-prompt dialog adapter.
pub fn dialog_service() -> WebDialogService {
    WebDialogService
}

/// Composes the browser host bundle injected into the gallery runtime.
pub fn build_host_services(config: Option<&ObjectStoreConfig>) -> HostServices {
    HostServices {
        local_store: Rc::new(local_store()),
        object_store: Rc::new(object_store_service(config)),
        dialogs: Rc::new(dialog_service()),
        host_strategy: HostStrategy::Browser,
    }
}
