//! Remote object-store contracts, shared types, and lightweight test adapters.

mod service;
mod types;

pub use service::{MemoryObjectStore, NoopObjectStoreService, ObjectStoreFuture, ObjectStoreService};
pub use types::{
    default_storage_host, ObjectStoreConfig, PutObjectRequest, SelectedFile, StoredObject,
};
