//! Typed host-domain contracts and shared models used across the runtime and browser adapters.
//!
//! This crate is the API-first boundary for platform services. It exposes the durable local
//! record store, the remote object-store service, user dialogs, and time helpers, while concrete
//! browser adapters live in `platform_host_web`.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod dialog;
pub mod host;
pub mod object_store;
pub mod storage;
pub mod time;

pub use dialog::{DialogFuture, DialogService, NoopDialogService, ScriptedDialogService};
pub use host::{HostServices, HostStrategy};
pub use object_store::{
    default_storage_host, MemoryObjectStore, NoopObjectStoreService, ObjectStoreConfig,
    ObjectStoreFuture, ObjectStoreService, PutObjectRequest, SelectedFile, StoredObject,
};
pub use storage::local_store::{
    load_record_with, save_record_with, LocalRecordError, LocalStore, MemoryLocalStore,
    NoopLocalStore,
};
pub use time::{next_monotonic_timestamp_ms, unix_time_ms_now};
