//! Browser (`wasm32`) implementations of [`platform_host`] service contracts.
//!
//! This crate is the concrete browser-side host wiring layer for the photo feed: the
//! `localStorage` record store, the signed S3 bucket client, window dialogs, and file-picker
//! reads. Non-wasm builds compile inert fallbacks so the workspace tests on the host.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

/// Host adapter factories and the composed [`platform_host::HostServices`] bundle.
pub mod adapters;
pub mod dialog;
#[cfg(target_arch = "wasm32")]
pub mod file_input;
pub mod object_store;
pub mod storage;

pub use adapters::{
    build_host_services, dialog_service, local_store, object_store_service,
    ObjectStoreServiceAdapter,
};
pub use dialog::WebDialogService;
#[cfg(target_arch = "wasm32")]
pub use file_input::{first_selected_file, read_selected_file};
pub use object_store::S3ObjectStoreService;
pub use storage::local_store::WebLocalStore;
