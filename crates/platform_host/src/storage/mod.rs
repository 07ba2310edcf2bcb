//! Durable local record storage.

pub mod local_store;
