//! Object-store data types shared across host contracts and implementations.

use serde::{Deserialize, Serialize};

/// Default object-store host suffix for a region (`s3.<region>.amazonaws.com`).
pub fn default_storage_host(region: &str) -> String {
    format!("s3.{region}.amazonaws.com")
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Connection settings for the remote bucket.
pub struct ObjectStoreConfig {
    /// Bucket name.
    pub bucket: String,
    /// Bucket region, used for request signing and the default host.
    pub region: String,
    /// Host the bucket is served under; `None` means [`default_storage_host`].
    #[serde(default)]
    pub storage_host: Option<String>,
    /// Access key id used to sign requests.
    #[serde(default)]
    pub access_key_id: String,
    /// Secret access key used to sign requests.
    #[serde(default)]
    pub secret_access_key: String,
}

impl ObjectStoreConfig {
    /// Returns the effective storage host.
    pub fn host(&self) -> String {
        self.storage_host
            .clone()
            .filter(|host| !host.trim().is_empty())
            .unwrap_or_else(|| default_storage_host(&self.region))
    }

    /// Returns the virtual-hosted bucket endpoint, `<bucket>.<host>`.
    pub fn bucket_host(&self) -> String {
        format!("{}.{}", self.bucket, self.host())
    }

    /// Returns the public URL of `key`: `https://<bucket>.<host>/<key>`.
    pub fn object_url(&self, key: &str) -> String {
        format!("https://{}/{}", self.bucket_host(), key)
    }
}

impl std::fmt::Debug for ObjectStoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStoreConfig")
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("storage_host", &self.storage_host)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// One entry returned by an object listing.
pub struct StoredObject {
    /// Full object key, including the listing prefix.
    pub key: String,
    /// Last-modified time in unix milliseconds.
    pub last_modified_unix_ms: u64,
    /// Object size when the backend reports it.
    #[serde(default)]
    pub size_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A file the user picked for upload, already read into memory.
pub struct SelectedFile {
    /// Original file name as reported by the picker.
    pub name: String,
    /// Declared MIME type; may be empty when the browser does not know it.
    pub content_type: String,
    /// File contents.
    pub bytes: Vec<u8>,
}

impl SelectedFile {
    /// Creates a selected-file record.
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Request to create or overwrite one object.
pub struct PutObjectRequest {
    /// Destination key.
    pub key: String,
    /// Object body.
    pub bytes: Vec<u8>,
    /// `Content-Type` stored with the object.
    pub content_type: String,
}
