//! Gallery configuration: bucket connection settings plus the object key prefix.

use platform_host::ObjectStoreConfig;
use serde::Deserialize;
use thiserror::Error;

/// Prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "uploads/";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Configuration loading failures.
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("invalid gallery config: {0}")]
    Parse(String),
    /// A required setting is absent or blank.
    #[error("gallery config is missing `{0}`")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Validated settings the gallery runtime is built from.
pub struct GalleryConfig {
    /// Bucket connection and signing settings.
    pub storage: ObjectStoreConfig,
    /// Key prefix every gallery object lives under; always ends with exactly one `/`.
    pub prefix: String,
}

#[derive(Debug, Deserialize)]
struct RawGalleryConfig {
    storage: ObjectStoreConfig,
    #[serde(default)]
    prefix: Option<String>,
}

impl GalleryConfig {
    /// Validates `storage` and normalizes `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the bucket or region is blank.
    pub fn new(storage: ObjectStoreConfig, prefix: Option<&str>) -> Result<Self, ConfigError> {
        if storage.bucket.trim().is_empty() {
            return Err(ConfigError::MissingField("storage.bucket"));
        }
        if storage.region.trim().is_empty() {
            return Err(ConfigError::MissingField("storage.region"));
        }
        Ok(Self {
            storage,
            prefix: normalize_prefix(prefix.unwrap_or(DEFAULT_PREFIX)),
        })
    }

    /// Parses a TOML document shaped like `photofeed.example.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML and [`ConfigError::MissingField`] for a
    /// blank bucket or region.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let parsed: RawGalleryConfig =
            toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        Self::new(parsed.storage, parsed.prefix.as_deref())
    }

    /// Builds the config from `PHOTOFEED_*` variables captured at compile time.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when the bucket or region was not set at build time.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        let storage = ObjectStoreConfig {
            bucket: option_env!("PHOTOFEED_S3_BUCKET").unwrap_or_default().to_string(),
            region: option_env!("PHOTOFEED_S3_REGION").unwrap_or_default().to_string(),
            storage_host: option_env!("PHOTOFEED_S3_HOST").map(str::to_string),
            access_key_id: option_env!("PHOTOFEED_S3_ACCESS_KEY")
                .unwrap_or_default()
                .to_string(),
            secret_access_key: option_env!("PHOTOFEED_S3_SECRET_KEY")
                .unwrap_or_default()
                .to_string(),
        };
        Self::new(storage, option_env!("PHOTOFEED_PREFIX"))
    }

    /// Returns the public URL of `key`.
    pub fn object_url(&self, key: &str) -> String {
        self.storage.object_url(key)
    }
}

/// Trims surrounding slashes and whitespace, then appends a single `/`.
///
/// A blank prefix falls back to [`DEFAULT_PREFIX`].
pub fn normalize_prefix(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        DEFAULT_PREFIX.to_string()
    } else {
        format!("{trimmed}/")
    }
}
