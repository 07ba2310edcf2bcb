//! Gallery state and the media types derived from object listings.

use std::fmt;

use platform_host::{SelectedFile, StoredObject};

use crate::{config::GalleryConfig, likes::LikeCache, overlay::Overlay};

/// Extensions (lowercase) rendered as images; everything else is a generic link.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "gif", "webp", "bmp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How an object is presented.
pub enum MediaKind {
    /// Rendered inline as an image.
    Image,
    /// Rendered as a download link.
    Link,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// One object in the listing snapshot.
pub struct MediaObject {
    /// Full object key, including the prefix.
    pub key: String,
    /// Last-modified time in unix milliseconds.
    pub last_modified_unix_ms: u64,
}

impl MediaObject {
    /// Creates a media object.
    pub fn new(key: impl Into<String>, last_modified_unix_ms: u64) -> Self {
        Self {
            key: key.into(),
            last_modified_unix_ms,
        }
    }

    /// Key with `prefix` stripped.
    pub fn display_name<'a>(&'a self, prefix: &str) -> &'a str {
        self.key.strip_prefix(prefix).unwrap_or(&self.key)
    }

    /// Display name without the leading `<digits>_` upload timestamp.
    pub fn caption<'a>(&'a self, prefix: &str) -> &'a str {
        let name = self.display_name(prefix);
        match name.split_once('_') {
            Some((stamp, rest))
                if !stamp.is_empty() && stamp.bytes().all(|b| b.is_ascii_digit()) =>
            {
                rest
            }
            _ => name,
        }
    }

    /// Image for the allow-listed extensions (case-insensitive), link otherwise.
    pub fn media_kind(&self) -> MediaKind {
        let file_name = self.key.rsplit('/').next().unwrap_or(&self.key);
        match file_name.rsplit_once('.') {
            Some((_, ext))
                if IMAGE_EXTENSIONS
                    .iter()
                    .any(|image| image.eq_ignore_ascii_case(ext)) =>
            {
                MediaKind::Image
            }
            _ => MediaKind::Link,
        }
    }
}

impl From<StoredObject> for MediaObject {
    fn from(object: StoredObject) -> Self {
        Self::new(object.key, object.last_modified_unix_ms)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// The one mutating operation in flight, if any.
pub enum GalleryActivity {
    /// Nothing in flight.
    #[default]
    Idle,
    /// Listing the bucket.
    Refreshing,
    /// Writing the selected file.
    Uploading,
    /// Confirming or executing a delete.
    Deleting,
}

impl GalleryActivity {
    /// Returns `true` for every state but [`GalleryActivity::Idle`].
    pub fn is_busy(self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Stable lowercase token for logs and display.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Refreshing => "refreshing",
            Self::Uploading => "uploading",
            Self::Deleting => "deleting",
        }
    }
}

impl fmt::Display for GalleryActivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Severity of a user-visible notice.
pub enum NoticeKind {
    /// Neutral information.
    Info,
    /// An operation finished.
    Success,
    /// The object store failed; the action can be retried.
    StorageUnavailable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Notice shown until dismissed.
pub struct Notice {
    /// Severity.
    pub kind: NoticeKind,
    /// Text shown to the user.
    pub message: String,
}

impl Notice {
    /// Informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }

    /// Success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    /// Retriable storage failure notice.
    pub fn storage_unavailable(detail: &str) -> Self {
        Self {
            kind: NoticeKind::StorageUnavailable,
            message: format!("Storage is unavailable ({detail}). Please try again."),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Everything the gallery reducer owns.
pub struct GalleryState {
    /// Bucket settings and key prefix.
    pub config: GalleryConfig,
    /// Most recent successful listing, newest first.
    pub snapshot: Vec<MediaObject>,
    /// Operation in flight.
    pub activity: GalleryActivity,
    /// File chosen for the next upload.
    pub pending_upload: Option<SelectedFile>,
    /// Key awaiting delete confirmation.
    pub pending_delete: Option<String>,
    /// Key whose delete request is in flight.
    pub deleting: Option<String>,
    /// Visible overlay.
    pub overlay: Overlay,
    /// Like counters per key.
    pub likes: LikeCache,
    /// Notice waiting to be dismissed.
    pub notice: Option<Notice>,
}

impl GalleryState {
    /// Creates an empty gallery for `config` with a clock-seeded like cache.
    pub fn new(config: GalleryConfig) -> Self {
        Self::with_likes(config, LikeCache::new())
    }

    /// Creates an empty gallery using the supplied like cache.
    pub fn with_likes(config: GalleryConfig, likes: LikeCache) -> Self {
        Self {
            config,
            snapshot: Vec::new(),
            activity: GalleryActivity::Idle,
            pending_upload: None,
            pending_delete: None,
            deleting: None,
            overlay: Overlay::None,
            likes,
            notice: None,
        }
    }

    /// Key prefix every gallery object lives under.
    pub fn prefix(&self) -> &str {
        &self.config.prefix
    }

    /// Looks up an object in the snapshot.
    pub fn object(&self, key: &str) -> Option<&MediaObject> {
        self.snapshot.iter().find(|object| object.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_and_caption_strip_prefix_and_timestamp() {
        let object = MediaObject::new("uploads/1700000000000_beach day.JPG", 0);
        assert_eq!(object.display_name("uploads/"), "1700000000000_beach day.JPG");
        assert_eq!(object.caption("uploads/"), "beach day.JPG");
        assert_eq!(object.media_kind(), MediaKind::Image);
    }

    #[test]
    fn caption_keeps_names_without_numeric_stamp() {
        let object = MediaObject::new("uploads/holiday_2023.png", 0);
        assert_eq!(object.caption("uploads/"), "holiday_2023.png");
        let foreign = MediaObject::new("other/1_a.txt", 0);
        assert_eq!(foreign.display_name("uploads/"), "other/1_a.txt");
    }

    #[test]
    fn media_kind_uses_case_insensitive_allow_list() {
        for key in ["a.jpeg", "b.PNG", "c.Gif", "d.webp", "e.bmp", "f.jpg"] {
            assert_eq!(MediaObject::new(key, 0).media_kind(), MediaKind::Image, "{key}");
        }
        for key in ["notes.txt", "movie.mp4", "noext", "dir.png/readme"] {
            assert_eq!(MediaObject::new(key, 0).media_kind(), MediaKind::Link, "{key}");
        }
    }

    #[test]
    fn only_idle_is_not_busy() {
        assert!(!GalleryActivity::Idle.is_busy());
        assert!(GalleryActivity::Refreshing.is_busy());
        assert!(GalleryActivity::Uploading.is_busy());
        assert!(GalleryActivity::Deleting.is_busy());
    }
}
