//! The single exclusive overlay layered over the gallery.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Which overlay is visible. Opening one replaces whichever was open.
pub enum Overlay {
    /// Nothing layered over the gallery.
    #[default]
    None,
    /// Per-item action menu for the object key.
    ContextMenu(String),
    /// File picker and upload confirmation.
    UploadDialog,
    /// Full-size view of the object key, with its like toggle.
    ImageViewer(String),
}

impl Overlay {
    /// Returns `true` when no overlay is shown.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Returns the key the context menu is open for.
    pub fn context_menu_key(&self) -> Option<&str> {
        match self {
            Self::ContextMenu(key) => Some(key),
            _ => None,
        }
    }

    /// Returns the key shown in the image viewer.
    pub fn viewer_key(&self) -> Option<&str> {
        match self {
            Self::ImageViewer(key) => Some(key),
            _ => None,
        }
    }

    /// Returns `true` while the upload dialog is shown.
    pub fn is_upload_dialog(&self) -> bool {
        matches!(self, Self::UploadDialog)
    }

    /// Returns `true` when the overlay refers to `key`.
    pub fn targets(&self, key: &str) -> bool {
        self.context_menu_key() == Some(key) || self.viewer_key() == Some(key)
    }
}
