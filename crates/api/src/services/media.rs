//! Uploaded media storage on the local filesystem.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Subdirectory (under the media root) for product images.
const PRODUCT_IMAGE_DIR: &str = "products";

/// Longest file-name stem kept from the client-supplied name.
const MAX_STEM_LENGTH: usize = 64;

/// Errors from media storage.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Upload contained no bytes.
    #[error("uploaded file is empty")]
    Empty,

    /// Filesystem error.
    #[error("media I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Writes uploaded files beneath a media root.
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
}

impl MediaStorage {
    /// Create storage rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Save a product image and return its path relative to the media root.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::Empty` for zero-byte uploads and
    /// `MediaError::Io` if the file cannot be written.
    pub async fn save_product_image(
        &self,
        original_name: Option<&str>,
        bytes: &[u8],
    ) -> Result<String, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }

        let relative = format!(
            "{PRODUCT_IMAGE_DIR}/{}-{}",
            Uuid::new_v4().simple(),
            sanitize_file_name(original_name.unwrap_or("image"))
        );
        let path = self.root.join(&relative);

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;

        tracing::info!(path = %path.display(), size = bytes.len(), "stored uploaded image");
        Ok(relative)
    }
}

/// Reduce a client-supplied file name to a safe single path component.
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let (stem, ext) = match base.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (base, None),
    };

    let clean = |s: &str| -> String {
        s.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect()
    };

    let mut stem: String = clean(stem).chars().take(MAX_STEM_LENGTH).collect();
    if stem.trim_matches('_').is_empty() {
        stem = "image".to_owned();
    }

    match ext.map(clean).filter(|e| !e.trim_matches('_').is_empty()) {
        Some(ext) => format!("{stem}.{ext}"),
        None => stem,
    }
}
