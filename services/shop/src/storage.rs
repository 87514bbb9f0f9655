//! Image asset storage on the local filesystem
//!
//! Uploaded files are written under the upload directory with generated
//! names and served back by the static file service at [`PUBLIC_PATH`].

use axum::body::Bytes;
use std::{
    io,
    path::{Path, PathBuf},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;

/// URL path prefix under which stored images are served
pub const PUBLIC_PATH: &str = "/uploads";

/// An uploaded image as received from a multipart form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl ImageUpload {
    /// Reject uploads that declare a non-image content type
    pub fn ensure_image(&self) -> Result<(), ApiError> {
        match self.content_type.as_deref() {
            Some(ct) if !ct.starts_with("image/") => Err(ApiError::Validation(
                "Only image uploads are allowed".to_string(),
            )),
            _ if self.bytes.is_empty() => {
                Err(ApiError::Validation("Uploaded image is empty".to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Sanitised extension of the client-side file name, including the dot
    fn extension(&self) -> String {
        self.file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.len() <= 10)
            .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
            .unwrap_or_default()
    }
}

/// Filesystem-backed image store
#[derive(Debug, Clone)]
pub struct ImageStore {
    root: PathBuf,
    public_base_url: Option<String>,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: Option<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    /// Directory holding the stored files
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the upload directory if it does not exist
    pub async fn ensure_root(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    /// Write `upload` under a generated name and return its retrieval URL
    ///
    /// `host` is the request's `Host` header, used when no public base URL is
    /// configured.
    pub async fn save(&self, upload: &ImageUpload, host: Option<&str>) -> io::Result<String> {
        let file_name = format!("{}{}", Uuid::new_v4(), upload.extension());
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::write(self.root.join(&file_name), &upload.bytes).await?;
        info!("Stored image {} ({} bytes)", file_name, upload.bytes.len());

        Ok(self.public_url(&file_name, host))
    }

    /// Delete the file a stored URL points at, if it is present on disk
    ///
    /// Returns whether a file was removed.
    pub async fn remove(&self, url: &str) -> io::Result<bool> {
        let Some(path) = self.path_for(url) else {
            return Ok(false);
        };

        if !tokio::fs::try_exists(&path).await? {
            return Ok(false);
        }

        tokio::fs::remove_file(&path).await?;
        info!("Removed image {}", path.display());
        Ok(true)
    }

    /// Best-effort removal: failures are logged, never propagated
    pub async fn discard(&self, url: &str) {
        if let Err(e) = self.remove(url).await {
            warn!("Failed to remove image {}: {}", url, e);
        }
    }

    fn public_url(&self, file_name: &str, host: Option<&str>) -> String {
        let base = match (&self.public_base_url, host) {
            (Some(base), _) => base.clone(),
            (None, Some(host)) => format!("http://{}", host),
            (None, None) => String::new(),
        };
        format!("{}{}/{}", base, PUBLIC_PATH, file_name)
    }

    /// Map a stored URL back to a file inside the upload directory
    fn path_for(&self, url: &str) -> Option<PathBuf> {
        let name = url.rsplit('/').next()?;
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains('\\')
            && !name.contains("..");
        valid.then(|| self.root.join(name))
    }
}
