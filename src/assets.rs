//! File storage for UI attachments.
//!
//! Attachments live under a web root at `folder/filename`, both taken from the
//! payload. Paths are checked before use so a payload can never reach outside
//! the web root.

use crate::errors::{Error, Result};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Where attachment bytes are kept.
pub trait AssetStore {
    /// Writes `content` to `folder/filename`, creating the folder and replacing
    /// any existing file. Returns the path written.
    async fn write(&self, folder: &str, filename: &str, content: &[u8]) -> Result<PathBuf>;

    /// Removes `folder/filename` if it exists. Returns whether a file was removed.
    async fn remove(&self, folder: &str, filename: &str) -> Result<bool>;
}

/// Rejects folders and file names that would leave the web root.
///
/// `folder` may be empty or nested (`img/large`), `filename` must be a single
/// plain path segment.
pub fn check_relative(folder: &str, filename: &str) -> Result<()> {
    let folder_ok = Path::new(folder)
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    let mut name = Path::new(filename).components();
    let filename_ok = matches!((name.next(), name.next()), (Some(Component::Normal(_)), None));

    if folder_ok && filename_ok {
        Ok(())
    } else {
        Err(Error::BadRequest {
            message: format!("Invalid attachment path: {folder}/{filename}"),
        })
    }
}

/// Stores attachments on the local file system below `web_root`.
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    web_root: PathBuf,
}

impl LocalAssetStore {
    /// Creates a store rooted at `web_root`.
    pub fn new(web_root: impl Into<PathBuf>) -> Self {
        Self {
            web_root: web_root.into(),
        }
    }

    /// Absolute location of `folder/filename`.
    ///
    /// # Errors
    /// Returns [`Error::BadRequest`] if the path would leave the web root.
    pub fn resolve(&self, folder: &str, filename: &str) -> Result<PathBuf> {
        check_relative(folder, filename)?;
        Ok(self.web_root.join(folder).join(filename))
    }
}

impl AssetStore for LocalAssetStore {
    async fn write(&self, folder: &str, filename: &str, content: &[u8]) -> Result<PathBuf> {
        let path = self.resolve(folder, filename)?;
        if let Some(directory) = path.parent() {
            tokio::fs::create_dir_all(directory).await?;
        }
        tokio::fs::write(&path, content).await?;

        debug!("Wrote {} bytes to {}", content.len(), path.display());
        Ok(path)
    }

    async fn remove(&self, folder: &str, filename: &str) -> Result<bool> {
        let path = self.resolve(folder, filename)?;
        if !tokio::fs::try_exists(&path).await? {
            return Ok(false);
        }
        tokio::fs::remove_file(&path).await?;

        debug!("Removed {}", path.display());
        Ok(true)
    }
}
