use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use catalog_domain::{AssetError, AssetRef, AssetStore};

/// Uploaded images stored flat in one directory and served under
/// `url_prefix`.
pub struct UploadDirAssetStore {
    upload_dir: PathBuf,
    url_prefix: String,
}

impl UploadDirAssetStore {
    pub fn new(upload_dir: impl Into<PathBuf>, url_prefix: impl Into<String>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            url_prefix: url_prefix.into(),
        }
    }

    /// Maps a reference to the file it names inside the upload directory.
    pub fn resolve(&self, reference: &AssetRef) -> Result<PathBuf, AssetError> {
        let invalid = || AssetError::InvalidReference(reference.to_string());
        let path = reference.path();
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let file_name = path.strip_prefix(self.url_prefix.as_str()).ok_or_else(invalid)?;
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name.contains("..")
        {
            return Err(invalid());
        }
        Ok(self.upload_dir.join(file_name))
    }
}

#[async_trait]
impl AssetStore for UploadDirAssetStore {
    async fn delete_asset(&self, reference: &AssetRef) -> Result<(), AssetError> {
        let path = self.resolve(reference)?;
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(path = %path.display(), "asset removed");
                Ok(())
            }
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(AssetError::NotFound(reference.to_string()))
            }
            Err(err) => Err(AssetError::Io(err)),
        }
    }
}
