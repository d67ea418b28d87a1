use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::StorageProvider;

/// Local file system storage provider. Blobs live directly in `base_path`.
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn get_full_path(&self, name: &str) -> Result<PathBuf> {
        let mut components = Path::new(name).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Ok(self.base_path.join(name)),
            _ => Err(AppError::BadRequest(format!("Invalid file name: {}", name))),
        }
    }
}

#[async_trait]
impl StorageProvider for LocalStorage {
    async fn put(&self, name: &str, data: Bytes) -> Result<()> {
        let full_path = self.get_full_path(name)?;

        fs::create_dir_all(&self.base_path).await?;

        let mut file = fs::File::create(&full_path).await?;
        file.write_all(&data).await?;
        file.flush().await?;

        tracing::debug!("Saved {} bytes to {:?}", data.len(), full_path);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool> {
        let full_path = self.get_full_path(name)?;

        match fs::remove_file(&full_path).await {
            Ok(()) => {
                tracing::debug!("Deleted file {:?}", full_path);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Storage(format!("Failed to delete file: {}", e))),
        }
    }
}
