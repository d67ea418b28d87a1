use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Storage provider trait
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Write data under `name`, replacing any existing blob of that name
    async fn put(&self, name: &str, data: Bytes) -> Result<()>;

    /// Delete a blob. Returns whether anything was removed; a missing blob is not an error.
    async fn delete(&self, name: &str) -> Result<bool>;
}
