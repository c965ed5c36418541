//! Cache namespace registry port

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for the named caches owned by the worker's origin
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CacheStoragePort: Send + Sync {
    /// Names of all existing cache namespaces
    async fn keys(&self) -> Result<Vec<String>, ApplicationError>;

    /// Delete a namespace, returning whether it existed
    async fn delete(&self, name: &str) -> Result<bool, ApplicationError>;

    /// Create the namespace if missing
    async fn open(&self, name: &str) -> Result<(), ApplicationError>;
}
