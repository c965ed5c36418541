//! In-process cache namespace registry

use std::collections::BTreeSet;

use application::error::ApplicationError;
use application::ports::CacheStoragePort;
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

/// Cache storage that only tracks namespace names
#[derive(Debug, Default)]
pub struct InMemoryCacheStorage {
    names: RwLock<BTreeSet<String>>,
}

impl InMemoryCacheStorage {
    /// Create an empty storage
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage that already holds the given namespaces
    #[must_use]
    pub fn with_caches<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: RwLock::new(names.into_iter().map(Into::into).collect()),
        }
    }
}

#[async_trait]
impl CacheStoragePort for InMemoryCacheStorage {
    async fn keys(&self) -> Result<Vec<String>, ApplicationError> {
        Ok(self.names.read().iter().cloned().collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, ApplicationError> {
        let removed = self.names.write().remove(name);
        debug!(cache = name, removed, "Cache delete");
        Ok(removed)
    }

    async fn open(&self, name: &str) -> Result<(), ApplicationError> {
        self.names.write().insert(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn keys_are_sorted_and_unique() {
        let storage = InMemoryCacheStorage::with_caches(["b", "a", "b"]);
        assert_eq!(storage.keys().await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn open_then_delete() {
        let storage = InMemoryCacheStorage::new();
        storage.open("rift-sky-v1").await.unwrap();

        assert!(storage.delete("rift-sky-v1").await.unwrap());
        assert!(!storage.delete("rift-sky-v1").await.unwrap());
        assert!(storage.keys().await.unwrap().is_empty());
    }
}
