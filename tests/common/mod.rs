#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_transfer::{
    AppServices, Location, ObjectInfo, ObjectKey, ObjectStore,
    domain::errors::{StorageError, StorageResult},
};

pub fn key(name: &str) -> ObjectKey {
    ObjectKey::new(name.to_string()).unwrap()
}

pub async fn seed(services: &AppServices, location: &Location, name: &str, data: &str) {
    services
        .store
        .put_object(location, &key(name), Bytes::from(data.to_string()))
        .await
        .unwrap();
}

pub async fn fetch(services: &AppServices, location: &Location, name: &str) -> StorageResult<Bytes> {
    services.store.get_object(location, &key(name)).await
}

/// Store wrapper that fails chosen operations for chosen keys, for
/// exercising partial-failure behavior
pub struct FlakyStore {
    inner: Arc<dyn ObjectStore>,
    pub fail_list: bool,
    pub fail_get: HashSet<String>,
    pub fail_copy: HashSet<String>,
    pub fail_delete: HashSet<String>,
}

impl FlakyStore {
    pub fn wrapping(inner: Arc<dyn ObjectStore>) -> Self {
        Self {
            inner,
            fail_list: false,
            fail_get: HashSet::new(),
            fail_copy: HashSet::new(),
            fail_delete: HashSet::new(),
        }
    }

    fn injected(operation: &str) -> StorageError {
        StorageError::Backend {
            operation: operation.to_string(),
            detail: "injected failure".to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for FlakyStore {
    async fn list_objects(&self, location: &Location) -> StorageResult<Vec<ObjectInfo>> {
        if self.fail_list {
            return Err(StorageError::ConnectionFailed {
                detail: "injected failure".to_string(),
            });
        }
        self.inner.list_objects(location).await
    }

    async fn get_object(&self, location: &Location, key: &ObjectKey) -> StorageResult<Bytes> {
        if self.fail_get.contains(key.as_str()) {
            return Err(Self::injected("get"));
        }
        self.inner.get_object(location, key).await
    }

    async fn put_object(
        &self,
        location: &Location,
        key: &ObjectKey,
        data: Bytes,
    ) -> StorageResult<()> {
        self.inner.put_object(location, key, data).await
    }

    async fn copy_object(
        &self,
        source: &Location,
        source_key: &ObjectKey,
        destination: &Location,
        destination_key: &ObjectKey,
    ) -> StorageResult<()> {
        if self.fail_copy.contains(source_key.as_str()) {
            return Err(Self::injected("copy"));
        }
        self.inner
            .copy_object(source, source_key, destination, destination_key)
            .await
    }

    async fn delete_object(&self, location: &Location, key: &ObjectKey) -> StorageResult<()> {
        if self.fail_delete.contains(key.as_str()) {
            return Err(Self::injected("delete"));
        }
        self.inner.delete_object(location, key).await
    }
}
