use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use object_store::{ObjectStore as ApacheObjectStore, PutPayload, path::Path as ObjectPath};

use crate::{
    domain::{
        errors::{StorageError, StorageResult},
        value_objects::{BucketName, Location, ObjectKey},
    },
    ports::storage::{ObjectInfo, ObjectStore},
};

/// Adapter that implements the ObjectStore port using Apache
/// object_store backends, one per bucket. `object_store` scopes a store
/// instance to a single bucket, so cross-bucket copies stream through
/// get+put while same-bucket copies use the backend's native copy.
pub struct ApacheObjectStoreAdapter {
    stores: HashMap<String, Arc<dyn ApacheObjectStore>>,
}

impl ApacheObjectStoreAdapter {
    pub fn new() -> Self {
        Self {
            stores: HashMap::new(),
        }
    }

    /// Register the backend serving a bucket
    pub fn with_store(mut self, bucket: &BucketName, store: Arc<dyn ApacheObjectStore>) -> Self {
        self.stores.insert(bucket.as_str().to_string(), store);
        self
    }

    fn resolve(&self, bucket: &BucketName) -> StorageResult<&Arc<dyn ApacheObjectStore>> {
        self.stores
            .get(bucket.as_str())
            .ok_or_else(|| StorageError::BucketNotConfigured {
                bucket: bucket.clone(),
            })
    }
}

impl Default for ApacheObjectStoreAdapter {
    fn default() -> Self {
        Self::new()
    }
}

fn map_store_error(operation: &str, err: object_store::Error) -> StorageError {
    match &err {
        object_store::Error::Unauthenticated { .. } => StorageError::AuthenticationFailed {
            detail: err.to_string(),
        },
        object_store::Error::PermissionDenied { .. } => StorageError::PermissionDenied {
            operation: operation.to_string(),
            detail: err.to_string(),
        },
        _ => StorageError::Backend {
            operation: operation.to_string(),
            detail: err.to_string(),
        },
    }
}

#[async_trait]
impl ObjectStore for ApacheObjectStoreAdapter {
    async fn list_objects(&self, location: &Location) -> StorageResult<Vec<ObjectInfo>> {
        let store = self.resolve(location.bucket())?;
        let prefix = location.prefix().map(ObjectPath::from);

        let mut stream = store.list(prefix.as_ref());
        let mut objects = Vec::new();

        while let Some(result) = futures::StreamExt::next(&mut stream).await {
            let meta = result.map_err(|e| match &e {
                object_store::Error::Unauthenticated { .. } => {
                    StorageError::AuthenticationFailed {
                        detail: e.to_string(),
                    }
                }
                object_store::Error::PermissionDenied { .. } => StorageError::PermissionDenied {
                    operation: "list".to_string(),
                    detail: e.to_string(),
                },
                // A broken listing means the store is unreachable for
                // this task, not that one object failed.
                _ => StorageError::ConnectionFailed {
                    detail: e.to_string(),
                },
            })?;

            let key =
                ObjectKey::new(meta.location.to_string()).map_err(|e| StorageError::Backend {
                    operation: "list".to_string(),
                    detail: format!("invalid key in listing: {}", e),
                })?;

            objects.push(ObjectInfo {
                key,
                size: meta.size,
                last_modified: meta.last_modified,
            });
        }

        Ok(objects)
    }

    async fn get_object(&self, location: &Location, key: &ObjectKey) -> StorageResult<Bytes> {
        let store = self.resolve(location.bucket())?;
        let path = ObjectPath::from(key.as_str());

        let result = store.get(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => {
                StorageError::ObjectNotFound { key: key.clone() }
            }
            other => map_store_error("get", other),
        })?;

        result
            .bytes()
            .await
            .map_err(|e| map_store_error("get", e))
    }

    async fn put_object(
        &self,
        location: &Location,
        key: &ObjectKey,
        data: Bytes,
    ) -> StorageResult<()> {
        let store = self.resolve(location.bucket())?;
        let path = ObjectPath::from(key.as_str());

        store
            .put(&path, PutPayload::from(data))
            .await
            .map_err(|e| map_store_error("put", e))?;

        Ok(())
    }

    async fn copy_object(
        &self,
        source: &Location,
        source_key: &ObjectKey,
        destination: &Location,
        destination_key: &ObjectKey,
    ) -> StorageResult<()> {
        let from = ObjectPath::from(source_key.as_str());
        let to = ObjectPath::from(destination_key.as_str());

        if source.bucket() == destination.bucket() {
            let store = self.resolve(source.bucket())?;
            store.copy(&from, &to).await.map_err(|e| match e {
                object_store::Error::NotFound { .. } => StorageError::ObjectNotFound {
                    key: source_key.clone(),
                },
                other => map_store_error("copy", other),
            })?;
        } else {
            let source_store = self.resolve(source.bucket())?;
            let destination_store = self.resolve(destination.bucket())?;

            let result = source_store.get(&from).await.map_err(|e| match e {
                object_store::Error::NotFound { .. } => StorageError::ObjectNotFound {
                    key: source_key.clone(),
                },
                other => map_store_error("copy", other),
            })?;
            let data = result
                .bytes()
                .await
                .map_err(|e| map_store_error("copy", e))?;

            destination_store
                .put(&to, PutPayload::from(data))
                .await
                .map_err(|e| map_store_error("copy", e))?;
        }

        Ok(())
    }

    async fn delete_object(&self, location: &Location, key: &ObjectKey) -> StorageResult<()> {
        let store = self.resolve(location.bucket())?;
        let path = ObjectPath::from(key.as_str());

        store.delete(&path).await.map_err(|e| match e {
            object_store::Error::NotFound { .. } => {
                StorageError::ObjectNotFound { key: key.clone() }
            }
            other => map_store_error("delete", other),
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use object_store::memory::InMemory;

    fn bucket(name: &str) -> BucketName {
        BucketName::new(name.to_string()).unwrap()
    }

    fn key(name: &str) -> ObjectKey {
        ObjectKey::new(name.to_string()).unwrap()
    }

    fn single_bucket_adapter(name: &str) -> ApacheObjectStoreAdapter {
        ApacheObjectStoreAdapter::new().with_store(&bucket(name), Arc::new(InMemory::new()))
    }

    #[tokio::test]
    async fn test_basic_object_operations() {
        let adapter = single_bucket_adapter("events-in");
        let location = Location::new(bucket("events-in"));
        let key = key("in/part-00000");
        let data = Bytes::from_static(b"event data");

        adapter
            .put_object(&location, &key, data.clone())
            .await
            .unwrap();

        let retrieved = adapter.get_object(&location, &key).await.unwrap();
        assert_eq!(retrieved, data);

        let listed = adapter.list_objects(&location).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key, key);
        assert_eq!(listed[0].size, data.len() as u64);

        adapter.delete_object(&location, &key).await.unwrap();
        let err = adapter.get_object(&location, &key).await.unwrap_err();
        assert!(matches!(err, StorageError::ObjectNotFound { .. }));
    }

    #[tokio::test]
    async fn test_listing_honors_prefix() {
        let adapter = single_bucket_adapter("events-in");
        let whole = Location::new(bucket("events-in"));

        adapter
            .put_object(&whole, &key("in/part-00000"), Bytes::from_static(b"a"))
            .await
            .unwrap();
        adapter
            .put_object(&whole, &key("other/part-00000"), Bytes::from_static(b"b"))
            .await
            .unwrap();

        let scoped = Location::with_prefix(bucket("events-in"), "in").unwrap();
        let listed = adapter.list_objects(&scoped).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key.as_str(), "in/part-00000");
    }

    #[tokio::test]
    async fn test_copy_across_buckets() {
        let adapter = ApacheObjectStoreAdapter::new()
            .with_store(&bucket("events-in"), Arc::new(InMemory::new()))
            .with_store(&bucket("events-archive"), Arc::new(InMemory::new()));

        let source = Location::new(bucket("events-in"));
        let destination = Location::new(bucket("events-archive"));
        let data = Bytes::from_static(b"payload");

        adapter
            .put_object(&source, &key("in/a.txt"), data.clone())
            .await
            .unwrap();
        adapter
            .copy_object(&source, &key("in/a.txt"), &destination, &key("archive/a.txt"))
            .await
            .unwrap();

        let copied = adapter
            .get_object(&destination, &key("archive/a.txt"))
            .await
            .unwrap();
        assert_eq!(copied, data);

        // Source is untouched by a copy
        assert!(adapter.get_object(&source, &key("in/a.txt")).await.is_ok());
    }

    #[tokio::test]
    async fn test_unknown_bucket_is_a_connectivity_error() {
        let adapter = single_bucket_adapter("events-in");
        let location = Location::new(bucket("somewhere-else"));

        let err = adapter.list_objects(&location).await.unwrap_err();
        assert!(err.is_connectivity());
    }
}
