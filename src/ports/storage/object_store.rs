use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::domain::{
    errors::StorageResult,
    value_objects::{Location, ObjectKey},
};

/// Port for the object-storage collaborator. This abstracts the actual
/// backend (S3, in-memory, ...). Implementations must be safe to share
/// across concurrent per-key operations; the transfer task only ever
/// holds the handle read-only.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Enumerate every object under a location. The returned listing is
    /// finite and complete; access failures surface as connectivity or
    /// authentication error kinds.
    async fn list_objects(&self, location: &Location) -> StorageResult<Vec<ObjectInfo>>;

    /// Fetch an object's bytes
    async fn get_object(&self, location: &Location, key: &ObjectKey) -> StorageResult<Bytes>;

    /// Store an object's bytes
    async fn put_object(
        &self,
        location: &Location,
        key: &ObjectKey,
        data: Bytes,
    ) -> StorageResult<()>;

    /// Copy one object between locations, possibly across buckets
    async fn copy_object(
        &self,
        source: &Location,
        source_key: &ObjectKey,
        destination: &Location,
        destination_key: &ObjectKey,
    ) -> StorageResult<()>;

    /// Delete an object
    async fn delete_object(&self, location: &Location, key: &ObjectKey) -> StorageResult<()>;
}

/// One entry of a listing
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub key: ObjectKey,
    pub size: u64,
    pub last_modified: DateTime<Utc>,
}
