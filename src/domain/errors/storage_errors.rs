use crate::domain::value_objects::{BucketName, ObjectKey};

/// Errors surfaced by the object-storage collaborator
#[derive(Debug, Clone)]
pub enum StorageError {
    /// No backend registered for the requested bucket
    BucketNotConfigured { bucket: BucketName },

    /// Object not found
    ObjectNotFound { key: ObjectKey },

    /// Access denied by the store
    PermissionDenied { operation: String, detail: String },

    /// Credentials rejected by the store
    AuthenticationFailed { detail: String },

    /// The store could not be reached while enumerating
    ConnectionFailed { detail: String },

    /// Any other backend failure (transient I/O, timeout, throttling)
    Backend { operation: String, detail: String },
}

impl StorageError {
    /// Whether this error means the store itself is unreachable, as
    /// opposed to a single object operation failing
    pub fn is_connectivity(&self) -> bool {
        matches!(
            self,
            StorageError::BucketNotConfigured { .. }
                | StorageError::AuthenticationFailed { .. }
                | StorageError::ConnectionFailed { .. }
        )
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::BucketNotConfigured { bucket } => {
                write!(f, "No storage backend configured for bucket: {}", bucket)
            }
            StorageError::ObjectNotFound { key } => {
                write!(f, "Object not found: {}", key)
            }
            StorageError::PermissionDenied { operation, detail } => {
                write!(f, "Access denied during '{}': {}", operation, detail)
            }
            StorageError::AuthenticationFailed { detail } => {
                write!(f, "Authentication failed: {}", detail)
            }
            StorageError::ConnectionFailed { detail } => {
                write!(f, "Cannot reach the object store: {}", detail)
            }
            StorageError::Backend { operation, detail } => {
                write!(f, "Storage backend error during '{}': {}", operation, detail)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;
