pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - value objects, filters, reports, errors
pub use domain::{
    BucketName,
    ExcludePattern,
    IncludeAll,
    // Filters
    KeyFilter,
    // Value objects
    Location,
    ObjectKey,
    // Errors
    StorageError,
    TransferError,
    // Reports
    TransferOutcome,
    TransferReport,
    TransferStatus,
    ValidationError,
};

// Port types - interfaces for external systems
pub use ports::{ObjectInfo, ObjectStore};

// Service implementations - the transfer task itself
pub use services::BulkTransferTask;

// Application factory and configuration
pub use app::{
    AppBuilder, AppConfig, AppError, AppServices, StorageBackend, create_app_from_env,
    create_in_memory_app, create_s3_app,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::ApacheObjectStoreAdapter;

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        ApacheObjectStoreAdapter, AppBuilder, AppConfig, AppServices, BucketName,
        BulkTransferTask, ExcludePattern, IncludeAll, KeyFilter, Location, ObjectKey,
        ObjectStore, TransferReport, TransferStatus, create_app_from_env, create_in_memory_app,
        create_s3_app,
    };
}
