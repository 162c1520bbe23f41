use object_store::aws::AmazonS3Builder;
use object_store::memory::InMemory;
use std::path::PathBuf;
use std::sync::Arc;

use crate::{
    adapters::outbound::storage::ApacheObjectStoreAdapter,
    domain::{
        errors::ValidationError,
        models::{ExcludePattern, IncludeAll, KeyFilter},
        value_objects::Location,
    },
    ports::storage::ObjectStore,
    services::BulkTransferTask,
};

/// Configuration for the transfer application
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Source location, `bucket` or `bucket/prefix`
    pub source_bucket: String,
    /// Archive location, `bucket` or `bucket/prefix`
    pub archive_bucket: String,
    /// Local directory downloads land in
    pub download_dir: PathBuf,
    /// Keys matching this pattern are excluded from downloads
    pub exclude_pattern: Option<String>,
    pub backend: StorageBackend,
}

/// Storage backend configuration
#[derive(Debug, Clone)]
pub enum StorageBackend {
    InMemory,
    S3 {
        region: String,
        access_key: Option<String>,
        secret_key: Option<String>,
        endpoint: Option<String>,
    },
}

/// Wired application services: the transfer task plus the parsed
/// locations and filter it will be driven with
pub struct AppServices {
    pub task: BulkTransferTask,
    pub store: Arc<dyn ObjectStore>,
    pub source: Location,
    pub archive: Location,
    pub download_dir: PathBuf,
    pub download_filter: Arc<dyn KeyFilter>,
}

/// Application builder for dependency injection
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Build the wired services. Malformed locations or filter
    /// patterns fail here, before any transfer begins.
    pub fn build(self) -> Result<AppServices, AppError> {
        let source: Location = self.config.source_bucket.parse().map_err(config_error)?;
        let archive: Location = self.config.archive_bucket.parse().map_err(config_error)?;

        let download_filter: Arc<dyn KeyFilter> = match &self.config.exclude_pattern {
            Some(pattern) => Arc::new(ExcludePattern::new(pattern).map_err(config_error)?),
            None => Arc::new(IncludeAll),
        };

        let store = self.create_store(&source, &archive)?;
        let task = BulkTransferTask::new(store.clone());

        Ok(AppServices {
            task,
            store,
            source,
            archive,
            download_dir: self.config.download_dir.clone(),
            download_filter,
        })
    }

    /// One object_store backend per distinct bucket. Source and archive
    /// sharing a bucket must share the backend instance.
    fn create_store(
        &self,
        source: &Location,
        archive: &Location,
    ) -> Result<Arc<dyn ObjectStore>, AppError> {
        let mut buckets = vec![source.bucket()];
        if archive.bucket() != source.bucket() {
            buckets.push(archive.bucket());
        }

        let mut adapter = ApacheObjectStoreAdapter::new();
        for bucket in buckets {
            let backend: Arc<dyn object_store::ObjectStore> = match &self.config.backend {
                StorageBackend::InMemory => Arc::new(InMemory::new()),
                StorageBackend::S3 {
                    region,
                    access_key,
                    secret_key,
                    endpoint,
                } => {
                    let mut builder = AmazonS3Builder::new()
                        .with_bucket_name(bucket.as_str())
                        .with_region(region);

                    if let Some(access_key) = access_key {
                        builder = builder.with_access_key_id(access_key);
                    }
                    if let Some(secret_key) = secret_key {
                        builder = builder.with_secret_access_key(secret_key);
                    }
                    if let Some(endpoint) = endpoint {
                        builder = builder.with_endpoint(endpoint);
                    }

                    Arc::new(builder.build().map_err(|e| AppError::StorageInit {
                        message: e.to_string(),
                    })?)
                }
            };
            adapter = adapter.with_store(bucket, backend);
        }

        Ok(Arc::new(adapter))
    }
}

fn config_error(e: ValidationError) -> AppError {
    AppError::Configuration {
        message: e.to_string(),
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Storage initialization error: {message}")]
    StorageInit { message: String },
}

/// Create an in-memory application for testing and development
pub fn create_in_memory_app(
    source_bucket: &str,
    archive_bucket: &str,
) -> Result<AppServices, AppError> {
    AppBuilder::new(AppConfig {
        source_bucket: source_bucket.to_string(),
        archive_bucket: archive_bucket.to_string(),
        download_dir: PathBuf::from("downloads"),
        exclude_pattern: None,
        backend: StorageBackend::InMemory,
    })
    .build()
}

/// Create an S3-backed application
pub fn create_s3_app(config: AppConfig) -> Result<AppServices, AppError> {
    AppBuilder::new(config).build()
}

/// Create application from environment variables
pub fn create_app_from_env() -> Result<AppServices, AppError> {
    let source_bucket =
        std::env::var("SOURCE_BUCKET").map_err(|_| AppError::Configuration {
            message: "SOURCE_BUCKET environment variable required".to_string(),
        })?;
    let archive_bucket =
        std::env::var("ARCHIVE_BUCKET").map_err(|_| AppError::Configuration {
            message: "ARCHIVE_BUCKET environment variable required".to_string(),
        })?;
    let download_dir = std::env::var("DOWNLOAD_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("downloads"));
    let exclude_pattern = std::env::var("EXCLUDE_PATTERN").ok();

    let backend = match std::env::var("STORAGE_BACKEND").as_deref() {
        Ok("memory") => StorageBackend::InMemory,
        _ => StorageBackend::S3 {
            region: std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            access_key: std::env::var("S3_ACCESS_KEY").ok(),
            secret_key: std::env::var("S3_SECRET_KEY").ok(),
            endpoint: std::env::var("S3_ENDPOINT").ok(),
        },
    };

    AppBuilder::new(AppConfig {
        source_bucket,
        archive_bucket,
        download_dir,
        exclude_pattern,
        backend,
    })
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_in_memory_app() {
        let services = create_in_memory_app("events-in", "events-archive").unwrap();

        assert_eq!(services.source.bucket().as_str(), "events-in");
        assert_eq!(services.archive.bucket().as_str(), "events-archive");
    }

    #[test]
    fn test_bad_location_is_a_configuration_error() {
        let result = create_in_memory_app("Bad_Bucket", "events-archive");
        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }

    #[test]
    fn test_bad_exclude_pattern_is_a_configuration_error() {
        let result = AppBuilder::new(AppConfig {
            source_bucket: "events-in".to_string(),
            archive_bucket: "events-archive".to_string(),
            download_dir: PathBuf::from("downloads"),
            exclude_pattern: Some("(unclosed".to_string()),
            backend: StorageBackend::InMemory,
        })
        .build();

        assert!(matches!(result, Err(AppError::Configuration { .. })));
    }
}
