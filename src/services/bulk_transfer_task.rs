use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use futures::{StreamExt, stream};
use tokio::fs;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::{
    domain::{
        errors::TransferError,
        models::{KeyFilter, TransferOutcome, TransferReport, TransferStatus},
        value_objects::Location,
    },
    ports::storage::{ObjectInfo, ObjectStore},
};

const DEFAULT_CONCURRENCY: usize = 4;

/// Executes filtered bulk transfers against an object store: download a
/// matching subset to local disk, or move (archive) matching objects to
/// another location. Holds no global state; every dependency is passed
/// in explicitly.
pub struct BulkTransferTask {
    store: Arc<dyn ObjectStore>,
    concurrency: usize,
    cancel: CancellationToken,
}

impl BulkTransferTask {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            concurrency: DEFAULT_CONCURRENCY,
            cancel: CancellationToken::new(),
        }
    }

    /// Bound on in-flight per-key transfers. `1` gives strictly
    /// sequential processing.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Cooperative cancellation: once the token fires, no new per-key
    /// operations are issued; in-flight ones finish or fail naturally
    /// and their outcomes stay in the returned report.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Download every object under `source` that survives `filter` into
    /// `destination_dir`, preserving the key path relative to the
    /// source prefix. Per-key failures are recorded and do not abort
    /// the remaining keys.
    pub async fn download_matching(
        &self,
        source: &Location,
        destination_dir: &Path,
        filter: &dyn KeyFilter,
    ) -> Result<TransferReport, TransferError> {
        fs::create_dir_all(destination_dir)
            .await
            .map_err(|e| TransferError::Configuration {
                message: format!(
                    "cannot create download directory {}: {}",
                    destination_dir.display(),
                    e
                ),
            })?;

        info!(
            source = %source,
            destination = %destination_dir.display(),
            "downloading matching objects"
        );

        let report = self
            .run_filtered(source, filter, |info| {
                self.download_one(source, destination_dir, info)
            })
            .await?;

        info!(%report, "download finished");
        Ok(report)
    }

    /// Move every object under `source` that survives `filter` to
    /// `destination`: copy to the rebased key, then delete the source
    /// object only if the copy succeeded. A failed delete after a
    /// successful copy leaves the object in both locations and is
    /// recorded distinctly.
    pub async fn move_matching(
        &self,
        source: &Location,
        destination: &Location,
        filter: &dyn KeyFilter,
    ) -> Result<TransferReport, TransferError> {
        info!(source = %source, destination = %destination, "moving matching objects");

        let report = self
            .run_filtered(source, filter, |info| {
                self.move_one(source, destination, info)
            })
            .await?;

        info!(%report, "move finished");
        Ok(report)
    }

    /// Enumerate, filter, and run `per_key` over surviving keys with
    /// bounded concurrency. Every enumerated key ends up in the report
    /// exactly once: skipped without a network call, or with the
    /// outcome `per_key` produced.
    async fn run_filtered<F, Fut>(
        &self,
        source: &Location,
        filter: &dyn KeyFilter,
        per_key: F,
    ) -> Result<TransferReport, TransferError>
    where
        F: Fn(ObjectInfo) -> Fut,
        Fut: Future<Output = TransferOutcome>,
    {
        let listed = self
            .store
            .list_objects(source)
            .await
            .map_err(|error| TransferError::Connectivity { error })?;

        debug!(count = listed.len(), source = %source, "enumerated source objects");

        let mut report = TransferReport::new();
        let mut pending = Vec::new();
        for info in listed {
            if filter.matches(info.key.as_str()) {
                pending.push(info);
            } else {
                report.record(info.key, TransferStatus::Skipped);
            }
        }

        let outcomes: Vec<TransferOutcome> = stream::iter(pending)
            .take_until(self.cancel.cancelled())
            .map(per_key)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        for outcome in outcomes {
            report.push(outcome);
        }

        if self.cancel.is_cancelled() {
            report.mark_cancelled();
        }

        Ok(report)
    }

    async fn download_one(
        &self,
        source: &Location,
        destination_dir: &Path,
        info: ObjectInfo,
    ) -> TransferOutcome {
        let relative = source.relative_part_of(&info.key).to_string();

        let data = match self.store.get_object(source, &info.key).await {
            Ok(data) => data,
            Err(e) => {
                warn!(key = %info.key, error = %e, "fetch failed");
                return TransferOutcome {
                    key: info.key,
                    status: TransferStatus::Failed {
                        error: e.to_string(),
                    },
                };
            }
        };

        let local_path = local_file_path(destination_dir, &relative);
        if let Some(parent) = local_path.parent() {
            if let Err(e) = fs::create_dir_all(parent).await {
                warn!(key = %info.key, error = %e, "cannot create local directory");
                return TransferOutcome {
                    key: info.key,
                    status: TransferStatus::Failed {
                        error: e.to_string(),
                    },
                };
            }
        }

        match fs::write(&local_path, &data).await {
            Ok(()) => {
                debug!(key = %info.key, path = %local_path.display(), "downloaded");
                TransferOutcome {
                    key: info.key,
                    status: TransferStatus::Downloaded {
                        bytes: data.len() as u64,
                    },
                }
            }
            Err(e) => {
                warn!(key = %info.key, error = %e, "local write failed");
                TransferOutcome {
                    key: info.key,
                    status: TransferStatus::Failed {
                        error: e.to_string(),
                    },
                }
            }
        }
    }

    async fn move_one(
        &self,
        source: &Location,
        destination: &Location,
        info: ObjectInfo,
    ) -> TransferOutcome {
        let relative = source.relative_part_of(&info.key);
        let destination_key = match destination.resolve(relative) {
            Ok(key) => key,
            Err(e) => {
                return TransferOutcome {
                    key: info.key,
                    status: TransferStatus::Failed {
                        error: e.to_string(),
                    },
                };
            }
        };

        if let Err(e) = self
            .store
            .copy_object(source, &info.key, destination, &destination_key)
            .await
        {
            warn!(key = %info.key, error = %e, "copy failed, source left untouched");
            return TransferOutcome {
                key: info.key,
                status: TransferStatus::Failed {
                    error: e.to_string(),
                },
            };
        }

        match self.store.delete_object(source, &info.key).await {
            Ok(()) => {
                debug!(key = %info.key, destination_key = %destination_key, "moved");
                TransferOutcome {
                    key: info.key,
                    status: TransferStatus::Moved { bytes: info.size },
                }
            }
            Err(e) => {
                warn!(
                    key = %info.key,
                    destination_key = %destination_key,
                    error = %e,
                    "copy succeeded but delete failed, object exists in both locations"
                );
                TransferOutcome {
                    key: info.key,
                    status: TransferStatus::CopiedButNotDeleted {
                        error: e.to_string(),
                    },
                }
            }
        }
    }
}

/// Map a key path relative to the source prefix onto a path under the
/// destination directory
fn local_file_path(destination_dir: &Path, relative: &str) -> PathBuf {
    let mut path = destination_dir.to_path_buf();
    for segment in relative.split('/') {
        path.push(segment);
    }
    path
}
