use crate::domain::errors::StorageError;

/// Fatal errors that abort a bulk transfer before per-key processing.
/// Per-key failures are never raised as errors; they are recorded as
/// outcomes in the TransferReport.
#[derive(Debug, Clone)]
pub enum TransferError {
    /// Malformed inputs detected before any transfer begins
    Configuration { message: String },

    /// The source could not be enumerated (unreachable store, rejected
    /// credentials); no report is produced
    Connectivity { error: StorageError },
}

impl std::fmt::Display for TransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransferError::Configuration { message } => {
                write!(f, "Transfer configuration error: {}", message)
            }
            TransferError::Connectivity { error } => {
                write!(f, "Cannot enumerate source: {}", error)
            }
        }
    }
}

impl std::error::Error for TransferError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransferError::Configuration { .. } => None,
            TransferError::Connectivity { error } => Some(error),
        }
    }
}
