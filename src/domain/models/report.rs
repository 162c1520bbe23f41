use serde::Serialize;

use crate::domain::value_objects::ObjectKey;

/// What happened to a single enumerated key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransferStatus {
    /// Fetched from the source and written to local disk
    Downloaded { bytes: u64 },
    /// Copied to the destination and deleted from the source
    Moved { bytes: u64 },
    /// Filtered out; no network call was made
    Skipped,
    /// Transfer attempted and failed; the source object is untouched
    Failed { error: String },
    /// The copy succeeded but the source delete failed, so the object
    /// now exists in both locations and needs manual reconciliation
    CopiedButNotDeleted { error: String },
}

/// Per-key result of a bulk transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransferOutcome {
    pub key: ObjectKey,
    pub status: TransferStatus,
}

/// Aggregate record of one bulk-transfer invocation. Every key
/// enumerated at the source appears exactly once, classified as skipped
/// or attempted.
#[derive(Debug, Default, Serialize)]
pub struct TransferReport {
    outcomes: Vec<TransferOutcome>,
    cancelled: bool,
}

impl TransferReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: TransferOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn record(&mut self, key: ObjectKey, status: TransferStatus) {
        self.push(TransferOutcome { key, status });
    }

    pub fn outcomes(&self) -> &[TransferOutcome] {
        &self.outcomes
    }

    pub fn skipped(&self) -> usize {
        self.count(|status| matches!(status, TransferStatus::Skipped))
    }

    /// Keys for which a transfer was tried, regardless of how it ended
    pub fn attempted(&self) -> usize {
        self.outcomes.len() - self.skipped()
    }

    pub fn succeeded(&self) -> usize {
        self.count(|status| {
            matches!(
                status,
                TransferStatus::Downloaded { .. } | TransferStatus::Moved { .. }
            )
        })
    }

    pub fn failed(&self) -> usize {
        self.count(|status| {
            matches!(
                status,
                TransferStatus::Failed { .. } | TransferStatus::CopiedButNotDeleted { .. }
            )
        })
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|outcome| match outcome.status {
                TransferStatus::Downloaded { bytes } | TransferStatus::Moved { bytes } => bytes,
                _ => 0,
            })
            .sum()
    }

    /// Whether the task was cancelled before every key was issued
    pub fn cancelled(&self) -> bool {
        self.cancelled
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }

    pub fn is_complete_success(&self) -> bool {
        self.failed() == 0 && !self.cancelled
    }

    fn count(&self, predicate: impl Fn(&TransferStatus) -> bool) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| predicate(&outcome.status))
            .count()
    }
}

impl std::fmt::Display for TransferReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} attempted, {} succeeded, {} failed, {} skipped ({} bytes)",
            self.attempted(),
            self.succeeded(),
            self.failed(),
            self.skipped(),
            self.bytes_transferred()
        )?;
        if self.cancelled {
            write!(f, " [cancelled]")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> ObjectKey {
        ObjectKey::new(name.to_string()).unwrap()
    }

    #[test]
    fn test_counts() {
        let mut report = TransferReport::new();
        report.record(key("a"), TransferStatus::Downloaded { bytes: 10 });
        report.record(key("b"), TransferStatus::Skipped);
        report.record(
            key("c"),
            TransferStatus::Failed {
                error: "boom".to_string(),
            },
        );
        report.record(
            key("d"),
            TransferStatus::CopiedButNotDeleted {
                error: "delete refused".to_string(),
            },
        );

        assert_eq!(report.attempted(), 3);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.bytes_transferred(), 10);
        assert!(!report.is_complete_success());
    }

    #[test]
    fn test_complete_success() {
        let mut report = TransferReport::new();
        report.record(key("a"), TransferStatus::Moved { bytes: 4 });
        report.record(key("b"), TransferStatus::Skipped);

        assert!(report.is_complete_success());

        report.mark_cancelled();
        assert!(!report.is_complete_success());
    }

    #[test]
    fn test_display_summary() {
        let mut report = TransferReport::new();
        report.record(key("a"), TransferStatus::Downloaded { bytes: 7 });

        assert_eq!(
            report.to_string(),
            "1 attempted, 1 succeeded, 0 failed, 0 skipped (7 bytes)"
        );
    }
}
