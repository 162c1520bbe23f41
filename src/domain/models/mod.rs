pub mod filter;
pub mod report;

pub use filter::{ExcludePattern, IncludeAll, KeyFilter};
pub use report::{TransferOutcome, TransferReport, TransferStatus};
