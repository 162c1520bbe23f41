mod bulk_transfer_task;

pub use bulk_transfer_task::BulkTransferTask;
