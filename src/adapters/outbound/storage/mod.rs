// Storage implementations
pub mod apache_object_store_adapter;

// Re-export key types
pub use apache_object_store_adapter::ApacheObjectStoreAdapter;
