mod bulk_sink;
mod index_manager;

pub use bulk_sink::BulkSink;
pub use index_manager::IndexManager;
