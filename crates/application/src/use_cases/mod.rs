pub mod ensure_index;
pub mod ingest_records;

pub use ensure_index::EnsureIndexUseCase;
pub use ingest_records::{DropCounts, IngestRecordsUseCase, IngestReport, IngestSettings};
