//! Sonar Ingest Domain Layer
pub mod bulk;
pub mod config;
pub mod errors;
pub mod normalize;
pub mod record;

pub use bulk::{
    Batch, BulkOperation, BulkSummary, IdPolicy, OpType, DEFAULT_BATCH_SIZE,
    DEFAULT_DOCUMENT_TYPE,
};
pub use config::{CliOverrides, Config, ConfigError, PipelineMode};
pub use errors::IngestError;
pub use normalize::{DropReason, NormalizationRules, Normalized, RecordClass};
pub use record::{CanonicalDocument, RawRecord};
