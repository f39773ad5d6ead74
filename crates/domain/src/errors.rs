use thiserror::Error;

use crate::config::ConfigError;

#[derive(Error, Debug)]
pub enum IngestError {
    #[error("Failed to open source {0}: {1}")]
    SourceOpen(String, String),

    #[error("Failed to decompress source: {0}")]
    Decompress(String),

    #[error("Malformed record at element {element}: {reason}")]
    Decode { element: u64, reason: String },

    #[error("Document store client error: {0}")]
    Client(String),

    #[error("Index creation failed: {0}")]
    IndexCreation(String),

    #[error("Bulk write {batch} failed: {reason}")]
    BulkWrite { batch: u64, reason: String },

    #[error("Pipeline aborted: {0}")]
    Aborted(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl IngestError {
    /// Short name of the pipeline stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            IngestError::SourceOpen(..) => "open",
            IngestError::Decompress(_) => "decompress",
            IngestError::Decode { .. } => "decode",
            IngestError::Client(_) => "client",
            IngestError::IndexCreation(_) => "index",
            IngestError::BulkWrite { .. } => "bulk",
            IngestError::Aborted(_) => "pipeline",
            IngestError::Config(_) => "config",
        }
    }
}
