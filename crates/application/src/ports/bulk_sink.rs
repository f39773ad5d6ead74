use async_trait::async_trait;
use sonar_ingest_domain::{BulkOperation, BulkSummary, IngestError};

/// Write side of the document store.
///
/// A returned error means the call itself failed. Per-document failures
/// inside a successful call surface only through [`BulkSummary`].
#[async_trait]
pub trait BulkSink: Send + Sync {
    async fn bulk(&self, operations: Vec<BulkOperation>) -> Result<BulkSummary, IngestError>;
}
