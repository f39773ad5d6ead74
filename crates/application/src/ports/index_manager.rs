use async_trait::async_trait;
use sonar_ingest_domain::IngestError;

#[async_trait]
pub trait IndexManager: Send + Sync {
    async fn index_exists(&self, index: &str) -> Result<bool, IngestError>;

    /// Creates the index with the given settings and mappings body.
    /// Returns whether the store acknowledged the creation.
    async fn create_index(
        &self,
        index: &str,
        body: &serde_json::Value,
    ) -> Result<bool, IngestError>;
}
