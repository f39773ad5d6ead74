use crate::ports::IndexManager;
use sonar_ingest_domain::IngestError;
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub struct EnsureIndexUseCase {
    index_manager: Arc<dyn IndexManager>,
}

impl EnsureIndexUseCase {
    pub fn new(index_manager: Arc<dyn IndexManager>) -> Self {
        Self { index_manager }
    }

    /// Creates `index` with `body` unless it already exists.
    /// Returns whether the index was created by this call.
    #[instrument(skip(self, body))]
    pub async fn execute(&self, index: &str, body: &serde_json::Value) -> Result<bool, IngestError> {
        let exists = self
            .index_manager
            .index_exists(index)
            .await
            .map_err(into_index_error)?;

        if exists {
            info!(index, "Index already exists");
            return Ok(false);
        }

        info!(index, "Creating index");
        let acknowledged = self
            .index_manager
            .create_index(index, body)
            .await
            .map_err(into_index_error)?;

        if !acknowledged {
            warn!(index, "Index creation was not acknowledged");
        }
        Ok(true)
    }
}

fn into_index_error(e: IngestError) -> IngestError {
    match e {
        IngestError::IndexCreation(_) => e,
        other => IngestError::IndexCreation(other.to_string()),
    }
}
