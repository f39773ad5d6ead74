use sonar_ingest_application::use_cases::{EnsureIndexUseCase, IngestRecordsUseCase, IngestSettings};
use sonar_ingest_domain::{Config, IngestError};
use sonar_ingest_infrastructure::elasticsearch::ElasticsearchClient;
use std::sync::Arc;

pub struct UseCases {
    pub ensure_index: EnsureIndexUseCase,
    pub ingest_records: IngestRecordsUseCase,
}

impl UseCases {
    pub fn new(config: &Config) -> Result<Self, IngestError> {
        let client = Arc::new(ElasticsearchClient::new(&config.elasticsearch)?);
        let rules = Arc::new(config.normalize.rules());

        Ok(Self {
            ensure_index: EnsureIndexUseCase::new(client.clone()),
            ingest_records: IngestRecordsUseCase::new(
                client,
                rules,
                IngestSettings::from_config(&config.ingest),
            ),
        })
    }
}
