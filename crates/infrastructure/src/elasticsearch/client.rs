use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, StatusCode};
use serde::Deserialize;
use sonar_ingest_application::ports::{BulkSink, IndexManager};
use sonar_ingest_domain::config::ElasticsearchConfig;
use sonar_ingest_domain::{BulkOperation, BulkSummary, IngestError};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::bulk_body::{parse_bulk_summary, render_bulk_body};

const NDJSON_CONTENT_TYPE: &str = "application/x-ndjson";

const ALREADY_EXISTS: &str = "resource_already_exists_exception";

#[derive(Debug, Default, Deserialize)]
struct CreateIndexResponse {
    #[serde(default)]
    acknowledged: bool,
}

/// HTTP client for a single Elasticsearch cluster.
pub struct ElasticsearchClient {
    http: reqwest::Client,
    base_url: String,
    username: Option<String>,
    password: Option<String>,
    send_document_type: bool,
}

impl ElasticsearchClient {
    pub fn new(cfg: &ElasticsearchConfig) -> Result<Self, IngestError> {
        let http = reqwest::Client::builder()
            .use_rustls_tls()
            .user_agent(concat!("sonar-ingest/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .map_err(|e| IngestError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: cfg.url.trim_end_matches('/').to_string(),
            username: cfg.username.clone(),
            password: cfg.password.clone(),
            send_document_type: cfg.send_document_type,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.username {
            Some(user) => request.basic_auth(user, self.password.as_deref()),
            None => request,
        }
    }
}

#[async_trait]
impl IndexManager for ElasticsearchClient {
    async fn index_exists(&self, index: &str) -> Result<bool, IngestError> {
        let response = self
            .authorize(self.http.head(self.url(index)))
            .send()
            .await
            .map_err(|e| IngestError::IndexCreation(format!("HEAD {}: {}", index, e)))?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(IngestError::IndexCreation(format!(
                "HEAD {} returned HTTP {}",
                index,
                status.as_u16()
            ))),
        }
    }

    async fn create_index(
        &self,
        index: &str,
        body: &serde_json::Value,
    ) -> Result<bool, IngestError> {
        let response = self
            .authorize(self.http.put(self.url(index)))
            .json(body)
            .send()
            .await
            .map_err(|e| IngestError::IndexCreation(format!("PUT {}: {}", index, e)))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| IngestError::IndexCreation(format!("read error for {}: {}", index, e)))?;

        if status == StatusCode::BAD_REQUEST && text.contains(ALREADY_EXISTS) {
            info!(index, "Index created concurrently, reusing it");
            return Ok(true);
        }
        if !status.is_success() {
            return Err(IngestError::IndexCreation(format!(
                "PUT {} returned HTTP {}: {}",
                index,
                status.as_u16(),
                text
            )));
        }

        let parsed: CreateIndexResponse = serde_json::from_str(&text).unwrap_or_default();
        Ok(parsed.acknowledged)
    }
}

#[async_trait]
impl BulkSink for ElasticsearchClient {
    async fn bulk(&self, operations: Vec<BulkOperation>) -> Result<BulkSummary, IngestError> {
        let bulk_error = |reason: String| IngestError::BulkWrite { batch: 0, reason };

        let body = render_bulk_body(&operations, self.send_document_type)
            .map_err(|e| bulk_error(format!("serialize: {}", e)))?;
        debug!(operations = operations.len(), bytes = body.len(), "Sending bulk request");

        let response = self
            .authorize(self.http.post(self.url("_bulk")))
            .header(CONTENT_TYPE, NDJSON_CONTENT_TYPE)
            .body(body)
            .send()
            .await
            .map_err(|e| bulk_error(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| bulk_error(format!("read error: {}", e)))?;

        if !status.is_success() {
            let snippet = String::from_utf8_lossy(&bytes[..bytes.len().min(512)]).into_owned();
            return Err(bulk_error(format!("HTTP {}: {}", status.as_u16(), snippet)));
        }

        let summary = parse_bulk_summary(&bytes);
        if summary.item_errors {
            warn!(
                operations = operations.len(),
                "Bulk request accepted with per-document errors"
            );
        }
        Ok(summary)
    }
}
