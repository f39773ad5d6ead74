use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::bulk::{IdPolicy, DEFAULT_BATCH_SIZE, DEFAULT_DOCUMENT_TYPE};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    #[serde(default = "default_index")]
    pub index: String,

    #[serde(default = "default_source")]
    pub source: String,

    /// Maximum documents per bulk call, also the hand-off queue capacity.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default)]
    pub id_policy: IdPolicy,

    #[serde(default)]
    pub pipeline: PipelineMode,

    #[serde(default = "default_document_type")]
    pub document_type: String,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            index: default_index(),
            source: default_source(),
            batch_size: default_batch_size(),
            id_policy: IdPolicy::default(),
            pipeline: PipelineMode::default(),
            document_type: default_document_type(),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PipelineMode {
    /// Decode, normalize and flush on one sequential path.
    Synchronous,

    /// Producer and consumer joined by a bounded queue.
    #[default]
    Decoupled,
}

impl PipelineMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Synchronous => "synchronous",
            Self::Decoupled => "decoupled",
        }
    }
}

impl FromStr for PipelineMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "synchronous" | "sync" => Ok(Self::Synchronous),
            "decoupled" => Ok(Self::Decoupled),
            other => Err(format!("unknown pipeline mode: {}", other)),
        }
    }
}

fn default_index() -> String {
    "sonar".to_string()
}

fn default_source() -> String {
    "2021-02-26-1614298129-fdns_any.json.gz".to_string()
}

fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_document_type() -> String {
    DEFAULT_DOCUMENT_TYPE.to_string()
}
