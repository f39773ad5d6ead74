use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ElasticsearchConfig {
    #[serde(default = "default_url")]
    pub url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default)]
    pub password: Option<String>,

    /// Emit `_type` in bulk action lines. Only 6.x/7.x clusters accept it.
    #[serde(default)]
    pub send_document_type: bool,

    #[serde(default = "default_number_of_shards")]
    pub number_of_shards: u32,

    #[serde(default)]
    pub number_of_replicas: u32,
}

impl Default for ElasticsearchConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            timeout_secs: default_timeout_secs(),
            username: None,
            password: None,
            send_document_type: false,
            number_of_shards: default_number_of_shards(),
            number_of_replicas: 0,
        }
    }
}

fn default_url() -> String {
    "http://127.0.0.1:9200".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_number_of_shards() -> u32 {
    1
}
