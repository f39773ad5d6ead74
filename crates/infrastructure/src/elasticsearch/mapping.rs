use serde_json::{json, Value};

/// Settings and strict mapping for the passive-DNS index.
///
/// `dynamic: strict` makes the store reject documents carrying fields that
/// are not declared here.
pub fn index_mapping(number_of_shards: u32, number_of_replicas: u32) -> Value {
    json!({
        "settings": {
            "number_of_shards": number_of_shards,
            "number_of_replicas": number_of_replicas
        },
        "mappings": {
            "dynamic": "strict",
            "properties": {
                "name": { "type": "keyword" },
                "type": { "type": "keyword" },
                "priority": { "type": "short" },
                "weight": { "type": "short" },
                "port": { "type": "short" },
                "value": { "type": "keyword" },
                "address": { "type": "ip" }
            }
        }
    })
}
