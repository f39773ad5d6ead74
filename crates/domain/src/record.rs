use serde::{Deserialize, Serialize};

/// One observation as it appears in the passive-DNS dump.
///
/// Every field defaults to the empty string so partially populated
/// elements still decode; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type", default)]
    pub record_type: String,

    #[serde(default)]
    pub value: String,
}

impl RawRecord {
    pub fn new(name: &str, record_type: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            record_type: record_type.to_string(),
            value: value.to_string(),
        }
    }
}

/// Store-ready document matching the strict index mapping.
///
/// Optional fields are omitted from the serialized body when unset, so the
/// document never carries a field the mapping does not declare and never
/// sends an empty string to the `ip` typed `address` field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalDocument {
    pub name: String,

    #[serde(rename = "type")]
    pub record_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i16>,

    /// Reserved for SRV records, never populated by the current rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i16>,

    /// Reserved for SRV records, never populated by the current rules.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<i16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl CanonicalDocument {
    /// Starts a document from the raw record with its payload in `value`.
    pub fn from_raw(raw: &RawRecord) -> Self {
        Self {
            name: raw.name.clone(),
            record_type: raw.record_type.clone(),
            value: non_empty(&raw.value),
            ..Self::default()
        }
    }

    pub fn has_payload(&self) -> bool {
        let filled = |field: &Option<String>| field.as_deref().is_some_and(|s| !s.is_empty());
        filled(&self.value) || filled(&self.address)
    }

    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    pub fn address_str(&self) -> &str {
        self.address.as_deref().unwrap_or("")
    }
}

pub(crate) fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}
