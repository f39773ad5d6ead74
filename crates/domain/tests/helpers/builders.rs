#![allow(dead_code)]
use sonar_ingest_domain::RawRecord;

pub struct RawRecordBuilder {
    name: String,
    record_type: String,
    value: String,
}

impl RawRecordBuilder {
    pub fn new() -> Self {
        Self {
            name: "example.com".to_string(),
            record_type: "a".to_string(),
            value: "192.0.2.1".to_string(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn record_type(mut self, record_type: &str) -> Self {
        self.record_type = record_type.to_string();
        self
    }

    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn build(self) -> RawRecord {
        RawRecord::new(&self.name, &self.record_type, &self.value)
    }
}

impl Default for RawRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}
