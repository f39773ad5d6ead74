#![allow(dead_code)]

use async_trait::async_trait;
use sonar_ingest_application::ports::{BulkSink, IndexManager};
use sonar_ingest_domain::{BulkOperation, BulkSummary, IngestError, RawRecord};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct MockBulkSink {
    batches: Arc<RwLock<Vec<Vec<BulkOperation>>>>,
    calls: Arc<AtomicU64>,
    fail_on_call: Option<u64>,
    delay: Option<Duration>,
    observed_in_flight: Arc<RwLock<Vec<u64>>>,
    produced: Option<Arc<AtomicU64>>,
}

impl MockBulkSink {
    pub fn new() -> Self {
        Self {
            batches: Arc::new(RwLock::new(Vec::new())),
            calls: Arc::new(AtomicU64::new(0)),
            fail_on_call: None,
            delay: None,
            observed_in_flight: Arc::new(RwLock::new(Vec::new())),
            produced: None,
        }
    }

    /// Fails the n-th bulk call (1-based).
    pub fn failing_on(mut self, call: u64) -> Self {
        self.fail_on_call = Some(call);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Samples `produced - flushed` at the end of every call.
    pub fn observing(mut self, produced: Arc<AtomicU64>) -> Self {
        self.produced = Some(produced);
        self
    }

    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    pub async fn batches(&self) -> Vec<Vec<BulkOperation>> {
        self.batches.read().await.clone()
    }

    pub async fn batch_sizes(&self) -> Vec<usize> {
        self.batches.read().await.iter().map(Vec::len).collect()
    }

    pub async fn documents(&self) -> Vec<BulkOperation> {
        self.batches.read().await.iter().flatten().cloned().collect()
    }

    pub async fn observed_in_flight(&self) -> Vec<u64> {
        self.observed_in_flight.read().await.clone()
    }
}

#[async_trait]
impl BulkSink for MockBulkSink {
    async fn bulk(&self, operations: Vec<BulkOperation>) -> Result<BulkSummary, IngestError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(produced) = &self.produced {
            let flushed: usize = self.batches.read().await.iter().map(Vec::len).sum();
            let in_flight = produced.load(Ordering::SeqCst) - flushed as u64;
            self.observed_in_flight.write().await.push(in_flight);
        }

        if self.fail_on_call == Some(call) {
            return Err(IngestError::BulkWrite {
                batch: call,
                reason: "connection reset by peer".to_string(),
            });
        }

        self.batches.write().await.push(operations);
        Ok(BulkSummary {
            took_ms: 1,
            item_errors: false,
        })
    }
}

pub struct MockIndexManager {
    exists: AtomicBool,
    acknowledged: bool,
    should_fail: bool,
    created: Arc<RwLock<Vec<(String, serde_json::Value)>>>,
}

impl MockIndexManager {
    pub fn new() -> Self {
        Self {
            exists: AtomicBool::new(false),
            acknowledged: true,
            should_fail: false,
            created: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn existing() -> Self {
        let manager = Self::new();
        manager.exists.store(true, Ordering::SeqCst);
        manager
    }

    pub fn unacknowledged(mut self) -> Self {
        self.acknowledged = false;
        self
    }

    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::new()
        }
    }

    pub async fn created(&self) -> Vec<(String, serde_json::Value)> {
        self.created.read().await.clone()
    }
}

#[async_trait]
impl IndexManager for MockIndexManager {
    async fn index_exists(&self, _index: &str) -> Result<bool, IngestError> {
        if self.should_fail {
            return Err(IngestError::IndexCreation("connection refused".to_string()));
        }
        Ok(self.exists.load(Ordering::SeqCst))
    }

    async fn create_index(
        &self,
        index: &str,
        body: &serde_json::Value,
    ) -> Result<bool, IngestError> {
        self.created
            .write()
            .await
            .push((index.to_string(), body.clone()));
        self.exists.store(true, Ordering::SeqCst);
        Ok(self.acknowledged)
    }
}

/// Record source that counts how many records have been pulled from it.
pub struct CountingSource<I> {
    inner: I,
    produced: Arc<AtomicU64>,
}

impl<I> CountingSource<I> {
    pub fn new(inner: I) -> (Self, Arc<AtomicU64>) {
        let produced = Arc::new(AtomicU64::new(0));
        (
            Self {
                inner,
                produced: produced.clone(),
            },
            produced,
        )
    }
}

impl<I> Iterator for CountingSource<I>
where
    I: Iterator<Item = Result<RawRecord, IngestError>>,
{
    type Item = Result<RawRecord, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.inner.next()?;
        self.produced.fetch_add(1, Ordering::SeqCst);
        Some(item)
    }
}

pub fn address_records(count: usize) -> Vec<Result<RawRecord, IngestError>> {
    (0..count)
        .map(|i| {
            Ok(RawRecord::new(
                &format!("host{}.example.com", i),
                "a",
                &format!("10.{}.{}.{}", (i >> 16) & 0xff, (i >> 8) & 0xff, i & 0xff),
            ))
        })
        .collect()
}
