use sonar_ingest_domain::{
    Batch, BulkOperation, CanonicalDocument, IdPolicy, IngestError, OpType,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error};

use crate::ports::BulkSink;
use crate::use_cases::IngestSettings;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushStats {
    pub documents: u64,
    pub batches: u64,
}

/// Groups documents into batches of `batch_size` and writes each full batch
/// through the sink before accepting the next document.
pub struct BatchAssembler {
    sink: Arc<dyn BulkSink>,
    index: String,
    document_type: String,
    id_policy: IdPolicy,
    op_type: OpType,
    batch: Batch,
    next_id: u64,
    stats: FlushStats,
}

impl BatchAssembler {
    pub fn new(sink: Arc<dyn BulkSink>, settings: &IngestSettings) -> Self {
        Self {
            sink,
            index: settings.index.clone(),
            document_type: settings.document_type.clone(),
            id_policy: settings.id_policy,
            op_type: settings.id_policy.op_type(),
            batch: Batch::with_capacity(settings.batch_size.max(1)),
            next_id: 1,
            stats: FlushStats::default(),
        }
    }

    pub async fn submit(&mut self, document: CanonicalDocument) -> Result<(), IngestError> {
        let id = match self.id_policy {
            IdPolicy::Auto => None,
            IdPolicy::Sequential => {
                let id = self.next_id;
                self.next_id += 1;
                Some(id.to_string())
            }
        };

        self.batch.push(BulkOperation {
            index: self.index.clone(),
            document_type: self.document_type.clone(),
            id,
            op_type: self.op_type,
            document,
        });

        if self.batch.is_full() {
            self.flush().await?;
        }
        Ok(())
    }

    /// Flushes the remaining partial batch, if any.
    pub async fn finish(mut self) -> Result<FlushStats, IngestError> {
        if !self.batch.is_empty() {
            debug!(pending = self.pending(), "Flushing final batch");
            self.flush().await?;
        }
        Ok(self.stats)
    }

    pub fn pending(&self) -> usize {
        self.batch.len()
    }

    async fn flush(&mut self) -> Result<(), IngestError> {
        let operations = self.batch.take();
        let count = operations.len();
        let batch_no = self.stats.batches + 1;
        let start = Instant::now();

        let summary = self.sink.bulk(operations).await.map_err(|e| {
            error!(error = %e, batch = batch_no, count, "Bulk write failed");
            match e {
                IngestError::BulkWrite { reason, .. } => IngestError::BulkWrite {
                    batch: batch_no,
                    reason,
                },
                other => IngestError::BulkWrite {
                    batch: batch_no,
                    reason: other.to_string(),
                },
            }
        })?;

        self.stats.batches = batch_no;
        self.stats.documents += count as u64;

        let elapsed = start.elapsed();
        debug!(
            batch = batch_no,
            count,
            total = self.stats.documents,
            took_ms = summary.took_ms,
            item_errors = summary.item_errors,
            duration_ms = elapsed.as_millis(),
            throughput = (count as f64 / elapsed.as_secs_f64().max(f64::EPSILON)) as u64,
            "Batch flushed"
        );
        Ok(())
    }
}
