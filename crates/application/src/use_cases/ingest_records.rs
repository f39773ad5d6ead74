use sonar_ingest_domain::config::IngestConfig;
use sonar_ingest_domain::{
    CanonicalDocument, DropReason, IdPolicy, IngestError, NormalizationRules, Normalized,
    PipelineMode, RawRecord,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::ports::BulkSink;
use crate::services::{BatchAssembler, FlushStats};

#[derive(Debug, Clone)]
pub struct IngestSettings {
    pub index: String,
    pub document_type: String,
    pub batch_size: usize,
    pub id_policy: IdPolicy,
    pub mode: PipelineMode,
}

impl IngestSettings {
    pub fn from_config(cfg: &IngestConfig) -> Self {
        Self {
            index: cfg.index.clone(),
            document_type: cfg.document_type.clone(),
            batch_size: cfg.batch_size,
            id_policy: cfg.id_policy,
            mode: cfg.pipeline,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropCounts {
    pub skipped: u64,
    pub namespaced: u64,
    pub unrecognized: u64,
    pub malformed: u64,
    pub empty: u64,
}

impl DropCounts {
    fn record(&mut self, reason: &DropReason) {
        match reason {
            DropReason::Skipped => self.skipped += 1,
            DropReason::UnknownNamespaced => self.namespaced += 1,
            DropReason::Unrecognized(_) => self.unrecognized += 1,
            DropReason::MalformedPriority(_) => self.malformed += 1,
            DropReason::EmptyPayload => self.empty += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.skipped + self.namespaced + self.unrecognized + self.malformed + self.empty
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub records_read: u64,
    pub documents_indexed: u64,
    pub batches_flushed: u64,
    pub dropped: DropCounts,
}

impl IngestReport {
    fn new(produced: ProducerStats, flushed: FlushStats) -> Self {
        Self {
            records_read: produced.records_read,
            documents_indexed: flushed.documents,
            batches_flushed: flushed.batches,
            dropped: produced.dropped,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct ProducerStats {
    records_read: u64,
    dropped: DropCounts,
}

/// Decode + normalize half of the pipeline.
struct RecordProducer {
    rules: Arc<NormalizationRules>,
    abort: Option<CancellationToken>,
    stats: ProducerStats,
}

impl RecordProducer {
    fn new(rules: Arc<NormalizationRules>) -> Self {
        Self {
            rules,
            abort: None,
            stats: ProducerStats::default(),
        }
    }

    /// Stops pulling records as soon as `abort` is cancelled.
    fn with_abort(mut self, abort: CancellationToken) -> Self {
        self.abort = Some(abort);
        self
    }

    fn is_aborted(&self) -> bool {
        self.abort.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Pulls records until one survives normalization or the source ends.
    /// The abort token is checked before every record, dropped ones included.
    fn next_document<I>(&mut self, records: &mut I) -> Result<Option<CanonicalDocument>, IngestError>
    where
        I: Iterator<Item = Result<RawRecord, IngestError>>,
    {
        loop {
            if self.is_aborted() {
                return Err(consumer_stopped());
            }
            let Some(record) = records.next() else {
                return Ok(None);
            };
            let raw = record?;
            self.stats.records_read += 1;

            match self.rules.normalize(&raw) {
                Normalized::Keep(doc) => return Ok(Some(doc)),
                Normalized::Drop(reason) => {
                    if reason.is_diagnostic() {
                        warn!(
                            element = self.stats.records_read,
                            name = %raw.name,
                            reason = %reason,
                            "Dropping record"
                        );
                    }
                    self.stats.dropped.record(&reason);
                }
            }
        }
    }
}

/// Drives a record source through normalization into the bulk sink.
pub struct IngestRecordsUseCase {
    sink: Arc<dyn BulkSink>,
    rules: Arc<NormalizationRules>,
    settings: IngestSettings,
}

impl IngestRecordsUseCase {
    pub fn new(
        sink: Arc<dyn BulkSink>,
        rules: Arc<NormalizationRules>,
        settings: IngestSettings,
    ) -> Self {
        Self {
            sink,
            rules,
            settings,
        }
    }

    #[instrument(skip(self, source), fields(index = %self.settings.index, mode = self.settings.mode.as_str()))]
    pub async fn execute<S>(&self, source: S) -> Result<IngestReport, IngestError>
    where
        S: IntoIterator<Item = Result<RawRecord, IngestError>> + Send + 'static,
        S::IntoIter: Send + 'static,
    {
        if self.settings.batch_size == 0 {
            return Err(IngestError::Aborted("batch size must be at least 1".to_string()));
        }

        let start = Instant::now();
        let report = match self.settings.mode {
            PipelineMode::Synchronous => self.run_synchronous(source.into_iter()).await?,
            PipelineMode::Decoupled => self.run_decoupled(source.into_iter()).await?,
        };

        info!(
            records = report.records_read,
            documents = report.documents_indexed,
            batches = report.batches_flushed,
            dropped = report.dropped.total(),
            skipped = report.dropped.skipped,
            unrecognized = report.dropped.unrecognized,
            malformed = report.dropped.malformed,
            elapsed_ms = start.elapsed().as_millis(),
            "Ingestion complete"
        );
        Ok(report)
    }

    /// Decode, normalize and flush on a single blocking worker. Each flush is
    /// awaited before the next record is read.
    async fn run_synchronous<I>(&self, mut records: I) -> Result<IngestReport, IngestError>
    where
        I: Iterator<Item = Result<RawRecord, IngestError>> + Send + 'static,
    {
        let handle = Handle::current();
        let mut producer = RecordProducer::new(self.rules.clone());
        let mut assembler = BatchAssembler::new(self.sink.clone(), &self.settings);

        tokio::task::spawn_blocking(move || -> Result<IngestReport, IngestError> {
            while let Some(doc) = producer.next_document(&mut records)? {
                handle.block_on(assembler.submit(doc))?;
            }
            let flushed = handle.block_on(assembler.finish())?;
            Ok(IngestReport::new(producer.stats, flushed))
        })
        .await
        .map_err(worker_failed)?
    }

    /// Producer on a blocking worker, consumer on an async task, joined by a
    /// bounded queue of `batch_size` documents.
    async fn run_decoupled<I>(&self, mut records: I) -> Result<IngestReport, IngestError>
    where
        I: Iterator<Item = Result<RawRecord, IngestError>> + Send + 'static,
    {
        let (sender, mut receiver) = mpsc::channel::<CanonicalDocument>(self.settings.batch_size);
        let abort = CancellationToken::new();

        let producer_abort = abort.clone();
        let mut producer = RecordProducer::new(self.rules.clone()).with_abort(abort.clone());
        let producer_task = tokio::task::spawn_blocking(move || -> Result<ProducerStats, IngestError> {
            loop {
                match producer.next_document(&mut records) {
                    Ok(Some(doc)) => {
                        if sender.blocking_send(doc).is_err() {
                            return Err(consumer_stopped());
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        // Cancel before the sender drops so the consumer skips the final flush.
                        producer_abort.cancel();
                        return Err(e);
                    }
                }
            }
            debug!(records = producer.stats.records_read, "Source exhausted, closing queue");
            drop(sender);
            Ok(producer.stats)
        });

        let consumer_abort = abort.clone();
        let mut assembler = BatchAssembler::new(self.sink.clone(), &self.settings);
        let consumer_task = tokio::spawn(async move {
            let result: Result<FlushStats, IngestError> = async {
                while let Some(doc) = receiver.recv().await {
                    if consumer_abort.is_cancelled() {
                        break;
                    }
                    assembler.submit(doc).await?;
                }
                if consumer_abort.is_cancelled() {
                    return Err(IngestError::Aborted(
                        "source failed before end of stream".to_string(),
                    ));
                }
                assembler.finish().await
            }
            .await;

            if result.is_err() {
                consumer_abort.cancel();
            }
            result
        });

        let (produced, flushed) = tokio::join!(producer_task, consumer_task);
        let produced = produced.map_err(worker_failed)?;
        let flushed = flushed.map_err(worker_failed)?;

        match (produced, flushed) {
            (Ok(produced), Ok(flushed)) => Ok(IngestReport::new(produced, flushed)),
            (Err(e), Ok(_)) | (Ok(_), Err(e)) => Err(e),
            (Err(producer_err), Err(consumer_err)) => {
                if matches!(producer_err, IngestError::Aborted(_)) {
                    Err(consumer_err)
                } else {
                    Err(producer_err)
                }
            }
        }
    }
}

fn consumer_stopped() -> IngestError {
    IngestError::Aborted("consumer stopped".to_string())
}

fn worker_failed(e: JoinError) -> IngestError {
    IngestError::Aborted(format!("pipeline worker failed: {}", e))
}
