use clap::Parser;
use sonar_ingest_domain::{CliOverrides, Config, IdPolicy, IngestError, PipelineMode};
use sonar_ingest_infrastructure::elasticsearch::index_mapping;
use sonar_ingest_infrastructure::source::open_source;
use std::path::Path;
use std::process::ExitCode;
use tracing::{error, info};

mod bootstrap;
mod di;

#[derive(Parser)]
#[command(name = "sonar-ingest")]
#[command(version)]
#[command(about = "Load a Project Sonar forward-DNS dump into Elasticsearch")]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long, value_name = "FILE")]
    config: Option<String>,

    /// Target index name
    #[arg(short = 'i', long)]
    index: Option<String>,

    /// Source dump (gzip or plain JSON)
    #[arg(short = 'f', long, value_name = "FILE")]
    file: Option<String>,

    /// Documents per bulk request
    #[arg(short = 'b', long)]
    batch_size: Option<usize>,

    /// Document id policy (auto, sequential)
    #[arg(long)]
    id_policy: Option<IdPolicy>,

    /// Pipeline mode (synchronous, decoupled)
    #[arg(long)]
    pipeline: Option<PipelineMode>,

    /// Elasticsearch base URL
    #[arg(long, value_name = "URL")]
    es_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            index: self.index.clone(),
            source: self.file.clone(),
            batch_size: self.batch_size,
            id_policy: self.id_policy,
            pipeline: self.pipeline,
            elasticsearch_url: self.es_url.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = bootstrap::load_config(cli.config.as_deref(), cli.overrides())?;
    bootstrap::init_logging(&config.logging);

    info!("Starting sonar-ingest v{}", env!("CARGO_PKG_VERSION"));
    bootstrap::log_config(&config);

    match run(&config).await {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) => {
            error!(stage = e.stage(), error = %e, "Ingestion failed");
            Ok(ExitCode::FAILURE)
        }
    }
}

async fn run(config: &Config) -> Result<(), IngestError> {
    config.validate()?;
    let use_cases = di::UseCases::new(config)?;

    let mapping = index_mapping(
        config.elasticsearch.number_of_shards,
        config.elasticsearch.number_of_replicas,
    );
    use_cases
        .ensure_index
        .execute(&config.ingest.index, &mapping)
        .await?;

    let source = open_source(Path::new(&config.ingest.source))?;
    let report = use_cases.ingest_records.execute(source).await?;

    info!(
        records = report.records_read,
        documents = report.documents_indexed,
        batches = report.batches_flushed,
        "Done"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_map_to_overrides() {
        let cli = Cli::try_parse_from([
            "sonar-ingest",
            "-i",
            "fdns",
            "-f",
            "dump.json.gz",
            "-b",
            "500",
            "--id-policy",
            "sequential",
            "--pipeline",
            "sync",
            "--es-url",
            "http://es:9200",
        ])
        .unwrap();

        let overrides = cli.overrides();

        assert_eq!(overrides.index.as_deref(), Some("fdns"));
        assert_eq!(overrides.source.as_deref(), Some("dump.json.gz"));
        assert_eq!(overrides.batch_size, Some(500));
        assert_eq!(overrides.id_policy, Some(IdPolicy::Sequential));
        assert_eq!(overrides.pipeline, Some(PipelineMode::Synchronous));
        assert_eq!(overrides.elasticsearch_url.as_deref(), Some("http://es:9200"));
        assert!(overrides.log_level.is_none());
    }

    #[test]
    fn test_unknown_pipeline_is_rejected() {
        assert!(Cli::try_parse_from(["sonar-ingest", "--pipeline", "parallel"]).is_err());
    }
}
