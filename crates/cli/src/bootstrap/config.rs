use sonar_ingest_domain::{CliOverrides, Config};
use tracing::info;

pub fn load_config(path: Option<&str>, overrides: CliOverrides) -> anyhow::Result<Config> {
    Ok(Config::load(path, overrides)?)
}

pub fn log_config(config: &Config) {
    info!(
        index = %config.ingest.index,
        source = %config.ingest.source,
        batch_size = config.ingest.batch_size,
        id_policy = config.ingest.id_policy.as_str(),
        pipeline = config.ingest.pipeline.as_str(),
        elasticsearch = %config.elasticsearch.url,
        "Configuration loaded"
    );
}
