pub mod elasticsearch;
pub mod errors;
pub mod ingest;
pub mod logging;
pub mod normalize;
pub mod root;

pub use elasticsearch::ElasticsearchConfig;
pub use errors::ConfigError;
pub use ingest::{IngestConfig, PipelineMode};
pub use logging::{LogFormat, LoggingConfig};
pub use normalize::NormalizeConfig;
pub use root::{CliOverrides, Config};
