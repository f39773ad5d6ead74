pub mod bulk_body;
pub mod client;
pub mod mapping;

pub use bulk_body::{parse_bulk_summary, render_bulk_body};
pub use client::ElasticsearchClient;
pub use mapping::index_mapping;
