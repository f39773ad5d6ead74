pub mod elasticsearch;
pub mod source;
