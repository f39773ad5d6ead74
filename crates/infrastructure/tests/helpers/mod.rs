mod es_server_mock;
mod source_files;

pub use es_server_mock::*;
pub use source_files::*;
