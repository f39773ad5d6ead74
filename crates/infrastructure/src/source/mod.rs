pub mod decoder;
pub mod decompress;

pub use decoder::{RecordDecoder, MAX_ELEMENT_LEN};
pub use decompress::{open_source, Compression, SourceReader};
