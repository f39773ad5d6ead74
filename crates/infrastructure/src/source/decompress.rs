//! Compression detection for record sources.

use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use sonar_ingest_domain::IngestError;

use super::decoder::RecordDecoder;

const READ_BUFFER_SIZE: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    None,
    Gzip,
}

impl Compression {
    /// Detect compression format from magic bytes.
    pub fn detect(data: &[u8]) -> Self {
        match data {
            [0x1f, 0x8b, ..] => Compression::Gzip,
            _ => Compression::None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Gzip => "gzip",
        }
    }
}

pub type SourceReader = Box<dyn BufRead + Send>;

/// Opens `path` and returns a lazy decoder over its records.
///
/// Gzip input is recognised by its magic bytes; concatenated gzip members
/// are decoded as one stream.
pub fn open_source(path: &Path) -> Result<RecordDecoder<SourceReader>, IngestError> {
    let path_display = path.display().to_string();
    let open_err = |e: std::io::Error| IngestError::SourceOpen(path_display.clone(), e.to_string());

    let file = File::open(path).map_err(open_err)?;
    let mut reader = BufReader::with_capacity(READ_BUFFER_SIZE, file);
    let compression = Compression::detect(reader.fill_buf().map_err(open_err)?);

    let mut source: SourceReader = match compression {
        Compression::Gzip => Box::new(BufReader::with_capacity(
            READ_BUFFER_SIZE,
            MultiGzDecoder::new(reader),
        )),
        Compression::None => Box::new(reader),
    };

    if compression == Compression::Gzip {
        // Surfaces a corrupt header before the pipeline starts.
        source
            .fill_buf()
            .map_err(|e| IngestError::Decompress(e.to_string()))?;
    }

    tracing::info!(path = %path_display, compression = compression.as_str(), "Source opened");
    Ok(RecordDecoder::new(source).with_compression(compression))
}
