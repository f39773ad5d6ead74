//! Streaming decoder for passive-DNS dumps.
//!
//! Accepts either a top-level JSON array of objects or a sequence of objects
//! separated by whitespace (one per line in the FDNS dumps). The layout is
//! chosen from the first non-whitespace byte. Sequences go through
//! `serde_json`'s `StreamDeserializer`; array elements are framed one at a
//! time by tracking nesting and string escapes, then parsed from the framed
//! bytes. Only the current element is held in memory.

use serde_json::de::IoRead;
use serde_json::StreamDeserializer;
use std::io::{self, BufRead};

use sonar_ingest_domain::{IngestError, RawRecord};

use super::decompress::Compression;

/// Upper bound for a single array element. Anything larger means the framer
/// lost sync with the stream.
pub const MAX_ELEMENT_LEN: usize = 16 * 1024 * 1024;

/// Where the decoder stands when an error is raised.
#[derive(Debug, Clone, Copy)]
struct ErrorContext {
    compression: Compression,
    framed: u64,
}

impl ErrorContext {
    /// Error for the element following the ones already returned.
    fn framing(&self, reason: &str) -> IngestError {
        IngestError::Decode {
            element: self.framed + 1,
            reason: reason.to_string(),
        }
    }

    fn read(&self, e: io::Error) -> IngestError {
        match self.compression {
            Compression::Gzip => {
                IngestError::Decompress(format!("{} (before element {})", e, self.framed + 1))
            }
            Compression::None => self.framing(&format!("read failed: {}", e)),
        }
    }
}

enum Layout<R: BufRead> {
    Unknown(R),
    Array(ArrayFramer<R>),
    Sequence(StreamDeserializer<'static, IoRead<R>, RawRecord>),
    Finished,
}

pub struct RecordDecoder<R: BufRead> {
    layout: Layout<R>,
    compression: Compression,
    element: u64,
}

impl<R: BufRead> RecordDecoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            layout: Layout::Unknown(reader),
            compression: Compression::None,
            element: 0,
        }
    }

    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Number of records returned so far.
    pub fn elements_read(&self) -> u64 {
        self.element
    }

    fn next_record(&mut self) -> Result<Option<RawRecord>, IngestError> {
        let ctx = ErrorContext {
            compression: self.compression,
            framed: self.element,
        };

        loop {
            match &mut self.layout {
                Layout::Finished => return Ok(None),
                Layout::Unknown(_) => self.detect_layout(ctx)?,
                Layout::Array(framer) => {
                    if !framer.next_element(ctx)? {
                        return Ok(None);
                    }
                    return serde_json::from_slice(&framer.buf)
                        .map(Some)
                        .map_err(|e| ctx.framing(&e.to_string()));
                }
                Layout::Sequence(stream) => {
                    return match stream.next() {
                        None => Ok(None),
                        Some(Ok(record)) => Ok(Some(record)),
                        Some(Err(e)) if e.is_io() => Err(ctx.read(io::Error::from(e))),
                        Some(Err(e)) => Err(ctx.framing(&e.to_string())),
                    };
                }
            }
        }
    }

    fn detect_layout(&mut self, ctx: ErrorContext) -> Result<(), IngestError> {
        let Layout::Unknown(mut reader) = std::mem::replace(&mut self.layout, Layout::Finished)
        else {
            return Ok(());
        };

        self.layout = match peek_non_whitespace(&mut reader, ctx)? {
            None => Layout::Finished,
            Some(b'[') => {
                reader.consume(1);
                Layout::Array(ArrayFramer::new(reader))
            }
            Some(_) => Layout::Sequence(serde_json::Deserializer::from_reader(reader).into_iter()),
        };
        Ok(())
    }
}

impl<R: BufRead> Iterator for RecordDecoder<R> {
    type Item = Result<RawRecord, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_record() {
            Ok(Some(record)) => {
                self.element += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.layout = Layout::Finished;
                None
            }
            Err(e) => {
                self.layout = Layout::Finished;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> std::iter::FusedIterator for RecordDecoder<R> {}

/// Frames the elements of a top-level JSON array into `buf`.
struct ArrayFramer<R> {
    reader: R,
    first: bool,
    buf: Vec<u8>,
}

impl<R: BufRead> ArrayFramer<R> {
    fn new(reader: R) -> Self {
        Self {
            reader,
            first: true,
            buf: Vec::with_capacity(512),
        }
    }

    /// Returns `false` once the closing `]` has been consumed.
    fn next_element(&mut self, ctx: ErrorContext) -> Result<bool, IngestError> {
        match peek_non_whitespace(&mut self.reader, ctx)? {
            None => return Err(ctx.framing("unterminated array")),
            Some(b']') => {
                self.reader.consume(1);
                if peek_non_whitespace(&mut self.reader, ctx)?.is_some() {
                    return Err(ctx.framing("trailing data after array"));
                }
                return Ok(false);
            }
            Some(b',') if !self.first => {
                self.reader.consume(1);
                if matches!(peek_non_whitespace(&mut self.reader, ctx)?, Some(b']') | None) {
                    return Err(ctx.framing("expected element after ','"));
                }
            }
            Some(_) if !self.first => {
                return Err(ctx.framing("expected ',' or ']' between elements"))
            }
            Some(_) => {}
        }

        self.first = false;
        self.read_element(ctx)?;
        Ok(true)
    }

    /// Copies one object or array element into `buf`.
    fn read_element(&mut self, ctx: ErrorContext) -> Result<(), IngestError> {
        self.buf.clear();

        match peek_non_whitespace(&mut self.reader, ctx)? {
            Some(b'{') | Some(b'[') => {}
            Some(b) => return Err(ctx.framing(&format!("expected object, found {:?}", b as char))),
            None => return Err(ctx.framing("unexpected end of stream")),
        }

        let mut depth = 0usize;
        let mut in_string = false;
        let mut escaped = false;

        loop {
            let available = match self.reader.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(ctx.read(e)),
            };
            if available.is_empty() {
                return Err(ctx.framing("unterminated element"));
            }

            let mut end = None;
            for (i, &b) in available.iter().enumerate() {
                if in_string {
                    if escaped {
                        escaped = false;
                    } else if b == b'\\' {
                        escaped = true;
                    } else if b == b'"' {
                        in_string = false;
                    }
                    continue;
                }
                match b {
                    b'"' => in_string = true,
                    b'{' | b'[' => depth += 1,
                    b'}' | b']' => {
                        depth -= 1;
                        if depth == 0 {
                            end = Some(i + 1);
                            break;
                        }
                    }
                    _ => {}
                }
            }

            let take = end.unwrap_or(available.len());
            self.buf.extend_from_slice(&available[..take]);
            self.reader.consume(take);

            if end.is_some() {
                return Ok(());
            }
            if self.buf.len() > MAX_ELEMENT_LEN {
                return Err(ctx.framing(&format!("element exceeds {} bytes", MAX_ELEMENT_LEN)));
            }
        }
    }
}

fn peek_non_whitespace<R: BufRead>(
    reader: &mut R,
    ctx: ErrorContext,
) -> Result<Option<u8>, IngestError> {
    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ctx.read(e)),
        };
        if available.is_empty() {
            return Ok(None);
        }
        match available.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(i) => {
                let b = available[i];
                reader.consume(i);
                return Ok(Some(b));
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}
