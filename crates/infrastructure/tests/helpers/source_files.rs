#![allow(dead_code)]
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

pub struct SourceFixture {
    _dir: TempDir,
    path: PathBuf,
}

impl SourceFixture {
    pub fn plain(contents: &str) -> Self {
        Self::write("records.json", contents.as_bytes())
    }

    pub fn gzip(contents: &str) -> Self {
        Self::write("records.json.gz", &gzip_bytes(contents))
    }

    /// Two gzip members back to back, as produced by `cat a.gz b.gz`.
    pub fn multi_member_gzip(first: &str, second: &str) -> Self {
        let mut bytes = gzip_bytes(first);
        bytes.extend_from_slice(&gzip_bytes(second));
        Self::write("records.json.gz", &bytes)
    }

    pub fn raw(name: &str, bytes: &[u8]) -> Self {
        Self::write(name, bytes)
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn write(name: &str, bytes: &[u8]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(name);
        std::fs::write(&path, bytes).unwrap();
        Self { _dir: dir, path }
    }
}

pub fn gzip_bytes(contents: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(contents.as_bytes()).unwrap();
    encoder.finish().unwrap()
}

pub fn ndjson_lines(records: &[(&str, &str, &str)]) -> String {
    records
        .iter()
        .map(|(name, record_type, value)| {
            format!(
                "{{\"timestamp\":\"1614298129\",\"name\":\"{}\",\"type\":\"{}\",\"value\":\"{}\"}}\n",
                name, record_type, value
            )
        })
        .collect()
}
