use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::errors::GenerateError;

/// Write records as CSV, returning the number of bytes written.
pub fn write_records<T: Serialize>(
    path: &Path,
    records: &[T],
    headers: bool,
) -> Result<u64, GenerateError> {
    let writer = BufWriter::new(File::create(path)?);
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(headers)
        .from_writer(counting);

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    let counting = writer
        .into_inner()
        .map_err(|err| GenerateError::Io(err.into_error()))?;
    Ok(counting.bytes_written())
}

/// Read records from a CSV file.
pub fn read_records<T: DeserializeOwned>(
    path: &Path,
    headers: bool,
) -> Result<Vec<T>, GenerateError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(headers)
        .from_path(path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    Ok(records)
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
