use std::borrow::Borrow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use rowsmith_core::{Dataset, Record};

/// Write a materialized dataset as CSV; returns the bytes written.
pub fn write_dataset_csv(path: &Path, dataset: &Dataset) -> Result<u64, csv::Error> {
    write_rows_csv(path, dataset.columns(), dataset.iter())
}

/// Stream records to a CSV file without holding them in memory.
pub fn write_rows_csv<I, R>(path: &Path, columns: &[String], rows: I) -> Result<u64, csv::Error>
where
    I: IntoIterator<Item = R>,
    R: Borrow<Record>,
{
    let writer = BufWriter::new(File::create(path).map_err(csv::Error::from)?);
    write_csv(writer, columns, rows)
}

/// Write a header row plus one row per record, quoting every field.
pub fn write_csv<W, I, R>(writer: W, columns: &[String], rows: I) -> Result<u64, csv::Error>
where
    W: Write,
    I: IntoIterator<Item = R>,
    R: Borrow<Record>,
{
    let counting = CountingWriter::new(writer);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(counting);

    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(row.borrow().values())?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    Ok(counting.bytes_written())
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

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn quotes_every_field_and_counts_bytes() {
        let columns: Arc<[String]> = Arc::from(vec!["id".to_string(), "note".to_string()]);
        let record = Record::build(columns.clone(), |idx| {
            if idx == 0 { "1".to_string() } else { "a \"b\", c".to_string() }
        });

        let mut out = Vec::new();
        let bytes = write_csv(&mut out, &columns, [&record]).expect("write csv");
        let text = String::from_utf8(out).expect("utf8");

        assert_eq!(text, "\"id\",\"note\"\n\"1\",\"a \"\"b\"\", c\"\n");
        assert_eq!(bytes, text.len() as u64);
    }
}
