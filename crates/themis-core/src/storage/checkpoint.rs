use crate::errors::{Result, ThemisError};
use crate::table::{delimiter_for, writer_builder};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Append-only, key-deduplicated row sink that survives crashes.
///
/// The first column of every row is its key. Keys already on disk when the
/// store is opened are recovered so a re-run only appends rows for new keys.
/// Rows are buffered and appended to the file every `flush_interval` rows and
/// on close; a crash loses at most the unflushed buffer.
pub struct CheckpointStore {
    path: PathBuf,
    columns: Vec<String>,
    delimiter: u8,
    flush_interval: usize,
    recovered: HashSet<String>,
    appended: HashSet<String>,
    buffer: Vec<Vec<String>>,
    need_header: bool,
    file: Option<File>,
}

impl CheckpointStore {
    /// Opens (or creates) the checkpoint at `path`. `flush_interval == 0`
    /// flushes only on close.
    pub fn open(path: &Path, columns: &[&str], flush_interval: usize) -> Result<Self> {
        let delimiter = delimiter_for(path);
        let columns: Vec<String> = columns.iter().map(|c| c.to_string()).collect();

        let (recovered, need_header) = match File::open(path) {
            Ok(mut f) => {
                let mut raw = Vec::new();
                f.read_to_end(&mut raw)
                    .map_err(|e| ThemisError::io(path, e))?;
                if raw.is_empty() {
                    (HashSet::new(), true)
                } else {
                    let keys = recover_keys(path, &raw, delimiter, &columns)?;
                    tracing::info!(
                        file = %path.display(),
                        recovered = keys.len(),
                        "Recovered {} items from disk",
                        keys.len()
                    );
                    (keys, false)
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => (HashSet::new(), true),
            Err(e) => return Err(ThemisError::io(path, e)),
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| ThemisError::io(path, e))?;

        Ok(Self {
            path: path.to_path_buf(),
            columns,
            delimiter,
            flush_interval,
            recovered,
            appended: HashSet::new(),
            buffer: Vec::new(),
            need_header,
            file: Some(file),
        })
    }

    /// True if `key` is durable from an earlier run or was appended in this one.
    pub fn contains(&self, key: &str) -> bool {
        self.recovered.contains(key) || self.appended.contains(key)
    }

    pub fn recovered_len(&self) -> usize {
        self.recovered.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Buffers one row; its first value is the key.
    pub fn append(&mut self, values: Vec<String>) -> Result<()> {
        if values.len() != self.columns.len() {
            return Err(ThemisError::SchemaMismatch {
                column: format!(
                    "{} values for {} columns",
                    values.len(),
                    self.columns.len()
                ),
                file: self.path.display().to_string(),
            });
        }
        self.appended.insert(values[0].clone());
        self.buffer.push(values);
        if self.flush_interval > 0 && self.buffer.len() % self.flush_interval == 0 {
            self.flush()?;
        }
        Ok(())
    }

    /// Appends the buffer to the file. The buffer is taken before writing, so a
    /// failed flush is never retried.
    pub fn flush(&mut self) -> Result<()> {
        let rows = std::mem::take(&mut self.buffer);
        if rows.is_empty() && !self.need_header {
            return Ok(());
        }
        tracing::debug!(file = %self.path.display(), "Flush {} items to disk", rows.len());

        let csv_err = |source| ThemisError::Csv {
            file: self.path.display().to_string(),
            source,
        };
        let mut wtr = writer_builder(self.delimiter).from_writer(Vec::new());
        if self.need_header {
            wtr.write_record(&self.columns).map_err(csv_err)?;
        }
        for row in &rows {
            wtr.write_record(row).map_err(csv_err)?;
        }
        let bytes = wtr
            .into_inner()
            .map_err(|e| ThemisError::io(&self.path, e.into_error()))?;

        let file = self.file.as_mut().ok_or_else(|| {
            ThemisError::io(
                &self.path,
                std::io::Error::new(std::io::ErrorKind::Other, "checkpoint already closed"),
            )
        })?;
        file.write_all(&bytes)
            .and_then(|_| file.flush())
            .and_then(|_| file.sync_data())
            .map_err(|e| ThemisError::io(&self.path, e))?;
        self.need_header = false;
        Ok(())
    }

    pub fn close(mut self) -> Result<()> {
        self.flush()?;
        self.file = None;
        Ok(())
    }
}

impl Drop for CheckpointStore {
    fn drop(&mut self) {
        if self.file.is_none() || self.buffer.is_empty() {
            return;
        }
        // Buffered rows are complete answers; keep them for the next run.
        if let Err(e) = self.flush() {
            tracing::warn!(file = %self.path.display(), error = %e, "failed to flush checkpoint on exit");
        }
    }
}

fn recover_keys(
    path: &Path,
    raw: &[u8],
    delimiter: u8,
    columns: &[String],
) -> Result<HashSet<String>> {
    let corrupt = |reason: String| ThemisError::CorruptCheckpoint {
        path: path.to_path_buf(),
        reason,
    };

    if raw.last() != Some(&b'\n') {
        return Err(corrupt("last row is incomplete".into()));
    }
    // Quotes inside quoted fields are doubled, so a complete file has an even count.
    if raw.iter().filter(|&&b| b == b'"').count() % 2 != 0 {
        return Err(corrupt(
            "last row is incomplete (unterminated quoted field)".into(),
        ));
    }

    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .from_reader(raw);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| corrupt(e.to_string()))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers != columns {
        return Err(corrupt(format!(
            "header {:?} does not match expected columns {:?}",
            headers, columns
        )));
    }

    let mut keys = HashSet::new();
    for rec in rdr.records() {
        let rec = rec.map_err(|e| corrupt(e.to_string()))?;
        if let Some(key) = rec.get(0) {
            keys.insert(key.to_string());
        }
    }
    Ok(keys)
}
