//! Delimited tabular files with a header row.
//!
//! Every join in the pipeline is by column name, so loading checks that the
//! columns a caller needs are present and fails with `SchemaMismatch` naming
//! the column and file otherwise.

use crate::errors::{Result, ThemisError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// A row type that can be decoded from, and written as, a table.
pub trait Record: Serialize + DeserializeOwned {
    /// Header written for this record, in field order.
    const COLUMNS: &'static [&'static str];
    /// Columns an input table must carry to decode this record.
    const REQUIRED: &'static [&'static str] = Self::COLUMNS;
}

/// Column subset selection and renaming applied at load time.
#[derive(Debug, Clone, Default)]
pub struct TableSpec {
    columns: Option<Vec<String>>,
    rename: Vec<(String, String)>,
}

impl TableSpec {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn columns(columns: &[&str]) -> Self {
        Self {
            columns: Some(columns.iter().map(|c| c.to_string()).collect()),
            rename: Vec::new(),
        }
    }

    pub fn rename(mut self, from: &str, to: &str) -> Self {
        self.rename.push((from.to_string(), to.to_string()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    /// Where the table came from, used in error messages.
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab") => b'\t',
        _ => b',',
    }
}

pub(crate) fn writer_builder(delimiter: u8) -> csv::WriterBuilder {
    let mut b = csv::WriterBuilder::new();
    b.delimiter(delimiter)
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'));
    b
}

impl Table {
    pub fn load(path: &Path, spec: &TableSpec) -> Result<Self> {
        let file = File::open(path).map_err(|e| ThemisError::io(path, e))?;
        let table = Self::from_reader(
            file,
            &path.display().to_string(),
            delimiter_for(path),
            spec,
        )?;
        tracing::debug!(file = %path.display(), rows = table.rows.len(), "loaded table");
        Ok(table)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        name: &str,
        delimiter: u8,
        spec: &TableSpec,
    ) -> Result<Self> {
        let csv_err = |source| ThemisError::Csv {
            file: name.to_string(),
            source,
        };
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(reader);

        let all_headers: Vec<String> = rdr
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let selected: Vec<usize> = match &spec.columns {
            None => (0..all_headers.len()).collect(),
            Some(wanted) => wanted
                .iter()
                .map(|col| {
                    all_headers
                        .iter()
                        .position(|h| h == col)
                        .ok_or_else(|| ThemisError::SchemaMismatch {
                            column: col.clone(),
                            file: name.to_string(),
                        })
                })
                .collect::<Result<_>>()?,
        };

        let mut rows = Vec::new();
        for rec in rdr.records() {
            let rec = rec.map_err(csv_err)?;
            rows.push(
                selected
                    .iter()
                    .map(|&i| rec.get(i).unwrap_or_default().to_string())
                    .collect(),
            );
        }

        let headers = selected
            .iter()
            .map(|&i| {
                let h = &all_headers[i];
                spec.rename
                    .iter()
                    .find(|(from, _)| from == h)
                    .map(|(_, to)| to.clone())
                    .unwrap_or_else(|| h.clone())
            })
            .collect();

        Ok(Self {
            name: name.to_string(),
            headers,
            rows,
        })
    }

    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn require(&self, columns: &[&str]) -> Result<()> {
        for col in columns {
            if self.column(col).is_none() {
                return Err(ThemisError::SchemaMismatch {
                    column: col.to_string(),
                    file: self.name.clone(),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Decodes every row into `T` by header name.
    pub fn records<T: Record>(&self) -> Result<Vec<T>> {
        self.require(T::REQUIRED)?;
        let headers = csv::StringRecord::from(self.headers.clone());
        self.rows
            .iter()
            .map(|row| {
                csv::StringRecord::from(row.clone())
                    .deserialize::<T>(Some(&headers))
                    .map_err(|source| ThemisError::Csv {
                        file: self.name.clone(),
                        source,
                    })
            })
            .collect()
    }

    pub fn write_to<W: Write>(&self, w: W, delimiter: u8) -> Result<()> {
        let csv_err = |source| ThemisError::Csv {
            file: self.name.clone(),
            source,
        };
        let mut wtr = writer_builder(delimiter).from_writer(w);
        wtr.write_record(&self.headers).map_err(csv_err)?;
        for row in &self.rows {
            wtr.write_record(row).map_err(csv_err)?;
        }
        wtr.flush().map_err(|e| ThemisError::io(&self.name, e))?;
        Ok(())
    }
}

pub fn load_records<T: Record>(path: &Path, spec: &TableSpec) -> Result<Vec<T>> {
    Table::load(path, spec)?.records()
}

/// Writes `records` with a header row, even when there are none.
pub fn write_records<T: Record, W: Write>(w: W, delimiter: u8, records: &[T]) -> Result<()> {
    let csv_err = |source| ThemisError::Csv {
        file: "<output>".to_string(),
        source,
    };
    let mut wtr = writer_builder(delimiter).from_writer(w);
    wtr.write_record(T::COLUMNS).map_err(csv_err)?;
    for r in records {
        wtr.serialize(r).map_err(csv_err)?;
    }
    wtr.flush().map_err(|e| ThemisError::io("<output>", e))?;
    Ok(())
}

pub fn save_records<T: Record>(path: &Path, records: &[T]) -> Result<()> {
    let file = File::create(path).map_err(|e| ThemisError::io(path, e))?;
    write_records(std::io::BufWriter::new(file), delimiter_for(path), records)
}
