//! Sequential readers over precomputed numeric matrices.
//!
//! Each sidecar holds one comma-separated row per document, in the order the
//! documents are processed. Rows are handed out strictly in file order and
//! exactly once; running out early, or finishing with rows to spare, means the
//! matrix was computed for a different document set and is a fatal
//! [`LyricalError::Alignment`].

use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::errors::{LyricalError, Result, ResultExt};

/// A named sidecar matrix and where to find it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SidecarSpec {
    /// Feature name the rows are emitted under
    pub name: String,
    /// Path to the comma-separated matrix
    pub path: PathBuf,
}

impl SidecarSpec {
    /// Create a new sidecar spec
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// Row-at-a-time reader over one sidecar file.
pub struct SidecarReader<R = File> {
    name: String,
    source: String,
    reader: csv::Reader<R>,
    record: StringRecord,
    rows_read: usize,
    pending: Option<Vec<f64>>,
}

impl SidecarReader {
    /// Open a sidecar file for the run.
    pub fn open(spec: &SidecarSpec) -> Result<Self> {
        let file = File::open(&spec.path).with_context(|| {
            format!("Failed to open sidecar '{}' at {}", spec.name, spec.path.display())
        })?;
        debug!("Opened sidecar '{}' at {}", spec.name, spec.path.display());

        Ok(Self::from_reader(
            spec.name.clone(),
            spec.path.display().to_string(),
            file,
        ))
    }
}

impl<R: Read> SidecarReader<R> {
    /// Wrap any reader as a sidecar. Rows have no header and may differ in width.
    pub fn from_reader(name: impl Into<String>, source: impl Into<String>, reader: R) -> Self {
        let reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        Self {
            name: name.into(),
            source: source.into(),
            reader,
            record: StringRecord::new(),
            rows_read: 0,
            pending: None,
        }
    }

    /// Declared feature name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rows handed out so far
    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Width of the next row without consuming it. `None` once the file is exhausted.
    pub fn peek_width(&mut self) -> Result<Option<usize>> {
        if self.pending.is_none() {
            self.pending = self.read_row()?;
        }
        Ok(self.pending.as_ref().map(Vec::len))
    }

    /// The next row. Fails when the file has no rows left.
    pub fn next_row(&mut self) -> Result<Vec<f64>> {
        let row = match self.pending.take() {
            Some(row) => Some(row),
            None => self.read_row()?,
        };

        match row {
            Some(row) => {
                self.rows_read += 1;
                Ok(row)
            }
            None => Err(LyricalError::alignment(
                self.name.clone(),
                format!(
                    "{} ran out of rows after {} documents",
                    self.source, self.rows_read
                ),
                self.rows_read,
            )),
        }
    }

    /// Confirm every row has been consumed.
    pub fn finish(mut self) -> Result<usize> {
        if self.peek_width()?.is_some() {
            return Err(LyricalError::alignment(
                self.name.clone(),
                format!(
                    "{} has more rows than the {} documents processed",
                    self.source, self.rows_read
                ),
                self.rows_read,
            ));
        }
        Ok(self.rows_read)
    }

    fn read_row(&mut self) -> Result<Option<Vec<f64>>> {
        loop {
            let more = self
                .reader
                .read_record(&mut self.record)
                .map_err(|e| csv_error(&self.source, e))?;
            if !more {
                return Ok(None);
            }
            // A line holding only whitespace trims down to one empty field.
            if self.record.iter().all(str::is_empty) {
                continue;
            }

            let line = self.record.position().map_or(0, csv::Position::line);
            return parse_record(&self.source, line as usize, &self.record).map(Some);
        }
    }
}

/// Parse every field of one record as a number.
pub fn parse_record(source: &str, line_number: usize, record: &StringRecord) -> Result<Vec<f64>> {
    record
        .iter()
        .map(|cell| {
            cell.parse::<f64>().map_err(|_| {
                LyricalError::parse_at_line(
                    source,
                    format!("'{}' is not a number", cell),
                    line_number,
                )
            })
        })
        .collect()
}

fn csv_error(source: &str, err: csv::Error) -> LyricalError {
    let line = err.position().map(csv::Position::line);
    match err.into_kind() {
        csv::ErrorKind::Io(e) => LyricalError::io(format!("Failed to read {}", source), e),
        kind => {
            let message = format!("malformed CSV: {:?}", kind);
            match line {
                Some(line) => LyricalError::parse_at_line(source, message, line as usize),
                None => LyricalError::parse(source, message),
            }
        }
    }
}

/// Open every configured sidecar, in order.
pub fn open_all(specs: &[SidecarSpec]) -> Result<Vec<SidecarReader>> {
    specs.iter().map(SidecarReader::open).collect()
}
