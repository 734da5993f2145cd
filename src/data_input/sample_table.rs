// src/data_input/sample_table.rs

use csv::ReaderBuilder;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::SampleGroups;

/// Errors raised while loading measurement tables.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Data file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CSV in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Table {path} has no header row")]
    MissingHeader { path: String },

    #[error("Column '{column}' not found in {path}")]
    ColumnNotFound { column: String, path: String },
}

/// One numeric column. Blank and non-numeric cells are dropped when the table is read.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleColumn {
    pub name: String,
    pub values: Vec<f64>,
    /// Cells that were present but not parseable as a number.
    pub rejected_cells: usize,
}

/// A table of measurement columns keyed by header name, as exported from one
/// spreadsheet sheet. Columns may have different lengths.
#[derive(Debug, Clone)]
pub struct SampleTable {
    source: PathBuf,
    columns: Vec<SampleColumn>,
}

fn parse_cell(cell: &str) -> Option<Result<f64, ()>> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return None;
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_nan() => None,
        Ok(v) => Some(Ok(v)),
        Err(_) => Some(Err(())),
    }
}

impl SampleTable {
    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        if !path.exists() {
            return Err(DataError::FileNotFound(path.display().to_string()));
        }
        let file = File::open(path).map_err(|source| DataError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Reads CSV content from any reader; `source` is only used in messages.
    pub fn from_reader<R: Read>(reader: R, source: &Path) -> Result<Self, DataError> {
        let csv_error = |e: csv::Error| DataError::Csv {
            path: source.display().to_string(),
            source: e,
        };

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers().map_err(csv_error)?.clone();
        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(DataError::MissingHeader {
                path: source.display().to_string(),
            });
        }

        let mut columns: Vec<SampleColumn> = headers
            .iter()
            .map(|h| SampleColumn {
                name: h.to_string(),
                values: Vec::new(),
                rejected_cells: 0,
            })
            .collect();

        for result in reader.records() {
            let record = result.map_err(csv_error)?;
            for (column, cell) in columns.iter_mut().zip(record.iter()) {
                match parse_cell(cell) {
                    Some(Ok(v)) => column.values.push(v),
                    Some(Err(())) => column.rejected_cells += 1,
                    None => {}
                }
            }
        }

        for column in columns.iter().filter(|c| c.rejected_cells > 0) {
            tracing::warn!(
                "Column '{}' in {}: ignored {} non-numeric cell(s)",
                column.name,
                source.display(),
                column.rejected_cells
            );
        }
        tracing::debug!(
            "Read {} column(s) from {}",
            columns.len(),
            source.display()
        );

        Ok(Self {
            source: source.to_path_buf(),
            columns,
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Numeric values of a column with missing cells removed.
    pub fn column(&self, name: &str) -> Result<&[f64], DataError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| DataError::ColumnNotFound {
                column: name.to_string(),
                path: self.source.display().to_string(),
            })
    }

    /// Collects `(label, column)` pairs into labeled groups, in the given order.
    pub fn groups<'a>(
        &self,
        selection: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<SampleGroups, DataError> {
        let mut groups = SampleGroups::new();
        for (label, column) in selection {
            groups.insert(label, self.column(column)?.to_vec());
        }
        Ok(groups)
    }
}


// src/data_input/sample_table.rs
