// Tabular input loading and pre-build cleaning

use crate::error::{GraphError, Result};
use crate::extract::{SourceRow, is_missing};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

pub const REQUIRED_COLUMN: &str = "source_domain";

/// A record the CSV reader could not decode into a [`SourceRow`].
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    pub line: u64,
    pub message: String,
}

pub type RowRecord = std::result::Result<SourceRow, RowError>;

/// Load every record from a CSV file.
pub fn load_rows(path: &Path) -> Result<Vec<RowRecord>> {
    let file = File::open(path)?;
    let records = read_rows(file)?;
    info!("Loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}

/// Read records from any CSV source. The header must name `source_domain`;
/// unknown columns are ignored.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<RowRecord>> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = reader.headers()?.clone();
    if !headers.iter().any(|header| header.trim() == REQUIRED_COLUMN) {
        return Err(GraphError::MissingColumn(REQUIRED_COLUMN.to_string()));
    }
    debug!("CSV columns: {:?}", headers);

    let mut records = Vec::new();
    for (index, result) in reader.deserialize::<SourceRow>().enumerate() {
        match result {
            Ok(row) => records.push(Ok(row)),
            Err(err) if err.is_io_error() => return Err(err.into()),
            Err(err) => {
                // Header is line 1, so data row `index` sits at `index + 2`.
                let line = err
                    .position()
                    .map(|pos| pos.line())
                    .unwrap_or(index as u64 + 2);
                warn!("Could not decode CSV record at line {}: {}", line, err);
                records.push(Err(RowError {
                    line,
                    message: err.to_string(),
                }));
            }
        }
    }

    Ok(records)
}

/// Drop rows without a source domain and rows with no relationship column
/// set. Undecodable records are kept so the build can count them.
pub fn clean_rows(records: Vec<RowRecord>) -> Result<Vec<RowRecord>> {
    let total = records.len();

    let cleaned: Vec<RowRecord> = records
        .into_iter()
        .filter(|record| match record {
            Ok(row) => !is_missing(&row.source_domain) && row.has_relationships(),
            Err(_) => true,
        })
        .collect();

    info!(
        "Cleaned data: {} rows remaining ({} removed)",
        cleaned.len(),
        total - cleaned.len()
    );

    if cleaned.is_empty() {
        return Err(GraphError::EmptyDataset { total });
    }
    Ok(cleaned)
}
