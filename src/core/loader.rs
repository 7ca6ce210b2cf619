//! Delimited file loader
//!
//! Reads a header row plus data rows into ordered [`Record`]s. Cells stay
//! untyped strings; short rows simply lack the trailing columns.

use std::fs::File;
use std::path::Path;

use crate::core::error::{InventoryError, Result};
use crate::core::model::Record;

/// Options for parsing the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Single-byte field delimiter
    pub delimiter: u8,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl LoadOptions {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

/// Load a comma-delimited file
#[allow(dead_code)]
pub fn load(path: &Path) -> Result<Vec<Record>> {
    load_with(path, &LoadOptions::default())
}

/// Load a delimited file with explicit options.
///
/// An empty file yields no records. The file is closed before returning.
pub fn load_with(path: &Path, options: &LoadOptions) -> Result<Vec<Record>> {
    let file = File::open(path).map_err(|source| InventoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let read_err = |source| read_error(path, source);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(read_err)?
        .iter()
        .map(lossy)
        .collect();

    if headers.is_empty() {
        tracing::debug!(path = %path.display(), "inventory file has no header row");
        return Ok(Vec::new());
    }

    let mut records = Vec::new();

    for (row_no, result) in reader.byte_records().enumerate() {
        let row = result.map_err(read_err)?;

        if row.len() > headers.len() {
            tracing::debug!(
                row = row_no + 1,
                fields = row.len(),
                columns = headers.len(),
                "dropping fields beyond the header"
            );
        }

        // zip stops at the shorter side: short rows lack trailing columns
        let record = Record::from_pairs(
            headers
                .iter()
                .zip(row.iter())
                .map(|(column, cell)| (column.clone(), lossy(cell))),
        );
        records.push(record);
    }

    tracing::debug!(
        path = %path.display(),
        rows = records.len(),
        columns = headers.len(),
        "loaded inventory"
    );

    Ok(records)
}

/// Failed reads of an opened file stay I/O errors; anything else is malformed data
fn read_error(path: &Path, source: csv::Error) -> InventoryError {
    let path = path.to_path_buf();
    if source.is_io_error() {
        if let csv::ErrorKind::Io(source) = source.into_kind() {
            return InventoryError::Io { path, source };
        }
        unreachable!("is_io_error implies ErrorKind::Io");
    }
    InventoryError::Csv { path, source }
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
