//! Error types for loading inventory files

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using InventoryError
pub type Result<T> = std::result::Result<T, InventoryError>;

#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("cannot read inventory file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed inventory file {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

