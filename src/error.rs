use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading the dataset.
///
/// Filtering and aggregation never fail, so this is the only error type the
/// data layer exposes. Any variant halts the dashboard before rendering.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The input file does not exist.
    #[error("File not found! Please make sure '{}' is in the same folder.", path.display())]
    DataNotFound { path: PathBuf },

    #[error("Unsupported file extension: .{extension}")]
    UnsupportedFormat { extension: String },

    #[error("Required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("Row {row}, column '{column}': cannot parse '{value}'")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DashboardError {
    pub fn invalid(row: usize, column: &str, value: impl Into<String>) -> Self {
        DashboardError::InvalidValue {
            row,
            column: column.to_string(),
            value: value.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;
