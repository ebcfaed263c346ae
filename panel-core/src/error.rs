use std::path::PathBuf;
use thiserror::Error;

/// Load-time failures of the panel engine.
///
/// Everything here is fatal: the process cannot serve queries without a panel.
/// Per-row and per-query anomalies are never reported through this type.
#[derive(Error, Debug)]
pub enum PanelError {
    /// The backing table could not be located.
    #[error("Data source not found at {0}")]
    DataSourceMissing(PathBuf),

    /// The required date column is absent.
    #[error("Invalid schema: {0}")]
    SchemaInvalid(String),

    /// The file format could not be determined or is not supported.
    #[error("Unsupported data format: {0}")]
    UnsupportedFormat(String),

    /// Underlying IO failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to decode a CSV source.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Failed to decode a JSON source.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for panel operations.
pub type Result<T> = std::result::Result<T, PanelError>;
