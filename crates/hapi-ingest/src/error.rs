//! Error types for reading HAPI responses.

use std::io;
use std::path::PathBuf;

use hapi_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed CSV at row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("row {row} has {actual} values, expected {expected}")]
    ColumnCount {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// A single cell that does not fit its parameter's type.
    #[error("row {row}, column {column} ({parameter}): {reason}")]
    Value {
        row: usize,
        column: usize,
        parameter: String,
        reason: String,
    },

    #[error("JSON response has no data array")]
    MissingData,

    #[error("{} has no embedded header and no info document was given", path.display())]
    MissingInfo { path: PathBuf },

    #[error("unknown parameter {name}")]
    UnknownParameter { name: String },

    #[error("info document lists no parameters")]
    NoParameters,

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
