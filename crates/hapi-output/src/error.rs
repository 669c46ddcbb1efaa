use std::io;

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("polars error: {0}")]
    Polars(#[from] PolarsError),

    #[error("dataset has no time axis")]
    MissingTimeAxis,

    #[error("time axis {name} does not hold timestamps")]
    TimeAxisType { name: String },

    /// A record-varying variable whose record count disagrees with the time axis.
    #[error("variable {name} has {actual} records, expected {expected}")]
    RecordCount {
        name: String,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, OutputError>;
