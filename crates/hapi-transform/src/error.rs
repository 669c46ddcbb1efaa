//! Error types for dataset assembly.

use thiserror::Error;

/// A timestamp string that does not fit the supported ISO-8601 shapes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("date cannot have {length} characters: {value}")]
    DateLength { value: String, length: usize },

    #[error("time cannot have {length} characters: {value}")]
    TimeLength { value: String, length: usize },

    /// A column element that does not parse with the format inferred from
    /// the first element.
    #[error("time value {value:?} at index {index} does not match {format}: {reason}")]
    Mismatch {
        index: usize,
        value: String,
        format: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error("bins reference {target} is not defined")]
    UndefinedReference { target: String },

    #[error("invalid bins reference {target}: {reason}")]
    InvalidReference { target: String, reason: String },

    #[error("definition {key} is not a bins description: {source}")]
    InvalidDefinition {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("bins {name} has neither centers nor ranges")]
    UnsupportedBins { name: String },

    #[error("variable {name} is already defined in the dataset")]
    DuplicateVariable { name: String },

    #[error("no data column for parameter {name}")]
    MissingColumn { name: String },

    #[error("time column {name} must hold text, found {kind}")]
    TimeColumnType { name: String, kind: &'static str },

    #[error("metadata lists no parameters")]
    NoParameters,
}

pub type Result<T> = std::result::Result<T, TransformError>;
