use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("column {name} has {len} values, not a multiple of its record size {record_size}")]
    ShapeMismatch {
        name: String,
        len: usize,
        record_size: usize,
    },
    #[error("column {name} has {actual} records, expected {expected}")]
    RecordCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },
    #[error("duplicate column: {name}")]
    DuplicateColumn { name: String },
}

pub type Result<T> = std::result::Result<T, ModelError>;
