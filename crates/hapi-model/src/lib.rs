//! Data model for converting HAPI responses into self-describing datasets.
//!
//! - **parameter** / **info**: the metadata half of a HAPI response
//! - **records**: the raw data half, one column per parameter
//! - **dataset**: the assembled output (variables with ISTP-style attributes)

pub mod dataset;
pub mod error;
pub mod info;
pub mod parameter;
pub mod records;

pub use dataset::{AttrValue, Attributes, BLANK_UNITS, Dataset, VarType, Variable, attrs};
pub use error::{ModelError, Result};
pub use info::InfoDocument;
pub use parameter::{
    BinsDefinition, BinsEntry, BinsNode, BinsReference, BinsSpec, CentersField,
    DEFINITIONS_PREFIX, FillValue, Label, ParameterDescriptor, ParameterType, RangesField, Units,
};
pub use records::{RawColumn, RecordSet, Values};
