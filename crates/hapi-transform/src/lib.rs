//! Metadata-driven materialization of HAPI responses.
//!
//! This crate turns a `(records, info)` pair into a [`Dataset`](hapi_model::Dataset):
//!
//! - **time**: infers a parse format from one example isotime and converts the time column
//! - **bins**: resolves `bins` nodes (centers, ranges, `$ref`s) into axis values
//! - **variable**: builds one variable with its attributes and the axes it depends on
//! - **assemble**: drives the pass over the parameter list and stamps provenance

pub mod assemble;
pub mod bins;
pub mod error;
pub mod time;
pub mod variable;

pub use assemble::{AssembleOptions, DEFAULT_AUTHOR, assemble_dataset, assemble_from_info};
pub use bins::{AxisValues, Definitions, ResolvedBins, expand_bins, resolve_bins};
pub use error::{FormatError, Result, TransformError};
pub use time::{DatePattern, TimeFormat, TimePattern, convert_times, infer_time_format};
pub use variable::{
    AxisVariables, VariableBatch, build_axis, build_time_axis, build_variable, units_attr,
};
