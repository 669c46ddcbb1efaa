//! Reading HAPI responses from disk.
//!
//! A response is an `info` document plus a data body in CSV (optionally with
//! the `info` embedded as a `#` header) or JSON. Readers produce a
//! [`RecordSet`](hapi_model::RecordSet) with one raw column per parameter.

pub mod columns;
pub mod csv_records;
pub mod error;
pub mod info;
pub mod json_response;
pub mod load;

pub use columns::{ColumnKind, parse_f64, parse_i64};
pub use csv_records::read_csv_records;
pub use error::{IngestError, Result};
pub use info::{header_lines, load_info, parse_csv_header, parse_info, select_parameters};
pub use json_response::read_json_response;
pub use load::{LoadOptions, LoadedResponse, ResponseFormat, load_response};
