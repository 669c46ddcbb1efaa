//! Output boundary for assembled datasets.
//!
//! - **ascii**: JSON-headed ASCII (header of variable attributes, then records)
//! - **frame**: polars frame adapter with pluggable unit resolution, and CSV export
//! - **units**: the unit-resolution hook and a default alias table

mod common;
pub mod ascii;
pub mod error;
pub mod frame;
pub mod units;

pub use ascii::{GLOBAL_KEY, write_json_headed_ascii};
pub use common::ISO_MICROS;
pub use error::{OutputError, Result};
pub use frame::{TimeSeriesFrame, dataset_to_frame, write_frame_csv};
pub use units::{DIMENSIONLESS, PassthroughUnits, UnitResolver, UnitTable};
