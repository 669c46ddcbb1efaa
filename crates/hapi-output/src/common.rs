//! Helpers shared by the writers.

use chrono::NaiveDateTime;

use hapi_model::{Dataset, VarType, Variable};

use crate::error::{OutputError, Result};

/// ISO-8601 with microseconds, as written for every timestamp.
pub const ISO_MICROS: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

pub(crate) fn format_time(time: &NaiveDateTime) -> String {
    time.format(ISO_MICROS).to_string()
}

/// The time axis and its timestamps.
pub(crate) fn time_axis(dataset: &Dataset) -> Result<(&Variable, &[NaiveDateTime])> {
    let axis = dataset.time_axis().ok_or(OutputError::MissingTimeAxis)?;
    let times = axis
        .values
        .as_time()
        .ok_or_else(|| OutputError::TimeAxisType {
            name: axis.name.clone(),
        })?;
    Ok((axis, times))
}

/// Record-varying variables after the time axis, checked against its length.
pub(crate) fn record_varying(dataset: &Dataset, records: usize) -> Result<Vec<&Variable>> {
    dataset
        .iter()
        .skip(1)
        .filter(|variable| variable.record_varying)
        .map(|variable| {
            let actual = variable.record_count();
            if actual != records && variable.record_size() > 0 {
                return Err(OutputError::RecordCount {
                    name: variable.name.clone(),
                    expected: records,
                    actual,
                });
            }
            Ok(variable)
        })
        .collect()
}

pub(crate) fn is_data(variable: &Variable) -> bool {
    variable.var_type() == Some(VarType::Data)
}
