//! Tabular adapter: a polars frame indexed by time, one column per scalar.
//!
//! The time axis becomes the first column (`Datetime[μs]`). Each `data`
//! variable with scalar records becomes one column; one-dimensional records
//! are split into `<name>_<i>` columns. Variables of higher rank are skipped.

use std::collections::BTreeMap;
use std::io::Write;

use chrono::NaiveDateTime;
use polars::prelude::{
    Column, CsvWriter, DataFrame, DataType, NamedFrom, SerWriter, Series, TimeUnit,
};
use tracing::{debug, warn};

use hapi_model::{AttrValue, BLANK_UNITS, Dataset, Values, Variable, attrs};

use crate::common::{ISO_MICROS, is_data, record_varying, time_axis};
use crate::error::Result;
use crate::units::{DIMENSIONLESS, UnitResolver};

/// A frame plus the resolved unit of each column.
#[derive(Debug, Clone)]
pub struct TimeSeriesFrame {
    pub data: DataFrame,
    pub units: BTreeMap<String, String>,
}

impl TimeSeriesFrame {
    pub fn unit(&self, column: &str) -> Option<&str> {
        self.units.get(column).map(String::as_str)
    }
}

/// Build a [`TimeSeriesFrame`] from the `data` variables of `dataset`.
pub fn dataset_to_frame(dataset: &Dataset, resolver: &dyn UnitResolver) -> Result<TimeSeriesFrame> {
    let (axis, times) = time_axis(dataset)?;
    let mut columns: Vec<Column> = vec![time_series(&axis.name, times)?.into()];
    let mut units = BTreeMap::new();
    units.insert(
        axis.name.clone(),
        resolve_units(resolver, &axis.name, axis.attr_text(attrs::UNITS)),
    );

    for variable in record_varying(dataset, times.len())? {
        if !is_data(variable) {
            continue;
        }
        match variable.shape.as_slice() {
            [] => {
                columns.push(series(&variable.name, &variable.values, 0, 1)?.into());
                units.insert(
                    variable.name.clone(),
                    resolve_units(resolver, &variable.name, component_units(variable, 0)),
                );
            }
            [width] => {
                for component in 0..*width {
                    let name = format!("{}_{component}", variable.name);
                    columns.push(series(&name, &variable.values, component, *width)?.into());
                    let resolved =
                        resolve_units(resolver, &name, component_units(variable, component));
                    units.insert(name, resolved);
                }
            }
            shape => {
                warn!(
                    variable = %variable.name,
                    ?shape,
                    "skipping variable with more than one dimension per record"
                );
            }
        }
    }

    let data = DataFrame::new(columns)?;
    debug!(
        columns = data.width(),
        rows = data.height(),
        "built time series frame"
    );
    Ok(TimeSeriesFrame { data, units })
}

/// Write the frame as CSV with microsecond ISO timestamps.
pub fn write_frame_csv<W: Write>(writer: &mut W, frame: &mut TimeSeriesFrame) -> Result<()> {
    CsvWriter::new(writer)
        .include_header(true)
        .with_datetime_format(Some(ISO_MICROS.to_string()))
        .finish(&mut frame.data)?;
    Ok(())
}

fn time_series(name: &str, times: &[NaiveDateTime]) -> Result<Series> {
    let micros: Vec<i64> = times
        .iter()
        .map(|time| time.and_utc().timestamp_micros())
        .collect();
    let series = Series::new(name.into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))?;
    Ok(series)
}

/// Every `stride`-th value starting at `offset`.
fn series(name: &str, values: &Values, offset: usize, stride: usize) -> Result<Series> {
    fn pick<T: Clone>(values: &[T], offset: usize, stride: usize) -> Vec<T> {
        values.iter().skip(offset).step_by(stride).cloned().collect()
    }
    let series = match values {
        Values::Float(values) => Series::new(name.into(), pick(values, offset, stride)),
        Values::Int(values) => Series::new(name.into(), pick(values, offset, stride)),
        Values::Text(values) => Series::new(name.into(), pick(values, offset, stride)),
        Values::Time(values) => return time_series(name, &pick(values, offset, stride)),
    };
    Ok(series)
}

fn component_units(variable: &Variable, component: usize) -> Option<&str> {
    match variable.attr(attrs::UNITS)? {
        AttrValue::Text(units) => Some(units),
        AttrValue::TextList(units) => units.get(component).map(String::as_str),
        _ => None,
    }
}

fn resolve_units(resolver: &dyn UnitResolver, column: &str, units: Option<&str>) -> String {
    let Some(units) = units.filter(|units| *units != BLANK_UNITS && !units.trim().is_empty())
    else {
        return DIMENSIONLESS.to_string();
    };
    resolver.resolve(units).unwrap_or_else(|| {
        warn!(column, units, "unresolved units; using {DIMENSIONLESS}");
        DIMENSIONLESS.to_string()
    })
}
