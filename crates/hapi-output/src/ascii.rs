//! JSON-headed ASCII: a `#`-prefixed JSON header describing every variable,
//! then one whitespace-separated line per record.
//!
//! Record-varying variables are described by `DIMENSION` and the
//! `START_COLUMN` of their first value on each line; the time axis is column
//! 0. Non-record-varying variables carry their `VALUES` inline. Dataset
//! attributes go under `"global"`.

use std::io::Write;

use serde_json::{Map, Value, json};
use tracing::debug;

use hapi_model::{Dataset, Values, Variable};

use crate::common::{format_time, record_varying, time_axis};
use crate::error::Result;

/// Key holding the dataset attributes in the header.
pub const GLOBAL_KEY: &str = "global";

/// Write `dataset` as JSON-headed ASCII.
pub fn write_json_headed_ascii<W: Write>(writer: &mut W, dataset: &Dataset) -> Result<()> {
    let (axis, times) = time_axis(dataset)?;
    let columns = record_varying(dataset, times.len())?;

    let header = build_header(dataset, axis)?;
    for line in serde_json::to_string_pretty(&header)?.lines() {
        writeln!(writer, "#{line}")?;
    }

    for (record, time) in times.iter().enumerate() {
        let mut line = format_time(time);
        for variable in &columns {
            let size = variable.record_size();
            for index in record * size..(record + 1) * size {
                line.push(' ');
                line.push_str(&format_value(&variable.values, index));
            }
        }
        writeln!(writer, "{line}")?;
    }
    debug!(
        records = times.len(),
        variables = dataset.len(),
        "wrote JSON-headed ASCII"
    );
    Ok(())
}

fn build_header(dataset: &Dataset, axis: &Variable) -> Result<Value> {
    let mut header = Map::new();
    header.insert(axis.name.clone(), describe(axis, Placement::Column(0))?);

    let mut start = 1;
    for variable in dataset.iter().skip(1) {
        let placement = if variable.record_varying {
            let placement = Placement::Column(start);
            start += variable.record_size();
            placement
        } else {
            Placement::Inline
        };
        header.insert(variable.name.clone(), describe(variable, placement)?);
    }
    header.insert(
        GLOBAL_KEY.to_string(),
        serde_json::to_value(&dataset.attributes)?,
    );
    Ok(Value::Object(header))
}

enum Placement {
    Column(usize),
    Inline,
}

fn describe(variable: &Variable, placement: Placement) -> Result<Value> {
    let mut entry = Map::new();
    for (key, value) in &variable.attributes {
        entry.insert(key.clone(), serde_json::to_value(value)?);
    }
    match placement {
        Placement::Column(start) => {
            let dimension = if variable.shape.is_empty() {
                vec![1]
            } else {
                variable.shape.clone()
            };
            entry.insert("DIMENSION".to_string(), json!(dimension));
            entry.insert("START_COLUMN".to_string(), json!(start));
        }
        Placement::Inline => {
            entry.insert("VALUES".to_string(), values_json(&variable.values));
        }
    }
    Ok(Value::Object(entry))
}

fn values_json(values: &Values) -> Value {
    match values {
        Values::Text(values) => json!(values),
        Values::Float(values) => json!(values),
        Values::Int(values) => json!(values),
        Values::Time(values) => Value::Array(
            values
                .iter()
                .map(|time| Value::String(format_time(time)))
                .collect(),
        ),
    }
}

fn format_value(values: &Values, index: usize) -> String {
    match values {
        Values::Float(values) => values[index].to_string(),
        Values::Int(values) => values[index].to_string(),
        Values::Time(values) => format_time(&values[index]),
        Values::Text(values) => {
            let text = &values[index];
            if text.is_empty() || text.contains(char::is_whitespace) {
                format!("{text:?}")
            } else {
                text.clone()
            }
        }
    }
}
