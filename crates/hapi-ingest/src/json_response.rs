//! HAPI JSON responses: `info` keys plus a `data` array of rows.

use std::io::Read;

use serde_json::Value;
use tracing::debug;

use hapi_model::{InfoDocument, RecordSet};

use crate::columns::{ColumnBuilder, ColumnKind};
use crate::error::{IngestError, Result};

/// Read a JSON response into its records and its embedded `info` document.
///
/// Each row holds one element per parameter; sized parameters carry (nested)
/// arrays that are flattened in row-major order.
pub fn read_json_response<R: Read>(reader: R) -> Result<(RecordSet, InfoDocument)> {
    let mut document: serde_json::Map<String, Value> =
        serde_json::from_reader(reader).map_err(|source| IngestError::Json {
            context: "JSON response".to_string(),
            source,
        })?;
    let data = match document.remove("data") {
        Some(Value::Array(rows)) => rows,
        _ => return Err(IngestError::MissingData),
    };
    let info: InfoDocument =
        serde_json::from_value(Value::Object(document)).map_err(|source| IngestError::Json {
            context: "JSON response info".to_string(),
            source,
        })?;
    if info.parameters.is_empty() {
        return Err(IngestError::NoParameters);
    }

    let mut builders: Vec<ColumnBuilder> = info
        .parameters
        .iter()
        .enumerate()
        .map(|(index, parameter)| {
            ColumnBuilder::new(ColumnKind::for_parameter(index, parameter), parameter)
        })
        .collect();

    for (row, value) in data.iter().enumerate() {
        let cells = value.as_array().ok_or_else(|| IngestError::Value {
            row,
            column: 0,
            parameter: String::new(),
            reason: "row is not an array".to_string(),
        })?;
        if cells.len() != builders.len() {
            return Err(IngestError::ColumnCount {
                row,
                expected: builders.len(),
                actual: cells.len(),
            });
        }
        for (column, ((cell, builder), parameter)) in cells
            .iter()
            .zip(builders.iter_mut())
            .zip(&info.parameters)
            .enumerate()
        {
            let mut flat = Vec::with_capacity(parameter.record_size());
            flatten(cell, &mut flat);
            let value_error = |reason: String| IngestError::Value {
                row,
                column,
                parameter: parameter.name.clone(),
                reason,
            };
            if flat.len() != parameter.record_size() {
                return Err(value_error(format!(
                    "{} values, expected {}",
                    flat.len(),
                    parameter.record_size()
                )));
            }
            for item in flat {
                builder.push_json(item).map_err(&value_error)?;
            }
        }
    }

    let mut records = RecordSet::new();
    for (builder, parameter) in builders.into_iter().zip(&info.parameters) {
        records.insert(parameter.name.as_str(), builder.finish())?;
    }
    debug!(
        rows = data.len(),
        parameters = info.parameters.len(),
        "read JSON response"
    );
    Ok((records, info))
}

fn flatten<'a>(value: &'a Value, out: &mut Vec<&'a Value>) {
    match value {
        Value::Array(items) => items.iter().for_each(|item| flatten(item, out)),
        other => out.push(other),
    }
}
