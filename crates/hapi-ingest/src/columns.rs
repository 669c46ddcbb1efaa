//! Typed column accumulation shared by the CSV and JSON readers.

use serde_json::Value;

use hapi_model::{ParameterDescriptor, ParameterType, RawColumn, Values};

/// Storage kind a parameter's values are read into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Float,
    Int,
}

impl ColumnKind {
    /// `isotime` and `string` stay text. Without a declared type the first
    /// parameter is read as text and the rest as doubles.
    pub fn for_parameter(index: usize, parameter: &ParameterDescriptor) -> Self {
        match parameter.parameter_type {
            Some(kind) if kind.is_textual() => ColumnKind::Text,
            Some(ParameterType::Integer) => ColumnKind::Int,
            Some(_) => ColumnKind::Float,
            None if index == 0 => ColumnKind::Text,
            None => ColumnKind::Float,
        }
    }
}

/// Parses a string as f64, returning None for invalid or empty strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<f64>().ok()
}

/// Parses a string as i64, returning None for invalid or empty strings.
/// Integral floats such as `3.0` are accepted.
pub fn parse_i64(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    value.parse::<i64>().ok().or_else(|| {
        value
            .parse::<f64>()
            .ok()
            .filter(|number| number.fract() == 0.0 && number.abs() < i64::MAX as f64)
            .map(|number| number as i64)
    })
}

#[derive(Debug)]
pub(crate) struct ColumnBuilder {
    values: Values,
    shape: Vec<usize>,
}

impl ColumnBuilder {
    pub(crate) fn new(kind: ColumnKind, parameter: &ParameterDescriptor) -> Self {
        let values = match kind {
            ColumnKind::Text => Values::Text(Vec::new()),
            ColumnKind::Float => Values::Float(Vec::new()),
            ColumnKind::Int => Values::Int(Vec::new()),
        };
        Self {
            values,
            shape: parameter.shape(),
        }
    }

    pub(crate) fn push_str(&mut self, raw: &str) -> Result<(), String> {
        match &mut self.values {
            Values::Text(values) => values.push(raw.trim().to_string()),
            Values::Float(values) => values.push(
                parse_f64(raw).ok_or_else(|| format!("{raw:?} is not a number"))?,
            ),
            Values::Int(values) => values.push(
                parse_i64(raw).ok_or_else(|| format!("{raw:?} is not an integer"))?,
            ),
            Values::Time(_) => return Err("time values are not read directly".to_string()),
        }
        Ok(())
    }

    pub(crate) fn push_json(&mut self, value: &Value) -> Result<(), String> {
        if let Value::String(text) = value {
            return self.push_str(text);
        }
        match (&mut self.values, value) {
            (Values::Text(values), other) => {
                values.push(other.to_string());
                Ok(())
            }
            (Values::Float(values), Value::Number(number)) => {
                let number = number
                    .as_f64()
                    .ok_or_else(|| format!("{number} is out of range"))?;
                values.push(number);
                Ok(())
            }
            (Values::Int(values), Value::Number(number)) => {
                let number = number
                    .as_i64()
                    .ok_or_else(|| format!("{number} is not an integer"))?;
                values.push(number);
                Ok(())
            }
            (_, other) => Err(format!("{other} is not a number")),
        }
    }

    pub(crate) fn finish(self) -> RawColumn {
        RawColumn::with_shape(self.values, self.shape)
    }
}
