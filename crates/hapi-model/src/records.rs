//! Raw columns as delivered by a HAPI transport.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;

use crate::error::{ModelError, Result};

/// Flat, row-major storage for one column or variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Values {
    Text(Vec<String>),
    Float(Vec<f64>),
    Int(Vec<i64>),
    Time(Vec<NaiveDateTime>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::Text(values) => values.len(),
            Values::Float(values) => values.len(),
            Values::Int(values) => values.len(),
            Values::Time(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Values::Text(_) => "text",
            Values::Float(_) => "float",
            Values::Int(_) => "int",
            Values::Time(_) => "time",
        }
    }

    pub fn as_time(&self) -> Option<&[NaiveDateTime]> {
        match self {
            Values::Time(values) => Some(values),
            _ => None,
        }
    }
}

/// One parameter's data: flat values plus the shape of a single record.
#[derive(Debug, Clone, PartialEq)]
pub struct RawColumn {
    pub values: Values,
    pub shape: Vec<usize>,
}

impl RawColumn {
    pub fn scalar(values: Values) -> Self {
        Self {
            values,
            shape: Vec::new(),
        }
    }

    pub fn with_shape(values: Values, shape: Vec<usize>) -> Self {
        Self { values, shape }
    }

    pub fn record_size(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn record_count(&self) -> usize {
        match self.record_size() {
            0 => 0,
            size => self.values.len() / size,
        }
    }
}

/// Parameter name to raw column. All columns share one record count.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordSet {
    columns: BTreeMap<String, RawColumn>,
    records: Option<usize>,
}

impl RecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a column, checking its shape and record count against the others.
    pub fn insert(&mut self, name: impl Into<String>, column: RawColumn) -> Result<()> {
        let name = name.into();
        if self.columns.contains_key(&name) {
            return Err(ModelError::DuplicateColumn { name });
        }
        let record_size = column.record_size();
        if record_size > 0 && column.values.len() % record_size != 0 {
            return Err(ModelError::ShapeMismatch {
                name,
                len: column.values.len(),
                record_size,
            });
        }
        let count = column.record_count();
        match self.records {
            Some(expected) if expected != count => {
                return Err(ModelError::RecordCountMismatch {
                    name,
                    expected,
                    actual: count,
                });
            }
            _ => self.records = Some(count),
        }
        self.columns.insert(name, column);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&RawColumn> {
        self.columns.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Number of records (rows).
    pub fn len(&self) -> usize {
        self.records.unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_count_uses_shape() {
        let column = RawColumn::with_shape(Values::Float(vec![0.0; 12]), vec![2, 3]);
        assert_eq!(column.record_size(), 6);
        assert_eq!(column.record_count(), 2);
        let scalar = RawColumn::scalar(Values::Int(vec![1, 2, 3]));
        assert_eq!(scalar.record_count(), 3);
    }

    #[test]
    fn rejects_inconsistent_columns() {
        let mut records = RecordSet::new();
        records
            .insert(
                "Time",
                RawColumn::scalar(Values::Text(vec!["2020".into(), "2021".into()])),
            )
            .expect("time");
        let err = records
            .insert("x", RawColumn::scalar(Values::Float(vec![1.0])))
            .unwrap_err();
        assert!(matches!(
            err,
            ModelError::RecordCountMismatch {
                expected: 2,
                actual: 1,
                ..
            }
        ));
        let err = records
            .insert(
                "v",
                RawColumn::with_shape(Values::Float(vec![1.0; 5]), vec![3]),
            )
            .unwrap_err();
        assert!(matches!(err, ModelError::ShapeMismatch { .. }));
        let err = records
            .insert(
                "Time",
                RawColumn::scalar(Values::Text(vec!["a".into(), "b".into()])),
            )
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateColumn { .. }));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn empty_record_set() {
        let mut records = RecordSet::new();
        assert!(records.is_empty());
        records
            .insert("Time", RawColumn::scalar(Values::Text(Vec::new())))
            .expect("empty time");
        assert_eq!(records.len(), 0);
        assert!(records.contains("Time"));
    }
}
