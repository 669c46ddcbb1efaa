//! Dataset assembly: one pass over the parameter list in document order.

use chrono::{DateTime, Utc};
use tracing::{debug, info, info_span, warn};

use hapi_model::{Dataset, InfoDocument, ParameterDescriptor, RawColumn, RecordSet, attrs};

use crate::bins::Definitions;
use crate::error::{Result, TransformError};
use crate::variable::{build_time_axis, build_variable};

/// Value of the `Author` dataset attribute unless overridden.
pub const DEFAULT_AUTHOR: &str = "hapi-convert";

/// Options controlling dataset-level provenance attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct AssembleOptions {
    pub author: String,
    /// Fixed `CreateDate`; the wall clock at assembly time when `None`.
    pub created_at: Option<DateTime<Utc>>,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            created_at: None,
        }
    }
}

impl AssembleOptions {
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    #[must_use]
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }
}

/// Assemble a dataset from raw columns and the parameter list.
///
/// Parameter 0 becomes the time axis; every later parameter becomes a `data`
/// variable depending on it, together with any bins axes it introduces.
/// Shared axes are stored once, under the name first seen. The first failure
/// aborts assembly.
pub fn assemble_dataset(
    records: &RecordSet,
    parameters: &[ParameterDescriptor],
    definitions: &Definitions,
    options: &AssembleOptions,
) -> Result<Dataset> {
    let span = info_span!(
        "assemble",
        parameters = parameters.len(),
        records = records.len()
    );
    let _guard = span.enter();

    let (time_parameter, rest) = parameters
        .split_first()
        .ok_or(TransformError::NoParameters)?;
    let time_axis = time_parameter.name.as_str();

    let mut dataset = Dataset::new();
    dataset.insert(build_time_axis(
        time_parameter,
        column_for(records, time_parameter)?,
    )?);

    for parameter in rest {
        let batch = build_variable(
            parameter,
            column_for(records, parameter)?,
            time_axis,
            definitions,
        )?;
        if dataset.contains(&batch.owner.name) {
            return Err(TransformError::DuplicateVariable {
                name: batch.owner.name,
            });
        }
        dataset.insert(batch.owner);
        for axis in batch.axes {
            let name = axis.name.clone();
            if dataset.insert_if_absent(axis) {
                debug!(axis = %name, owner = %parameter.name, "added bins axis");
            } else {
                debug!(axis = %name, owner = %parameter.name, "bins axis already present");
            }
        }
    }

    for (variable, target) in dataset.dangling_dependencies() {
        warn!(
            variable,
            target, "dependency names a variable that is not in the dataset"
        );
    }

    dataset.set_attr(attrs::AUTHOR, options.author.as_str());
    dataset.set_attr(
        attrs::CREATE_DATE,
        options.created_at.unwrap_or_else(Utc::now),
    );
    info!(variables = dataset.len(), "assembled dataset");
    Ok(dataset)
}

/// Assemble using the parameters and definitions of an `info` document.
pub fn assemble_from_info(
    records: &RecordSet,
    info: &InfoDocument,
    options: &AssembleOptions,
) -> Result<Dataset> {
    assemble_dataset(records, &info.parameters, &info.definitions, options)
}

fn column_for<'a>(records: &'a RecordSet, parameter: &ParameterDescriptor) -> Result<&'a RawColumn> {
    records
        .get(&parameter.name)
        .ok_or_else(|| TransformError::MissingColumn {
            name: parameter.name.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hapi_model::Values;

    #[test]
    fn empty_parameter_list_is_an_error() {
        let err = assemble_dataset(
            &RecordSet::new(),
            &[],
            &Definitions::new(),
            &AssembleOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::NoParameters));
    }

    #[test]
    fn missing_column_is_an_error() {
        let mut records = RecordSet::new();
        records
            .insert("Time", RawColumn::scalar(Values::Text(Vec::new())))
            .expect("time");
        let parameters = vec![
            ParameterDescriptor::new("Time"),
            ParameterDescriptor::new("absent"),
        ];
        let err = assemble_dataset(
            &records,
            &parameters,
            &Definitions::new(),
            &AssembleOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::MissingColumn { name } if name == "absent"));
    }

    fn records_with(columns: Vec<(&str, RawColumn)>) -> RecordSet {
        let mut records = RecordSet::new();
        for (name, column) in columns {
            records.insert(name, column).expect("column");
        }
        records
    }

    #[test]
    fn parameter_named_like_the_time_axis_is_rejected() {
        let records = records_with(vec![(
            "Time",
            RawColumn::scalar(Values::Text(vec!["2016".to_string()])),
        )]);
        let parameters = vec![
            ParameterDescriptor::new("Time"),
            ParameterDescriptor::new("Time"),
        ];
        let err = assemble_dataset(
            &records,
            &parameters,
            &Definitions::new(),
            &AssembleOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::DuplicateVariable { name } if name == "Time"));
    }

    #[test]
    fn parameter_named_like_an_earlier_axis_is_rejected() {
        let records = records_with(vec![
            (
                "Time",
                RawColumn::scalar(Values::Text(vec!["2016".to_string()])),
            ),
            (
                "flux",
                RawColumn::with_shape(Values::Float(vec![1.0, 2.0]), vec![2]),
            ),
            ("energy", RawColumn::scalar(Values::Float(vec![3.0]))),
        ]);
        let mut flux = ParameterDescriptor::new("flux");
        flux.size = Some(vec![2]);
        flux.bins = Some(
            serde_json::from_value(serde_json::json!(
                {"name": "energy", "units": "keV", "centers": [1, 2]}
            ))
            .expect("bins"),
        );
        let parameters = vec![
            ParameterDescriptor::new("Time"),
            flux,
            ParameterDescriptor::new("energy"),
        ];
        let err = assemble_dataset(
            &records,
            &parameters,
            &Definitions::new(),
            &AssembleOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, TransformError::DuplicateVariable { name } if name == "energy"));
    }

    #[test]
    fn options_builder() {
        let when = DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .expect("rfc3339")
            .with_timezone(&Utc);
        let options = AssembleOptions::default()
            .with_author("tester")
            .with_created_at(when);
        assert_eq!(options.author, "tester");
        assert_eq!(options.created_at, Some(when));
        assert_eq!(AssembleOptions::default().author, DEFAULT_AUTHOR);
    }
}
