//! Building dataset variables from parameter metadata.
//!
//! Building one parameter may also produce the bins axes it depends on. The
//! builder never touches the dataset: it returns the owner plus its axes as a
//! batch and leaves insertion (and de-duplication of shared axes) to the
//! assembler.

use tracing::{debug, warn};

use hapi_model::{
    AttrValue, BLANK_UNITS, BinsDefinition, FillValue, Label, ParameterDescriptor, RawColumn,
    Units, VarType, Values, Variable, attrs,
};

use crate::bins::{AxisValues, Definitions, ResolvedBins, resolve_bins};
use crate::error::{Result, TransformError};
use crate::time::convert_times;

/// A built variable and the axis variables it introduced, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableBatch {
    pub owner: Variable,
    pub axes: Vec<Variable>,
}

impl VariableBatch {
    pub fn into_variables(self) -> Vec<Variable> {
        let mut out = Vec::with_capacity(1 + self.axes.len());
        out.push(self.owner);
        out.extend(self.axes);
        out
    }
}

/// An axis variable and, for range-derived axes, its half-width variables.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisVariables {
    pub axis: Variable,
    pub delta_plus: Option<Variable>,
    pub delta_minus: Option<Variable>,
}

impl AxisVariables {
    pub fn into_variables(self) -> Vec<Variable> {
        let mut out = vec![self.axis];
        out.extend(self.delta_plus);
        out.extend(self.delta_minus);
        out
    }
}

/// `UNITS` value for a units field; absent units become a single space.
pub fn units_attr(units: Option<&Units>) -> AttrValue {
    match units {
        None => AttrValue::from(BLANK_UNITS),
        Some(Units::Single(units)) => AttrValue::from(units.as_str()),
        Some(Units::PerComponent(units)) => AttrValue::TextList(
            units
                .iter()
                .map(|unit| unit.clone().unwrap_or_else(|| BLANK_UNITS.to_string()))
                .collect(),
        ),
    }
}

fn label_attr(label: &Label) -> AttrValue {
    match label {
        Label::Single(label) => AttrValue::from(label.as_str()),
        Label::PerComponent(labels) => AttrValue::TextList(labels.clone()),
    }
}

fn fill_attr(name: &str, fill: &FillValue, values: &Values) -> Option<AttrValue> {
    let attr = match (values, fill) {
        (Values::Text(_) | Values::Time(_), FillValue::Text(text)) => Some(AttrValue::from(text.as_str())),
        (Values::Text(_) | Values::Time(_), FillValue::Number(number)) => {
            Some(AttrValue::Text(number.to_string()))
        }
        (Values::Int(_), fill) => fill
            .as_f64()
            .filter(|value| value.fract() == 0.0 && value.abs() < i64::MAX as f64)
            .map(|value| AttrValue::Int(value as i64)),
        (Values::Float(_), fill) => fill.as_f64().map(AttrValue::Float),
    };
    if attr.is_none() {
        warn!(variable = name, fill = ?fill, "ignoring fill value that does not fit the column type");
    }
    attr
}

/// Build the time axis from the first parameter.
pub fn build_time_axis(parameter: &ParameterDescriptor, column: &RawColumn) -> Result<Variable> {
    let times = match &column.values {
        Values::Text(values) => convert_times(values.as_slice())?,
        Values::Time(values) => values.clone(),
        other => {
            return Err(TransformError::TimeColumnType {
                name: parameter.name.clone(),
                kind: other.kind(),
            });
        }
    };
    let mut variable = Variable::new(&parameter.name, Values::Time(times))
        .with_attr(attrs::VAR_TYPE, VarType::SupportData);
    if let Some(description) = &parameter.description {
        variable.set_attr(attrs::CATDESC, description.as_str());
    }
    Ok(variable)
}

/// Build a non-axis parameter and every bins axis it depends on.
pub fn build_variable(
    parameter: &ParameterDescriptor,
    column: &RawColumn,
    time_axis: &str,
    definitions: &Definitions,
) -> Result<VariableBatch> {
    let mut owner = Variable::new(&parameter.name, column.values.clone())
        .with_shape(column.shape.clone())
        .with_attr(attrs::UNITS, units_attr(parameter.units.as_ref()))
        .with_attr(attrs::DEPEND_0, time_axis)
        .with_attr(attrs::VAR_TYPE, VarType::Data);
    if let Some(description) = &parameter.description {
        owner.set_attr(attrs::CATDESC, description.as_str());
    }
    if let Some(label) = &parameter.label {
        owner.set_attr(attrs::LABLAXIS, label_attr(label));
    }
    if let Some(fill) = &parameter.fill
        && let Some(value) = fill_attr(&parameter.name, fill, &column.values)
    {
        owner.set_attr(attrs::FILLVAL, value);
    }

    let mut axes = Vec::new();
    if let Some(bins) = &parameter.bins {
        let resolved = resolve_bins(bins, definitions)?;
        let count = resolved.len();
        for (offset, bins) in resolved.iter().enumerate() {
            let k = offset + 1;
            let target = match &bins.axis {
                AxisValues::Satisfied { parameter: target } => {
                    debug!(
                        variable = %parameter.name,
                        depend = k,
                        target = %target,
                        "bins refer to another parameter"
                    );
                    target.clone()
                }
                _ => {
                    let name = axis_name(&parameter.name, bins, k, count);
                    if let Some(built) = build_axis(&name, bins) {
                        axes.extend(built.into_variables());
                    }
                    name
                }
            };
            owner.set_attr(&attrs::depend(k), target);
        }
    }

    debug!(
        variable = %parameter.name,
        kind = owner.values.kind(),
        shape = ?owner.shape,
        axes = axes.len(),
        "built variable"
    );
    Ok(VariableBatch { owner, axes })
}

fn axis_name(owner: &str, bins: &ResolvedBins, k: usize, count: usize) -> String {
    match bins.name() {
        Some(name) => name.to_string(),
        None if count == 1 => format!("{owner}_bins"),
        None => format!("{owner}_bins_{k}"),
    }
}

/// Build the support variables for one resolved bins axis. Returns `None`
/// when the axis is another parameter and nothing needs to be emitted.
pub fn build_axis(name: &str, bins: &ResolvedBins) -> Option<AxisVariables> {
    let definition = &bins.definition;
    match &bins.axis {
        AxisValues::Satisfied { .. } => None,
        AxisValues::Centers(centers) => Some(AxisVariables {
            axis: axis_variable(name, definition, centers.clone()),
            delta_plus: None,
            delta_minus: None,
        }),
        AxisValues::Ranges {
            centers,
            delta_plus,
            delta_minus,
        } => {
            let plus_name = format!("{name}DeltaPlus");
            let minus_name = format!("{name}DeltaMinus");
            let axis = axis_variable(name, definition, centers.clone())
                .with_attr(attrs::DELTA_PLUS_VAR, plus_name.as_str())
                .with_attr(attrs::DELTA_MINUS_VAR, minus_name.as_str());
            Some(AxisVariables {
                axis,
                delta_plus: Some(support_variable(&plus_name, definition, delta_plus.clone())),
                delta_minus: Some(support_variable(&minus_name, definition, delta_minus.clone())),
            })
        }
    }
}

fn axis_variable(name: &str, definition: &BinsDefinition, centers: Vec<f64>) -> Variable {
    let mut variable = support_variable(name, definition, centers);
    if let Some(description) = &definition.description {
        variable.set_attr(attrs::CATDESC, description.as_str());
    }
    if let Some(label) = &definition.label {
        variable.set_attr(attrs::LABLAXIS, label_attr(label));
    }
    variable
}

fn support_variable(name: &str, definition: &BinsDefinition, values: Vec<f64>) -> Variable {
    Variable::non_record_varying(name, Values::Float(values))
        .with_attr(attrs::UNITS, units_attr(definition.units.as_ref()))
        .with_attr(attrs::VAR_TYPE, VarType::SupportData)
}
