//! Self-describing dataset: ordered named variables with ISTP-style attributes.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::records::Values;

/// Attribute names understood by downstream writers.
pub mod attrs {
    pub const UNITS: &str = "UNITS";
    pub const VAR_TYPE: &str = "VAR_TYPE";
    pub const CATDESC: &str = "CATDESC";
    pub const DEPEND_0: &str = "DEPEND_0";
    pub const DELTA_PLUS_VAR: &str = "DELTA_PLUS_VAR";
    pub const DELTA_MINUS_VAR: &str = "DELTA_MINUS_VAR";
    pub const FILLVAL: &str = "FILLVAL";
    pub const LABLAXIS: &str = "LABLAXIS";

    pub const AUTHOR: &str = "Author";
    pub const CREATE_DATE: &str = "CreateDate";

    /// `DEPEND_<k>`
    pub fn depend(k: usize) -> String {
        format!("DEPEND_{k}")
    }
}

/// Units written when the source declares none.
pub const BLANK_UNITS: &str = " ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    SupportData,
    Data,
}

impl VarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarType::SupportData => "support_data",
            VarType::Data => "data",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "support_data" => Some(VarType::SupportData),
            "data" => Some(VarType::Data),
            _ => None,
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    TextList(Vec<String>),
    Float(f64),
    Int(i64),
    DateTime(DateTime<Utc>),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(text) => f.write_str(text),
            AttrValue::TextList(items) => write!(f, "[{}]", items.join(", ")),
            AttrValue::Float(value) => write!(f, "{value}"),
            AttrValue::Int(value) => write!(f, "{value}"),
            AttrValue::DateTime(value) => write!(f, "{}", value.to_rfc3339()),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<Vec<String>> for AttrValue {
    fn from(value: Vec<String>) -> Self {
        AttrValue::TextList(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<DateTime<Utc>> for AttrValue {
    fn from(value: DateTime<Utc>) -> Self {
        AttrValue::DateTime(value)
    }
}

impl From<VarType> for AttrValue {
    fn from(value: VarType) -> Self {
        AttrValue::Text(value.as_str().to_string())
    }
}

pub type Attributes = BTreeMap<String, AttrValue>;

/// A named array with attributes.
///
/// Record-varying variables hold `records * product(shape)` values.
/// Non-record-varying variables (bins axes and their deltas) hold exactly
/// `product(shape)` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub values: Values,
    pub shape: Vec<usize>,
    pub record_varying: bool,
    pub attributes: Attributes,
}

impl Variable {
    /// A record-varying variable with scalar records.
    pub fn new(name: impl Into<String>, values: Values) -> Self {
        Self {
            name: name.into(),
            values,
            shape: Vec::new(),
            record_varying: true,
            attributes: Attributes::new(),
        }
    }

    /// A one-dimensional variable that does not vary by record.
    pub fn non_record_varying(name: impl Into<String>, values: Values) -> Self {
        let len = values.len();
        Self {
            name: name.into(),
            values,
            shape: vec![len],
            record_varying: false,
            attributes: Attributes::new(),
        }
    }

    #[must_use]
    pub fn with_shape(mut self, shape: Vec<usize>) -> Self {
        self.shape = shape;
        self
    }

    #[must_use]
    pub fn with_attr(mut self, key: &str, value: impl Into<AttrValue>) -> Self {
        self.set_attr(key, value);
        self
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    pub fn attr_text(&self, key: &str) -> Option<&str> {
        self.attr(key).and_then(AttrValue::as_text)
    }

    pub fn var_type(&self) -> Option<VarType> {
        self.attr_text(attrs::VAR_TYPE).and_then(VarType::parse)
    }

    pub fn record_size(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn record_count(&self) -> usize {
        if !self.record_varying {
            return 1;
        }
        match self.record_size() {
            0 => 0,
            size => self.values.len() / size,
        }
    }

    /// `(k, target)` for every `DEPEND_k` attribute, in k order.
    pub fn dependencies(&self) -> Vec<(usize, &str)> {
        let mut deps: Vec<(usize, &str)> = self
            .attributes
            .iter()
            .filter_map(|(key, value)| {
                let k = key.strip_prefix("DEPEND_")?.parse().ok()?;
                Some((k, value.as_text()?))
            })
            .collect();
        deps.sort_by_key(|(k, _)| *k);
        deps
    }
}

/// Ordered mapping of variable name to variable, plus dataset attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    variables: Vec<Variable>,
    index: BTreeMap<String, usize>,
    pub attributes: Attributes,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable, replacing (in place) any variable of the same name.
    pub fn insert(&mut self, variable: Variable) -> Option<Variable> {
        match self.index.get(&variable.name) {
            Some(&position) => Some(std::mem::replace(&mut self.variables[position], variable)),
            None => {
                self.index
                    .insert(variable.name.clone(), self.variables.len());
                self.variables.push(variable);
                None
            }
        }
    }

    /// Insert only when no variable of that name exists yet. Returns whether
    /// the variable was stored.
    pub fn insert_if_absent(&mut self, variable: Variable) -> bool {
        if self.contains(&variable.name) {
            return false;
        }
        self.insert(variable);
        true
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.index.get(name).map(|&position| &self.variables[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.variables.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.variables.iter().map(|v| v.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    /// The time axis is always the first variable.
    pub fn time_axis(&self) -> Option<&Variable> {
        self.variables.first()
    }

    pub fn set_attr(&mut self, key: &str, value: impl Into<AttrValue>) {
        self.attributes.insert(key.to_string(), value.into());
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> {
        self.attributes.get(key)
    }

    /// `(variable, target)` pairs whose `DEPEND_k` names a variable that is
    /// not in the dataset.
    pub fn dangling_dependencies(&self) -> Vec<(&str, &str)> {
        self.variables
            .iter()
            .flat_map(|variable| {
                variable
                    .dependencies()
                    .into_iter()
                    .filter(|(_, target)| !self.contains(target))
                    .map(|(_, target)| (variable.name.as_str(), target))
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.variables.iter()
    }
}
