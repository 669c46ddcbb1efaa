//! Parameter metadata as published in a HAPI `info` document.
//!
//! Parameters are listed in the same order as the data columns. Index 0 is
//! always the time axis.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix every local `$ref` must carry to address the `definitions` mapping.
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Declared value type of a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterType {
    #[serde(rename = "isotime")]
    IsoTime,
    #[serde(rename = "double")]
    Double,
    #[serde(rename = "integer")]
    Integer,
    #[serde(rename = "string")]
    Text,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::IsoTime => "isotime",
            ParameterType::Double => "double",
            ParameterType::Integer => "integer",
            ParameterType::Text => "string",
        }
    }

    /// Whether values of this type are carried as text in the data stream.
    pub fn is_textual(&self) -> bool {
        matches!(self, ParameterType::IsoTime | ParameterType::Text)
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Units are a single string, or one entry per vector component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Units {
    Single(String),
    PerComponent(Vec<Option<String>>),
}

/// A label is a single string, or one entry per vector component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Single(String),
    PerComponent(Vec<String>),
}

/// Fill value. HAPI publishes it as a string, but some servers emit a bare number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FillValue {
    Number(f64),
    Text(String),
}

impl FillValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FillValue::Number(value) => Some(*value),
            FillValue::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// One entry of the `parameters` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub parameter_type: Option<ParameterType>,
    #[serde(default)]
    pub units: Option<Units>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Vec<usize>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<FillValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bins: Option<BinsNode>,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_type: None,
            units: None,
            size: None,
            fill: None,
            length: None,
            description: None,
            label: None,
            bins: None,
        }
    }

    /// Per-record shape. Scalars have an empty shape.
    pub fn shape(&self) -> Vec<usize> {
        self.size.clone().unwrap_or_default()
    }

    /// Number of flat values one record of this parameter occupies.
    pub fn record_size(&self) -> usize {
        self.size
            .as_ref()
            .map(|size| size.iter().product())
            .unwrap_or(1)
    }
}

/// `{"$ref": "#/definitions/<key>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinsReference {
    #[serde(rename = "$ref")]
    pub target: String,
}

impl BinsReference {
    pub fn new(key: &str) -> Self {
        Self {
            target: format!("{DEFINITIONS_PREFIX}{key}"),
        }
    }

    /// The `definitions` key this reference points at, if it is a local
    /// definitions pointer.
    pub fn key(&self) -> Option<&str> {
        self.target
            .strip_prefix(DEFINITIONS_PREFIX)
            .filter(|key| !key.is_empty())
    }
}

/// The `bins` node of a parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BinsNode {
    Reference(BinsReference),
    List(Vec<BinsEntry>),
    Single(BinsDefinition),
}

/// One element of a bins list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BinsEntry {
    Reference(BinsReference),
    Definition(BinsDefinition),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CentersField {
    Values(Vec<f64>),
    /// Name of another parameter carrying the centers.
    Parameter(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RangesField {
    Values(Vec<[f64; 2]>),
    /// Name of another parameter carrying the ranges.
    Parameter(String),
}

/// A bins axis as written in the document, before classification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BinsDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub units: Option<Units>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<Label>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub centers: Option<CentersField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranges: Option<RangesField>,
}

/// How a bins axis is published, decided once from the definition.
#[derive(Debug, Clone, PartialEq)]
pub enum BinsSpec {
    Centers(Vec<f64>),
    /// Half-open `[lower, upper)` pairs.
    Ranges(Vec<[f64; 2]>),
    /// The axis values live in another parameter of the same dataset.
    ParameterRef(String),
}

impl BinsDefinition {
    /// Classify the definition. Literal centers win over everything else,
    /// then a centers parameter name, then literal ranges, then a ranges
    /// parameter name. Returns `None` when neither field is usable.
    pub fn spec(&self) -> Option<BinsSpec> {
        match (&self.centers, &self.ranges) {
            (Some(CentersField::Values(values)), _) => Some(BinsSpec::Centers(values.clone())),
            (Some(CentersField::Parameter(name)), _) => Some(BinsSpec::ParameterRef(name.clone())),
            (None, Some(RangesField::Values(ranges))) => Some(BinsSpec::Ranges(ranges.clone())),
            (None, Some(RangesField::Parameter(name))) => Some(BinsSpec::ParameterRef(name.clone())),
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_key_requires_definitions_prefix() {
        assert_eq!(BinsReference::new("energy").key(), Some("energy"));
        let foreign = BinsReference {
            target: "other.json#/energy".to_string(),
        };
        assert_eq!(foreign.key(), None);
        let empty = BinsReference {
            target: DEFINITIONS_PREFIX.to_string(),
        };
        assert_eq!(empty.key(), None);
    }

    #[test]
    fn literal_centers_take_precedence_over_ranges() {
        let definition = BinsDefinition {
            centers: Some(CentersField::Values(vec![1.0, 4.0])),
            ranges: Some(RangesField::Values(vec![[0.0, 2.0], [2.0, 6.0]])),
            ..BinsDefinition::default()
        };
        assert_eq!(definition.spec(), Some(BinsSpec::Centers(vec![1.0, 4.0])));
    }

    #[test]
    fn centers_string_is_a_parameter_reference() {
        let definition = BinsDefinition {
            centers: Some(CentersField::Parameter("frequencies".to_string())),
            ..BinsDefinition::default()
        };
        assert_eq!(
            definition.spec(),
            Some(BinsSpec::ParameterRef("frequencies".to_string()))
        );
    }

    #[test]
    fn empty_definition_has_no_spec() {
        assert_eq!(BinsDefinition::default().spec(), None);
    }

    #[test]
    fn record_size_multiplies_dimensions() {
        let mut parameter = ParameterDescriptor::new("spectra");
        assert_eq!(parameter.record_size(), 1);
        assert!(parameter.shape().is_empty());
        parameter.size = Some(vec![4, 3]);
        assert_eq!(parameter.record_size(), 12);
    }

    #[test]
    fn fill_value_parses_text() {
        assert_eq!(FillValue::Text("-1e31".to_string()).as_f64(), Some(-1e31));
        assert_eq!(FillValue::Text("n/a".to_string()).as_f64(), None);
        assert_eq!(FillValue::Number(-999.0).as_f64(), Some(-999.0));
    }
}
