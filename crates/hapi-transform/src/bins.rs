//! Resolution of `bins` metadata into axis values.
//!
//! A parameter's `bins` node may be a single definition, a list of them, or a
//! `$ref` into the document's `definitions`; list elements may be references
//! too. References are followed first, then every definition is classified
//! as centers, ranges, or a pointer to another parameter.

use std::collections::BTreeMap;

use serde_json::Value;

use hapi_model::{BinsDefinition, BinsEntry, BinsNode, BinsReference, BinsSpec};

use crate::error::{Result, TransformError};

/// Shared definitions keyed by name, as found in the `info` document.
pub type Definitions = BTreeMap<String, Value>;

/// Longest chain of definitions referring to definitions that is followed.
pub const MAX_REFERENCE_DEPTH: usize = 8;

/// Values of one bins axis.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisValues {
    /// Centers published directly.
    Centers(Vec<f64>),
    /// Centers derived from `[lower, upper)` ranges, with half-widths.
    Ranges {
        centers: Vec<f64>,
        delta_plus: Vec<f64>,
        delta_minus: Vec<f64>,
    },
    /// The axis is another parameter of the dataset; nothing new to emit.
    Satisfied { parameter: String },
}

impl AxisValues {
    pub fn centers(&self) -> Option<&[f64]> {
        match self {
            AxisValues::Centers(centers) | AxisValues::Ranges { centers, .. } => Some(centers),
            AxisValues::Satisfied { .. } => None,
        }
    }

    /// Derive centers and half-widths from ranges.
    pub fn from_ranges(ranges: &[[f64; 2]]) -> Self {
        let centers: Vec<f64> = ranges
            .iter()
            .map(|[lower, upper]| lower + (upper - lower) / 2.0)
            .collect();
        let delta_plus = ranges
            .iter()
            .zip(&centers)
            .map(|([_, upper], center)| upper - center)
            .collect();
        let delta_minus = ranges
            .iter()
            .zip(&centers)
            .map(|([lower, _], center)| center - lower)
            .collect();
        AxisValues::Ranges {
            centers,
            delta_plus,
            delta_minus,
        }
    }
}

/// A bins definition with its axis values resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedBins {
    pub definition: BinsDefinition,
    pub axis: AxisValues,
}

impl ResolvedBins {
    pub fn from_definition(definition: BinsDefinition) -> Result<Self> {
        let axis = match definition.spec() {
            Some(BinsSpec::Centers(centers)) => AxisValues::Centers(centers),
            Some(BinsSpec::Ranges(ranges)) => AxisValues::from_ranges(&ranges),
            Some(BinsSpec::ParameterRef(parameter)) => AxisValues::Satisfied { parameter },
            None => {
                return Err(TransformError::UnsupportedBins {
                    name: definition
                        .name
                        .clone()
                        .unwrap_or_else(|| "(unnamed)".to_string()),
                });
            }
        };
        Ok(Self { definition, axis })
    }

    pub fn name(&self) -> Option<&str> {
        self.definition.name.as_deref()
    }
}

/// Resolve every axis of a `bins` node, in document order.
pub fn resolve_bins(node: &BinsNode, definitions: &Definitions) -> Result<Vec<ResolvedBins>> {
    expand_bins(node, definitions)?
        .into_iter()
        .map(ResolvedBins::from_definition)
        .collect()
}

/// Follow references and flatten the node into concrete definitions.
pub fn expand_bins(node: &BinsNode, definitions: &Definitions) -> Result<Vec<BinsDefinition>> {
    let mut out = Vec::new();
    expand_node(node, definitions, 0, &mut out)?;
    Ok(out)
}

fn expand_node(
    node: &BinsNode,
    definitions: &Definitions,
    depth: usize,
    out: &mut Vec<BinsDefinition>,
) -> Result<()> {
    match node {
        BinsNode::Reference(reference) => {
            let target = lookup(reference, definitions, depth)?;
            expand_node(&target, definitions, depth + 1, out)
        }
        BinsNode::List(entries) => {
            for entry in entries {
                match entry {
                    BinsEntry::Reference(reference) => {
                        let target = lookup(reference, definitions, depth)?;
                        expand_node(&target, definitions, depth + 1, out)?;
                    }
                    BinsEntry::Definition(definition) => out.push(definition.clone()),
                }
            }
            Ok(())
        }
        BinsNode::Single(definition) => {
            out.push(definition.clone());
            Ok(())
        }
    }
}

fn lookup(reference: &BinsReference, definitions: &Definitions, depth: usize) -> Result<BinsNode> {
    if depth >= MAX_REFERENCE_DEPTH {
        return Err(TransformError::InvalidReference {
            target: reference.target.clone(),
            reason: format!("more than {MAX_REFERENCE_DEPTH} nested references"),
        });
    }
    let key = reference
        .key()
        .ok_or_else(|| TransformError::InvalidReference {
            target: reference.target.clone(),
            reason: "expected #/definitions/<name>".to_string(),
        })?;
    let value = definitions
        .get(key)
        .ok_or_else(|| TransformError::UndefinedReference {
            target: reference.target.clone(),
        })?;
    serde_json::from_value(value.clone()).map_err(|source| TransformError::InvalidDefinition {
        key: key.to_string(),
        source,
    })
}
