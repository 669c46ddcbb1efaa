use std::collections::BTreeMap;
use std::path::PathBuf;

/// Outcome of one `convert` or `inspect` run.
#[derive(Debug)]
pub struct ConvertResult {
    pub data: PathBuf,
    pub source_format: &'static str,
    pub records: usize,
    pub variables: Vec<VariableSummary>,
    /// Written file, if any.
    pub output: Option<PathBuf>,
    /// Resolved unit per frame column (CSV output only).
    pub frame_units: BTreeMap<String, String>,
    /// `(variable, target)` pairs whose dependency is not in the dataset.
    pub dangling: Vec<(String, String)>,
}

/// One row of the variable table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableSummary {
    pub name: String,
    pub var_type: String,
    pub kind: &'static str,
    pub shape: String,
    pub record_varying: bool,
    pub units: String,
    pub depends: String,
}
