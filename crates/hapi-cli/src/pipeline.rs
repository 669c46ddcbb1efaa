//! Conversion stages shared by the subcommands: load, assemble, write.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use hapi_ingest::{LoadOptions, LoadedResponse, load_response};
use hapi_model::{Dataset, Variable, attrs};
use hapi_output::{TimeSeriesFrame, UnitTable, dataset_to_frame, write_frame_csv, write_json_headed_ascii};
use hapi_transform::{AssembleOptions, assemble_from_info};

use crate::types::VariableSummary;

/// Output written by `convert`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Ascii,
    Csv,
}

impl OutputKind {
    /// Suffix appended to the data file stem for the default output path.
    pub fn suffix(&self) -> &'static str {
        match self {
            OutputKind::Ascii => "dataset.txt",
            OutputKind::Csv => "frame.csv",
        }
    }
}

/// A loaded response and the dataset assembled from it.
#[derive(Debug)]
pub struct Assembled {
    pub response: LoadedResponse,
    pub dataset: Dataset,
}

/// Load `data` and assemble its dataset.
pub fn load_and_assemble(
    data: &Path,
    load: &LoadOptions,
    assemble: &AssembleOptions,
) -> Result<Assembled> {
    let span = info_span!("convert", data = %data.display());
    let _guard = span.enter();
    let started = Instant::now();

    let response = load_response(data, load)
        .with_context(|| format!("load response: {}", data.display()))?;
    let dataset = assemble_from_info(&response.records, &response.info, assemble)
        .with_context(|| format!("assemble dataset: {}", data.display()))?;
    info!(
        variables = dataset.len(),
        records = response.records.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "dataset ready"
    );
    Ok(Assembled { response, dataset })
}

/// `<dir>/<stem>.<suffix>` next to the data file.
pub fn default_output_path(data: &Path, kind: OutputKind) -> PathBuf {
    let stem = data
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("hapi");
    data.with_file_name(format!("{stem}.{}", kind.suffix()))
}

/// Write the dataset as JSON-headed ASCII.
pub fn write_ascii(dataset: &Dataset, path: &Path) -> Result<()> {
    let mut writer = create(path)?;
    write_json_headed_ascii(&mut writer, dataset)
        .with_context(|| format!("write ASCII: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    info!(path = %path.display(), "wrote JSON-headed ASCII");
    Ok(())
}

/// Flatten the dataset into a frame and write it as CSV.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<TimeSeriesFrame> {
    let mut frame =
        dataset_to_frame(dataset, &UnitTable::default()).context("build time series frame")?;
    let mut writer = create(path)?;
    write_frame_csv(&mut writer, &mut frame)
        .with_context(|| format!("write CSV: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    info!(
        path = %path.display(),
        columns = frame.data.width(),
        "wrote frame CSV"
    );
    Ok(frame)
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// One summary row per variable, in dataset order.
pub fn summarize(dataset: &Dataset) -> Vec<VariableSummary> {
    dataset.iter().map(summarize_variable).collect()
}

fn summarize_variable(variable: &Variable) -> VariableSummary {
    let shape = if variable.shape.is_empty() {
        "scalar".to_string()
    } else {
        variable
            .shape
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("x")
    };
    let depends = variable
        .dependencies()
        .into_iter()
        .map(|(k, target)| format!("{k}:{target}"))
        .collect::<Vec<_>>()
        .join(" ");
    VariableSummary {
        name: variable.name.clone(),
        var_type: variable
            .var_type()
            .map(|var_type| var_type.to_string())
            .unwrap_or_default(),
        kind: variable.values.kind(),
        shape,
        record_varying: variable.record_varying,
        units: variable
            .attr(attrs::UNITS)
            .map(ToString::to_string)
            .unwrap_or_default(),
        depends,
    }
}
