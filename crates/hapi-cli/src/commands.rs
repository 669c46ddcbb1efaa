use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::warn;

use hapi_cli::pipeline::{
    Assembled, OutputKind, default_output_path, load_and_assemble, summarize, write_ascii,
    write_csv,
};
use hapi_cli::types::ConvertResult;
use hapi_ingest::LoadOptions;
use hapi_transform::AssembleOptions;

use crate::cli::{ConvertArgs, OutputFormatArg, SourceArgs};

pub fn run_convert(args: &ConvertArgs) -> Result<ConvertResult> {
    let mut options = AssembleOptions::default();
    if let Some(author) = &args.author {
        options = options.with_author(author.as_str());
    }
    if let Some(raw) = &args.created_at {
        let created_at = DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("parse --created-at {raw:?}"))?
            .with_timezone(&Utc);
        options = options.with_created_at(created_at);
    }

    let assembled = load_and_assemble(&args.source.data, &load_options(&args.source), &options)?;
    let kind = match args.to {
        OutputFormatArg::Ascii => OutputKind::Ascii,
        OutputFormatArg::Csv => OutputKind::Csv,
    };
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.source.data, kind));

    let mut result = describe(&args.source, &assembled);
    match kind {
        OutputKind::Ascii => write_ascii(&assembled.dataset, &output)?,
        OutputKind::Csv => {
            let frame = write_csv(&assembled.dataset, &output)?;
            result.frame_units = frame.units;
        }
    }
    result.output = Some(output);
    Ok(result)
}

pub fn run_inspect(args: &SourceArgs) -> Result<ConvertResult> {
    let assembled = load_and_assemble(&args.data, &load_options(args), &AssembleOptions::default())?;
    Ok(describe(args, &assembled))
}

fn load_options(args: &SourceArgs) -> LoadOptions {
    let mut options = LoadOptions::default().with_parameters(args.parameters.clone());
    if let Some(info) = &args.info {
        options = options.with_info_path(info);
    }
    options
}

fn describe(args: &SourceArgs, assembled: &Assembled) -> ConvertResult {
    let dangling: Vec<(String, String)> = assembled
        .dataset
        .dangling_dependencies()
        .into_iter()
        .map(|(variable, target)| (variable.to_string(), target.to_string()))
        .collect();
    if !dangling.is_empty() {
        warn!(count = dangling.len(), "dataset has unresolved dependencies");
    }
    ConvertResult {
        data: args.data.clone(),
        source_format: assembled.response.format.as_str(),
        records: assembled.response.records.len(),
        variables: summarize(&assembled.dataset),
        output: None,
        frame_units: Default::default(),
        dangling,
    }
}
