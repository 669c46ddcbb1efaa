//! File-level entry point: pick the reader by extension and find the metadata.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, info_span, warn};

use hapi_model::{InfoDocument, RecordSet};

use crate::csv_records::read_csv_records;
use crate::error::{IngestError, Result};
use crate::info::{header_lines, load_info, parse_csv_header, select_parameters};
use crate::json_response::read_json_response;

/// Container format of a data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Csv,
    Json,
}

impl ResponseFormat {
    /// `.json` files are JSON responses; anything else is read as CSV.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ResponseFormat::Json,
            _ => ResponseFormat::Csv,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::Csv => "csv",
            ResponseFormat::Json => "json",
        }
    }
}

/// Where to find metadata and which parameters to keep.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Standalone `info` document. Takes precedence over an embedded header.
    pub info_path: Option<PathBuf>,
    /// Parameters to keep besides time; empty keeps all.
    pub parameters: Vec<String>,
}

impl LoadOptions {
    #[must_use]
    pub fn with_info_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.info_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_parameters(mut self, parameters: Vec<String>) -> Self {
        self.parameters = parameters;
        self
    }
}

/// A data file paired with the metadata describing it.
#[derive(Debug, Clone)]
pub struct LoadedResponse {
    pub info: InfoDocument,
    pub records: RecordSet,
    pub format: ResponseFormat,
}

/// Load a HAPI response from disk.
///
/// For CSV the (narrowed) parameter list describes the columns present in the
/// file, as a server does when `parameters=` is given. JSON responses carry
/// their own metadata; the selection narrows it after reading.
pub fn load_response(data_path: &Path, options: &LoadOptions) -> Result<LoadedResponse> {
    let format = ResponseFormat::from_path(data_path);
    let span = info_span!("load", path = %data_path.display(), format = format.as_str());
    let _guard = span.enter();

    let text = fs::read_to_string(data_path).map_err(|source| IngestError::Io {
        path: data_path.to_path_buf(),
        source,
    })?;

    let (info, records) = match format {
        ResponseFormat::Json => {
            let (records, embedded) = read_json_response(text.as_bytes())?;
            if let Some(path) = &options.info_path {
                warn!(
                    info = %path.display(),
                    "JSON responses carry their own metadata; ignoring info document"
                );
            }
            (select_parameters(&embedded, &options.parameters)?, records)
        }
        ResponseFormat::Csv => {
            let embedded = parse_csv_header(header_lines(&text))?;
            let info = match (&options.info_path, embedded) {
                (Some(path), embedded) => {
                    if embedded.is_some() {
                        debug!("info document given; embedded header ignored");
                    }
                    load_info(path)?
                }
                (None, Some(embedded)) => embedded,
                (None, None) => {
                    return Err(IngestError::MissingInfo {
                        path: data_path.to_path_buf(),
                    });
                }
            };
            let info = select_parameters(&info, &options.parameters)?;
            let records = read_csv_records(text.as_bytes(), &info)?;
            (info, records)
        }
    };

    info!(
        parameters = info.parameters.len(),
        records = records.len(),
        "loaded response"
    );
    Ok(LoadedResponse {
        info,
        records,
        format,
    })
}
