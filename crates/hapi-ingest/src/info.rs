//! Loading `info` documents, standalone or embedded in a CSV header.

use std::fs;
use std::path::Path;

use tracing::debug;

use hapi_model::InfoDocument;

use crate::error::{IngestError, Result};

/// Read an `info` JSON document from disk.
pub fn load_info(path: &Path) -> Result<InfoDocument> {
    let text = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let info = parse_info(&text, &path.display().to_string())?;
    debug!(
        path = %path.display(),
        parameters = info.parameters.len(),
        "loaded info document"
    );
    Ok(info)
}

/// Parse an `info` document; `context` names the source in errors.
pub fn parse_info(text: &str, context: &str) -> Result<InfoDocument> {
    let info: InfoDocument = serde_json::from_str(text).map_err(|source| IngestError::Json {
        context: context.to_string(),
        source,
    })?;
    if info.parameters.is_empty() {
        return Err(IngestError::NoParameters);
    }
    Ok(info)
}

/// Parse the `#`-prefixed JSON header of a CSV response. Lines without the
/// prefix are ignored; returns `None` when there are no header lines.
pub fn parse_csv_header<'a, I>(lines: I) -> Result<Option<InfoDocument>>
where
    I: IntoIterator<Item = &'a str>,
{
    let json: String = lines
        .into_iter()
        .filter_map(|line| line.strip_prefix('#'))
        .collect::<Vec<_>>()
        .join("\n");
    if json.trim().is_empty() {
        return Ok(None);
    }
    parse_info(&json, "CSV header").map(Some)
}

/// The leading `#` lines of a CSV body.
pub fn header_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().take_while(|line| line.starts_with('#'))
}

/// Narrow an info document to the time parameter plus `names`, keeping
/// document order. An empty selection keeps everything.
pub fn select_parameters<S: AsRef<str>>(info: &InfoDocument, names: &[S]) -> Result<InfoDocument> {
    if names.is_empty() {
        return Ok(info.clone());
    }
    if let Some(unknown) = names
        .iter()
        .map(AsRef::as_ref)
        .find(|name| info.parameter(name).is_none())
    {
        return Err(IngestError::UnknownParameter {
            name: unknown.to_string(),
        });
    }
    let mut selected = info.clone();
    selected.parameters = info
        .parameters
        .iter()
        .enumerate()
        .filter(|(index, parameter)| {
            *index == 0 || names.iter().any(|name| name.as_ref() == parameter.name)
        })
        .map(|(_, parameter)| parameter.clone())
        .collect();
    debug!(
        selected = selected.parameters.len(),
        available = info.parameters.len(),
        "selected parameters"
    );
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: &str = r#"{
        "HAPI": "3.1",
        "parameters": [
            {"name": "Time", "type": "isotime", "units": "UTC", "length": 24},
            {"name": "a", "type": "double", "units": "m"},
            {"name": "b", "type": "integer", "units": null},
            {"name": "c", "type": "string", "units": null, "length": 4}
        ]
    }"#;

    #[test]
    fn header_lines_are_stripped_and_parsed() {
        let csv = format!(
            "{}\n2016-01-01T00:00Z,1,2,x\n",
            INFO.lines().map(|l| format!("#{l}")).collect::<Vec<_>>().join("\n")
        );
        let info = parse_csv_header(header_lines(&csv))
            .expect("parse")
            .expect("header");
        assert_eq!(info.parameter_names(), vec!["Time", "a", "b", "c"]);
        assert_eq!(parse_csv_header(header_lines("1,2\n")).expect("parse"), None);
    }

    #[test]
    fn selection_keeps_time_and_document_order() {
        let info = parse_info(INFO, "test").expect("info");
        let selected = select_parameters(&info, &["c", "a"]).expect("select");
        assert_eq!(selected.parameter_names(), vec!["Time", "a", "c"]);
        let all = select_parameters::<&str>(&info, &[]).expect("select all");
        assert_eq!(all.parameters.len(), 4);
        let err = select_parameters(&info, &["nope"]).unwrap_err();
        assert!(matches!(err, IngestError::UnknownParameter { name } if name == "nope"));
    }

    #[test]
    fn empty_parameter_list_is_rejected() {
        let err = parse_info(r#"{"parameters": []}"#, "test").unwrap_err();
        assert!(matches!(err, IngestError::NoParameters));
    }
}
