use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::parameter::ParameterDescriptor;

/// The metadata half of a HAPI response.
///
/// `definitions` is kept as raw JSON; entries are interpreted only when a
/// `$ref` asks for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InfoDocument {
    #[serde(rename = "HAPI", default, skip_serializing_if = "Option::is_none")]
    pub hapi_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    pub parameters: Vec<ParameterDescriptor>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definitions: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cadence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        rename = "resourceURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub resource_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl InfoDocument {
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|parameter| parameter.name == name)
    }

    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters
            .iter()
            .map(|parameter| parameter.name.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameter::{BinsNode, BinsSpec, Units};

    const INFO: &str = r##"{
        "HAPI": "3.1",
        "status": {"code": 1200, "message": "OK"},
        "startDate": "2016-01-01T00:00Z",
        "stopDate": "lastday-P1D",
        "x_customField": 7,
        "parameters": [
            {"name": "Time", "type": "isotime", "units": "UTC", "length": 24, "fill": null},
            {"name": "counts", "type": "double", "units": null, "size": [4],
             "bins": {"$ref": "#/definitions/energy"}},
            {"name": "B", "type": "double", "units": ["nT", null, "nT"], "size": [3],
             "label": ["Bx", "By", "Bz"]}
        ],
        "definitions": {
            "energy": [{"name": "energy", "units": "keV", "centers": [1, 2, 3, 4]}]
        }
    }"##;

    #[test]
    fn parses_info_document() {
        let info: InfoDocument = serde_json::from_str(INFO).expect("parse info");
        assert_eq!(info.hapi_version.as_deref(), Some("3.1"));
        assert_eq!(info.parameter_names(), vec!["Time", "counts", "B"]);
        assert!(info.extra.contains_key("x_customField"));
        assert!(info.definitions.contains_key("energy"));

        let counts = info.parameter("counts").expect("counts");
        assert_eq!(counts.units, None);
        assert_eq!(counts.record_size(), 4);
        match &counts.bins {
            Some(BinsNode::Reference(reference)) => assert_eq!(reference.key(), Some("energy")),
            other => panic!("expected reference, got {other:?}"),
        }

        let b = info.parameter("B").expect("B");
        assert_eq!(
            b.units,
            Some(Units::PerComponent(vec![
                Some("nT".to_string()),
                None,
                Some("nT".to_string())
            ]))
        );
    }

    #[test]
    fn parses_inline_bins_list_and_single() {
        let single: BinsNode =
            serde_json::from_str(r#"{"name": "f", "units": "Hz", "ranges": [[0, 2], [2, 6]]}"#)
                .expect("single");
        let BinsNode::Single(definition) = single else {
            panic!("expected single definition");
        };
        assert_eq!(
            definition.spec(),
            Some(BinsSpec::Ranges(vec![[0.0, 2.0], [2.0, 6.0]]))
        );

        let list: BinsNode = serde_json::from_str(
            r##"[{"name": "e", "units": "eV", "centers": [1]}, {"$ref": "#/definitions/pa"}]"##,
        )
        .expect("list");
        let BinsNode::List(entries) = list else {
            panic!("expected list");
        };
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn serializes_back_to_camel_case() {
        let info: InfoDocument = serde_json::from_str(INFO).expect("parse info");
        let value = serde_json::to_value(&info).expect("serialize");
        assert_eq!(value["startDate"], "2016-01-01T00:00Z");
        assert_eq!(value["HAPI"], "3.1");
        assert_eq!(value["x_customField"], 7);
    }
}
