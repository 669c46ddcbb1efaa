//! End-to-end assembly from `info` metadata and raw columns.

use chrono::{DateTime, NaiveDate, Utc};
use serde_json::json;

use hapi_model::{AttrValue, InfoDocument, RawColumn, RecordSet, Values, VarType, attrs};
use hapi_transform::{AssembleOptions, DEFAULT_AUTHOR, TransformError, assemble_from_info};

fn info(value: serde_json::Value) -> InfoDocument {
    serde_json::from_value(value).expect("info document")
}

fn text(values: &[&str]) -> RawColumn {
    RawColumn::scalar(Values::Text(values.iter().map(|v| v.to_string()).collect()))
}

fn fixed_options() -> AssembleOptions {
    let when = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
        .expect("rfc3339")
        .with_timezone(&Utc);
    AssembleOptions::default().with_created_at(when)
}

#[test]
fn scalar_and_binned_parameters() {
    let info = info(json!({
        "HAPI": "3.1",
        "parameters": [
            {"name": "Time", "type": "isotime", "units": "UTC", "length": 17},
            {"name": "T", "type": "double", "units": null},
            {"name": "F", "type": "double", "units": "Hz", "size": [3],
             "bins": {"name": "F_bins", "units": "Hz", "centers": [1, 2, 3]}}
        ]
    }));
    let mut records = RecordSet::new();
    records
        .insert("Time", text(&["2016-001T00:00Z", "2016-001T00:01Z"]))
        .expect("time");
    records
        .insert("T", RawColumn::scalar(Values::Float(vec![1.5, 2.5])))
        .expect("T");
    records
        .insert(
            "F",
            RawColumn::with_shape(Values::Float(vec![0.0; 6]), vec![3]),
        )
        .expect("F");

    let dataset = assemble_from_info(&records, &info, &fixed_options()).expect("assemble");
    assert_eq!(dataset.names(), vec!["Time", "T", "F", "F_bins"]);

    let time = dataset.time_axis().expect("time axis");
    assert_eq!(time.var_type(), Some(VarType::SupportData));
    let times = time.values.as_time().expect("times");
    assert_eq!(
        times[1],
        NaiveDate::from_ymd_opt(2016, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 1, 0))
            .expect("instant")
    );

    let t = dataset.get("T").expect("T");
    assert_eq!(t.attr_text(attrs::UNITS), Some(" "));
    assert_eq!(t.attr_text(attrs::DEPEND_0), Some("Time"));
    assert_eq!(t.var_type(), Some(VarType::Data));

    let f = dataset.get("F").expect("F");
    assert_eq!(f.attr_text("DEPEND_1"), Some("F_bins"));
    assert_eq!(f.record_count(), 2);

    let axis = dataset.get("F_bins").expect("axis");
    assert!(!axis.record_varying);
    assert_eq!(axis.values, Values::Float(vec![1.0, 2.0, 3.0]));
    assert_eq!(axis.attr_text(attrs::UNITS), Some("Hz"));
    assert_eq!(axis.var_type(), Some(VarType::SupportData));

    assert_eq!(dataset.attr(attrs::AUTHOR), Some(&AttrValue::from(DEFAULT_AUTHOR)));
    assert!(matches!(dataset.attr(attrs::CREATE_DATE), Some(AttrValue::DateTime(_))));
    assert!(dataset.dangling_dependencies().is_empty());
}

#[test]
fn shared_definition_is_stored_once() {
    let info = info(json!({
        "parameters": [
            {"name": "Time", "type": "isotime", "units": "UTC"},
            {"name": "A", "type": "double", "units": "c", "size": [2],
             "bins": {"$ref": "#/definitions/energy"}},
            {"name": "B", "type": "double", "units": "c", "size": [2],
             "bins": {"$ref": "#/definitions/energy"}}
        ],
        "definitions": {
            "energy": {"name": "energy", "units": "keV", "ranges": [[0, 2], [2, 6]]}
        }
    }));
    let mut records = RecordSet::new();
    records.insert("Time", text(&["2020-05-01Z"])).expect("time");
    for name in ["A", "B"] {
        records
            .insert(
                name,
                RawColumn::with_shape(Values::Float(vec![1.0, 2.0]), vec![2]),
            )
            .expect("column");
    }

    let dataset = assemble_from_info(&records, &info, &fixed_options()).expect("assemble");
    assert_eq!(
        dataset.names(),
        vec!["Time", "A", "energy", "energyDeltaPlus", "energyDeltaMinus", "B"]
    );
    assert_eq!(dataset.get("A").and_then(|v| v.attr_text("DEPEND_1")), Some("energy"));
    assert_eq!(dataset.get("B").and_then(|v| v.attr_text("DEPEND_1")), Some("energy"));
    let minus = dataset.get("energyDeltaMinus").expect("delta minus");
    assert_eq!(minus.values, Values::Float(vec![1.0, 2.0]));
    assert_eq!(minus.attr_text(attrs::UNITS), Some("keV"));
}

#[test]
fn dangling_parameter_reference_is_reported_not_fatal() {
    let info = info(json!({
        "parameters": [
            {"name": "Time", "type": "isotime", "units": "UTC"},
            {"name": "S", "type": "double", "units": null, "size": [2],
             "bins": [{"name": "freq", "units": "Hz", "centers": "frequencies"}]}
        ]
    }));
    let mut records = RecordSet::new();
    records.insert("Time", text(&["2020-05-01T00Z"])).expect("time");
    records
        .insert(
            "S",
            RawColumn::with_shape(Values::Float(vec![1.0, 2.0]), vec![2]),
        )
        .expect("S");

    let dataset = assemble_from_info(&records, &info, &fixed_options()).expect("assemble");
    assert_eq!(dataset.names(), vec!["Time", "S"]);
    assert_eq!(dataset.dangling_dependencies(), vec![("S", "frequencies")]);
}

#[test]
fn empty_time_column_assembles() {
    let info = info(json!({
        "parameters": [
            {"name": "Time", "type": "isotime", "units": "UTC"},
            {"name": "x", "type": "double", "units": "m"}
        ]
    }));
    let mut records = RecordSet::new();
    records.insert("Time", text(&[])).expect("time");
    records
        .insert("x", RawColumn::scalar(Values::Float(Vec::new())))
        .expect("x");

    let dataset = assemble_from_info(&records, &info, &fixed_options()).expect("assemble");
    assert_eq!(dataset.time_axis().map(|v| v.values.len()), Some(0));
}

#[test]
fn failures_abort_assembly() {
    let mut records = RecordSet::new();
    records
        .insert("Time", text(&["2016-01-01T00:00Z", "2016-01-01T00:01"]))
        .expect("time");
    records
        .insert("x", RawColumn::scalar(Values::Float(vec![0.0, 1.0])))
        .expect("x");
    let base = json!({
        "parameters": [
            {"name": "Time", "type": "isotime", "units": "UTC"},
            {"name": "x", "type": "double", "units": "m"}
        ]
    });
    let err = assemble_from_info(&records, &info(base), &fixed_options()).unwrap_err();
    assert!(matches!(err, TransformError::Format(_)));

    let mut records = RecordSet::new();
    records.insert("Time", text(&["2016-01-01"])).expect("time");
    records
        .insert("x", RawColumn::with_shape(Values::Float(vec![0.0, 1.0]), vec![2]))
        .expect("x");
    let info = info(json!({
        "parameters": [
            {"name": "Time", "type": "isotime", "units": "UTC"},
            {"name": "x", "type": "double", "units": "m", "size": [2],
             "bins": {"$ref": "#/definitions/missing"}}
        ]
    }));
    let err = assemble_from_info(&records, &info, &fixed_options()).unwrap_err();
    assert!(matches!(err, TransformError::UndefinedReference { .. }));
}
