mod common;

use hapi_model::Dataset;
use hapi_output::{OutputError, write_json_headed_ascii};

fn render(dataset: &Dataset) -> String {
    let mut out = Vec::new();
    write_json_headed_ascii(&mut out, dataset).expect("write");
    String::from_utf8(out).expect("utf8")
}

#[test]
fn header_then_records() {
    let output = render(&common::sample_dataset());
    insta::assert_snapshot!("json_headed_ascii", output);
}

#[test]
fn header_round_trips_as_json() {
    let output = render(&common::sample_dataset());
    let header: String = output
        .lines()
        .filter_map(|line| line.strip_prefix('#'))
        .collect::<Vec<_>>()
        .join("\n");
    let header: serde_json::Value = serde_json::from_str(&header).expect("header json");
    assert_eq!(header["F"]["START_COLUMN"], 2);
    assert_eq!(header["F_bins"]["VALUES"], serde_json::json!([10.0, 20.0]));
    assert_eq!(header["global"]["Author"], "hapi-convert");
    assert_eq!(output.lines().filter(|line| !line.starts_with('#')).count(), 2);
}

#[test]
fn empty_dataset_has_no_time_axis() {
    let mut out = Vec::new();
    let err = write_json_headed_ascii(&mut out, &Dataset::new()).unwrap_err();
    assert!(matches!(err, OutputError::MissingTimeAxis));
}
