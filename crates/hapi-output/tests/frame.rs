mod common;

use hapi_model::{Values, VarType, Variable, attrs};
use hapi_output::{
    DIMENSIONLESS, PassthroughUnits, UnitTable, dataset_to_frame, write_frame_csv,
};

fn column_names(frame: &hapi_output::TimeSeriesFrame) -> Vec<String> {
    frame
        .data
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

#[test]
fn scalars_and_vectors_become_columns() {
    let dataset = common::sample_dataset();
    let frame = dataset_to_frame(&dataset, &PassthroughUnits).expect("frame");
    assert_eq!(column_names(&frame), vec!["Time", "T", "F_0", "F_1"]);
    assert_eq!(frame.data.height(), 2);
    assert_eq!(frame.unit("T"), Some(DIMENSIONLESS));
    assert_eq!(frame.unit("F_1"), Some("Hz"));

    let f1: Vec<Option<f64>> = frame
        .data
        .column("F_1")
        .expect("F_1")
        .f64()
        .expect("f64")
        .into_iter()
        .collect();
    assert_eq!(f1, vec![Some(2.0), Some(4.0)]);
}

#[test]
fn higher_rank_and_support_variables_are_skipped() {
    let mut dataset = common::sample_dataset();
    dataset.insert(
        Variable::new("M", Values::Float(vec![0.0; 8]))
            .with_shape(vec![2, 2])
            .with_attr(attrs::UNITS, "nT")
            .with_attr(attrs::VAR_TYPE, VarType::Data),
    );
    dataset.insert(
        Variable::new("quality", Values::Int(vec![0, 1]))
            .with_attr(attrs::VAR_TYPE, VarType::SupportData),
    );
    let frame = dataset_to_frame(&dataset, &PassthroughUnits).expect("frame");
    assert_eq!(column_names(&frame), vec!["Time", "T", "F_0", "F_1"]);
}

#[test]
fn unresolved_units_fall_back_to_dimensionless() {
    let dataset = common::sample_dataset();
    let table = UnitTable::empty().with_alias("UTC", "UTC");
    let frame = dataset_to_frame(&dataset, &table).expect("frame");
    assert_eq!(frame.unit("F_0"), Some(DIMENSIONLESS));
    assert_eq!(frame.unit("Time"), Some(DIMENSIONLESS));

    let frame = dataset_to_frame(&dataset, &UnitTable::default()).expect("frame");
    assert_eq!(frame.unit("F_0"), Some("Hz"));
}

#[test]
fn csv_export_writes_iso_timestamps() {
    let dataset = common::sample_dataset();
    let mut frame = dataset_to_frame(&dataset, &PassthroughUnits).expect("frame");
    let mut out = Vec::new();
    write_frame_csv(&mut out, &mut frame).expect("csv");
    let text = String::from_utf8(out).expect("utf8");
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("Time,T,F_0,F_1"));
    let first = lines.next().expect("first row");
    assert!(first.starts_with("2016-01-01T00:00:00.000000Z,1.5,"), "{first}");
    assert_eq!(lines.count(), 1);
}
