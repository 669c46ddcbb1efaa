use chrono::{DateTime, NaiveDate, Utc};

use hapi_model::{Dataset, Values, VarType, Variable, attrs};

/// Time, a scalar `T`, a two-component `F` and its bins axis.
pub fn sample_dataset() -> Dataset {
    let day = NaiveDate::from_ymd_opt(2016, 1, 1).expect("date");
    let times = vec![
        day.and_hms_opt(0, 0, 0).expect("t0"),
        day.and_hms_milli_opt(0, 0, 1, 500).expect("t1"),
    ];
    let created = DateTime::parse_from_rfc3339("2024-01-02T03:04:05Z")
        .expect("rfc3339")
        .with_timezone(&Utc);

    let mut dataset = Dataset::new();
    dataset.insert(
        Variable::new("Time", Values::Time(times)).with_attr(attrs::VAR_TYPE, VarType::SupportData),
    );
    dataset.insert(
        Variable::new("T", Values::Float(vec![1.5, 2.0]))
            .with_attr(attrs::UNITS, " ")
            .with_attr(attrs::DEPEND_0, "Time")
            .with_attr(attrs::VAR_TYPE, VarType::Data),
    );
    dataset.insert(
        Variable::new("F", Values::Float(vec![1.0, 2.0, 3.0, 4.0]))
            .with_shape(vec![2])
            .with_attr(attrs::UNITS, "Hz")
            .with_attr(attrs::DEPEND_0, "Time")
            .with_attr(&attrs::depend(1), "F_bins")
            .with_attr(attrs::VAR_TYPE, VarType::Data),
    );
    dataset.insert(
        Variable::non_record_varying("F_bins", Values::Float(vec![10.0, 20.0]))
            .with_attr(attrs::UNITS, "Hz")
            .with_attr(attrs::VAR_TYPE, VarType::SupportData),
    );
    dataset.set_attr(attrs::AUTHOR, "hapi-convert");
    dataset.set_attr(attrs::CREATE_DATE, created);
    dataset
}
