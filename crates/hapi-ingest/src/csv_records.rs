//! HAPI CSV data bodies.
//!
//! Each parameter occupies `product(size)` consecutive columns, in the order
//! of the `parameters` list. Header lines (`#`) are skipped.

use std::io::Read;

use csv::ReaderBuilder;
use tracing::debug;

use hapi_model::{InfoDocument, RecordSet};

use crate::columns::{ColumnBuilder, ColumnKind};
use crate::error::{IngestError, Result};

/// Read CSV rows into one raw column per parameter of `info`.
pub fn read_csv_records<R: Read>(reader: R, info: &InfoDocument) -> Result<RecordSet> {
    let mut builders: Vec<(usize, ColumnBuilder)> = info
        .parameters
        .iter()
        .enumerate()
        .map(|(index, parameter)| {
            let kind = ColumnKind::for_parameter(index, parameter);
            (parameter.record_size(), ColumnBuilder::new(kind, parameter))
        })
        .collect();
    let expected: usize = builders.iter().map(|(width, _)| width).sum();

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = 0usize;
    for (row, record) in reader.records().enumerate() {
        let record = record.map_err(|source| IngestError::Csv { row, source })?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        if record.len() != expected {
            return Err(IngestError::ColumnCount {
                row,
                expected,
                actual: record.len(),
            });
        }
        let mut cells = record.iter().enumerate();
        for ((width, builder), parameter) in builders.iter_mut().zip(&info.parameters) {
            for (column, cell) in cells.by_ref().take(*width) {
                builder
                    .push_str(cell)
                    .map_err(|reason| IngestError::Value {
                        row,
                        column,
                        parameter: parameter.name.clone(),
                        reason,
                    })?;
            }
        }
        rows += 1;
    }

    let mut records = RecordSet::new();
    for ((_, builder), parameter) in builders.into_iter().zip(&info.parameters) {
        records.insert(parameter.name.as_str(), builder.finish())?;
    }
    debug!(rows, columns = expected, "read CSV records");
    Ok(records)
}
