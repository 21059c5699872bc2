//! CSV rendering of flattened rows, grounded on original_source
//! `src/fetch/urls.py::export_logs_csv` (`df.to_csv(index=False)` over the
//! merged/flattened frame) but using the `csv` crate's writer instead of a
//! dataframe, since the core workspace has no dataframe dependency.

use std::collections::BTreeSet;

use serde_json::Value;
use thiserror::Error;

use crate::flatten::FlatRow;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Render flattened rows as a CSV document (header + one line per row).
///
/// The column set is the union of keys across all rows, sorted for a
/// stable header (spec §4.5/§9's "union of keys" rule, applied here to the
/// export surface rather than the cold-store insert path); a row missing a
/// given column gets an empty cell.
pub fn to_csv(rows: &[FlatRow]) -> Result<Vec<u8>, ExportError> {
    let mut columns: BTreeSet<&str> = BTreeSet::new();
    for row in rows {
        columns.extend(row.keys().map(String::as_str));
    }
    let columns: Vec<&str> = columns.into_iter().collect();

    let mut writer = csv::WriterBuilder::new().from_writer(Vec::<u8>::new());
    writer.write_record(&columns)?;

    for row in rows {
        let record: Vec<String> = columns
            .iter()
            .map(|column| row.get(*column).map(cell).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush().map_err(|e| ExportError::Csv(e.into()))?;
    writer
        .into_inner()
        .map_err(|e| ExportError::Csv(e.into_error().into()))
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_is_the_union_of_keys_across_rows() {
        let rows = vec![
            FlatRow::from([("a".to_string(), json!(1)), ("b".to_string(), json!(2))]),
            FlatRow::from([("b".to_string(), json!(3)), ("c".to_string(), json!(4))]),
        ];

        let csv_bytes = to_csv(&rows).unwrap();
        let csv_text = String::from_utf8(csv_bytes).unwrap();
        let header = csv_text.lines().next().unwrap();
        assert_eq!(header, "a,b,c");
    }

    #[test]
    fn missing_column_renders_as_empty_cell() {
        let rows = vec![FlatRow::from([("a".to_string(), json!(1))])];
        let csv_bytes = to_csv(&rows).unwrap();
        let csv_text = String::from_utf8(csv_bytes).unwrap();
        assert_eq!(csv_text, "a\n1\n");
    }
}
