use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};

use super::model::{is_missing_marker, parse_temporal, Column, Dataset, Value};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Recognised tabular formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Csv,
    Xlsx,
}

impl Format {
    /// Pick the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(Format::Csv),
            "xlsx" => Ok(Format::Xlsx),
            other => Err(Error::UnsupportedFormat {
                extension: other.to_string(),
            }),
        }
    }
}

/// Derive a dataset name from a path: the file name without directory or extension.
pub fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header row followed by comma-separated records
/// * `.xlsx` – first worksheet, first row is the header
pub fn load_file(path: &Path) -> Result<Dataset> {
    let format = Format::from_path(path)?;
    let name = dataset_name(path);
    let dataset = match format {
        Format::Csv => load_csv(path, &name)?,
        Format::Xlsx => load_xlsx(path, &name)?,
    };
    log::debug!(
        "Parsed {} as {:?}: {} rows, columns {:?}",
        path.display(),
        format,
        dataset.len(),
        dataset.column_names()
    );
    Ok(dataset)
}

/// Turn row-major cells into typed columns.
fn build_dataset(path: &Path, name: &str, headers: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Dataset> {
    let mut columns: Vec<Vec<Value>> = vec![Vec::with_capacity(rows.len()); headers.len()];
    for (row_no, row) in rows.into_iter().enumerate() {
        if row.len() > headers.len() {
            return Err(Error::Malformed {
                path: path.to_path_buf(),
                reason: format!(
                    "row {row_no} has {} cells but the header has {}",
                    row.len(),
                    headers.len()
                ),
            });
        }
        let mut cells = row.into_iter();
        for column in columns.iter_mut() {
            column.push(cells.next().unwrap_or(Value::Null));
        }
    }

    let columns = headers
        .into_iter()
        .zip(columns)
        .map(|(h, values)| Column::new(h, values))
        .collect();

    Dataset::new(name, columns).ok_or_else(|| Error::Malformed {
        path: path.to_path_buf(),
        reason: "columns have different lengths".to_string(),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per row.
/// Cell types are guessed per cell, column kinds are inferred afterwards.
fn load_csv(path: &Path, name: &str) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(Value::parse).collect());
    }

    build_dataset(path, name, headers, rows)
}

// ---------------------------------------------------------------------------
// XLSX loader
// ---------------------------------------------------------------------------

/// Read the first worksheet. Blank header cells are named `Unnamed: <i>`.
fn load_xlsx(path: &Path, name: &str) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Malformed {
            path: path.to_path_buf(),
            reason: "workbook has no worksheets".to_string(),
        })??;

    let mut sheet_rows = range.rows();
    let headers: Vec<String> = match sheet_rows.next() {
        Some(header) => header
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell {
                Data::Empty => format!("Unnamed: {i}"),
                other => other.to_string(),
            })
            .collect(),
        None => Vec::new(),
    };

    let rows = sheet_rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    build_dataset(path, name, headers, rows)
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(i) => Value::Integer(*i),
        Data::Float(f) => Value::Float(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) if is_missing_marker(s.trim()) => Value::Null,
        Data::String(s) => match parse_temporal(s) {
            Some(t) => Value::Temporal(t),
            None => Value::Text(s.clone()),
        },
        Data::DateTime(dt) => dt.as_datetime().map_or(Value::Null, Value::Temporal),
        Data::DateTimeIso(s) => parse_temporal(s).map_or_else(|| Value::Text(s.clone()), Value::Temporal),
        Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(_) | Data::Empty => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn name_strips_directory_and_extension() {
        assert_eq!(dataset_name(Path::new("/data/q1/sales.csv")), "sales");
        assert_eq!(dataset_name(Path::new("report.v2.xlsx")), "report.v2");
    }

    #[test]
    fn format_is_case_insensitive() {
        assert_eq!(Format::from_path(Path::new("a.CSV")).unwrap(), Format::Csv);
        assert_eq!(Format::from_path(Path::new("a.Xlsx")).unwrap(), Format::Xlsx);
    }

    #[test]
    fn missing_markers_keep_csv_column_numeric() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("gaps.csv");
        std::fs::write(&path, "Product,Sales\nA, 100\nB,NA\nC,N/A\nD,250\n").unwrap();

        let ds = load_file(&path).unwrap();
        let sales = ds.column("Sales").unwrap();
        assert_eq!(sales.kind, crate::data::ColumnKind::Numeric);
        assert_eq!(sales.finite_values(), vec![Some(100.0), None, None, Some(250.0)]);
    }

    #[test]
    fn missing_markers_in_xlsx_strings_are_null() {
        assert_eq!(cell_value(&Data::String("NA".into())), Value::Null);
        assert_eq!(cell_value(&Data::String(" null ".into())), Value::Null);
        assert_eq!(cell_value(&Data::String("North".into())), Value::Text("North".into()));
    }

    #[test]
    fn unknown_extension_is_rejected_without_reading() {
        let missing = PathBuf::from("/definitely/not/here.parquet");
        match load_file(&missing) {
            Err(Error::UnsupportedFormat { extension }) => assert_eq!(extension, "parquet"),
            other => panic!("expected UnsupportedFormat, got {other:?}"),
        }
    }
}
