use std::fs;
use std::path::{Path, PathBuf};

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use rusty_lens::data::filter::{self, FilterOutcome};
use rusty_lens::data::{ColumnKind, DatasetStore, FilterSpec, Operator, Value};
use rusty_lens::Error;
use tempfile::TempDir;

fn write_csv(dir: &Path, file: &str, body: &str) -> PathBuf {
    let path = dir.join(file);
    fs::write(&path, body).unwrap();
    path
}

const SALES: &str = "\
Product,Region,Sales,Units
Big,North,100,3
small,South,250.5,7
Cab,East,,2
Widget,West,80,9
";

fn loaded_store(dir: &TempDir) -> DatasetStore {
    let mut store = DatasetStore::new();
    store.load(&write_csv(dir.path(), "sales.csv", SALES)).unwrap();
    store
}

#[test]
fn csv_load_infers_column_kinds() {
    let dir = TempDir::new().unwrap();
    let store = loaded_store(&dir);

    assert_eq!(store.names(), vec!["sales"]);
    assert_eq!(store.columns("sales").unwrap(), vec!["Product", "Region", "Sales", "Units"]);

    let ds = store.get("sales").unwrap();
    assert_eq!(ds.len(), 4);
    assert_eq!(ds.column("Product").unwrap().kind, ColumnKind::Text);
    assert_eq!(ds.column("Sales").unwrap().kind, ColumnKind::Numeric);
    assert_eq!(ds.column("Sales").unwrap().values[2], Value::Null);
}

#[test]
fn unsupported_extension_registers_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_csv(dir.path(), "notes.txt", SALES);
    let mut store = DatasetStore::new();

    let err = store.load(&path).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { extension } if extension == "txt"));
    assert!(store.is_empty());
}

#[test]
fn reloading_overwrites_the_entry() {
    let dir = TempDir::new().unwrap();
    let mut store = loaded_store(&dir);
    let smaller = write_csv(dir.path(), "sales.csv", "Product,Sales\nOnly,1\n");
    assert_eq!(store.load(&smaller).unwrap(), "sales");
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("sales").unwrap().len(), 1);
}

#[test]
fn xlsx_load_reads_first_sheet() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("book.xlsx");

    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "Date").unwrap();
    sheet.write_string(0, 1, "Name").unwrap();
    sheet.write_string(0, 2, "Score").unwrap();
    for (i, (name, score)) in [("Ann", 1.5), ("Bob", 2.0)].into_iter().enumerate() {
        let row = i as u32 + 1;
        let date = ExcelDateTime::from_ymd(2023, 1, row as u8).unwrap();
        sheet.write_datetime_with_format(row, 0, &date, &date_format).unwrap();
        sheet.write_string(row, 1, name).unwrap();
        sheet.write_number(row, 2, score).unwrap();
    }
    workbook.save(&path).unwrap();

    let mut store = DatasetStore::new();
    assert_eq!(store.load(&path).unwrap(), "book");
    let ds = store.get("book").unwrap();
    assert_eq!(ds.column_names(), vec!["Date", "Name", "Score"]);
    assert_eq!(ds.column("Date").unwrap().kind, ColumnKind::Temporal);
    assert_eq!(ds.column("Name").unwrap().kind, ColumnKind::Text);
    assert_eq!(ds.column("Score").unwrap().finite_values(), vec![Some(1.5), Some(2.0)]);
}

#[test]
fn contains_keeps_case_insensitive_matches() {
    let dir = TempDir::new().unwrap();
    let mut store = loaded_store(&dir);

    filter::apply(&mut store, &FilterSpec::new("Product", Operator::Contains, "b")).unwrap();
    let ds = store.get("sales").unwrap();
    assert_eq!(
        ds.column("Product").unwrap().values,
        vec![Value::Text("Big".into()), Value::Text("Cab".into())]
    );
    assert_eq!(ds.index, vec![0, 2]);
}

#[test]
fn equality_filters_only_shrink_and_hold() {
    let dir = TempDir::new().unwrap();
    for (op, value) in [(Operator::Eq, "North"), (Operator::Ne, "North"), (Operator::Eq, "Nowhere")] {
        let mut store = loaded_store(&dir);
        let before = store.get("sales").unwrap().len();
        filter::apply(&mut store, &FilterSpec::new("Region", op, value)).unwrap();

        let ds = store.get("sales").unwrap();
        assert!(ds.len() <= before);
        for v in &ds.column("Region").unwrap().values {
            let equal = *v == Value::Text(value.to_string());
            assert_eq!(equal, op == Operator::Eq, "{op} {value} kept {v}");
        }
    }
}

#[test]
fn ordering_filter_coerces_value() {
    let dir = TempDir::new().unwrap();
    let mut store = loaded_store(&dir);
    filter::apply(&mut store, &FilterSpec::new("Sales", Operator::Ge, "100")).unwrap();
    let ds = store.get("sales").unwrap();
    assert_eq!(ds.column("Sales").unwrap().finite_values(), vec![Some(100.0), Some(250.5)]);
}

#[test]
fn invalid_comparison_leaves_every_dataset_untouched() {
    let dir = TempDir::new().unwrap();
    let mut store = loaded_store(&dir);
    store
        .load(&write_csv(dir.path(), "other.csv", "Region,Sales\nNorth,abc\nSouth,def\n"))
        .unwrap();

    let err = filter::apply(&mut store, &FilterSpec::new("Sales", Operator::Gt, "10")).unwrap_err();
    assert!(matches!(err, Error::InvalidComparison { .. }));
    assert_eq!(store.get("sales").unwrap().len(), 4);
    assert_eq!(store.get("other").unwrap().len(), 2);
}

#[test]
fn datasets_without_the_column_are_skipped() {
    let dir = TempDir::new().unwrap();
    let mut store = loaded_store(&dir);
    store
        .load(&write_csv(dir.path(), "plain.csv", "a,b\n1,2\n3,4\n"))
        .unwrap();

    let outcomes = filter::apply(&mut store, &FilterSpec::new("Units", Operator::Lt, "5")).unwrap();
    assert!(outcomes.contains(&FilterOutcome::Skipped { dataset: "plain".into() }));
    assert!(outcomes.contains(&FilterOutcome::Filtered {
        dataset: "sales".into(),
        before: 4,
        after: 2
    }));
    assert_eq!(store.get("plain").unwrap().len(), 2);
}

#[test]
fn applying_a_filter_twice_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let specs = [
        FilterSpec::new("Region", Operator::Ne, "South"),
        FilterSpec::new("Units", Operator::Gt, "2"),
        FilterSpec::new("Product", Operator::Contains, "i"),
    ];
    for spec in specs {
        let mut store = loaded_store(&dir);
        filter::apply(&mut store, &spec).unwrap();
        let once = store.get("sales").unwrap().clone();
        filter::apply(&mut store, &spec).unwrap();
        assert_eq!(store.get("sales").unwrap(), &once, "{spec}");
    }
}

#[test]
fn filter_spec_parses_operator_symbols() {
    let spec = FilterSpec::parse("Sales", "<=", "10").unwrap();
    assert_eq!(spec.operator, Operator::Le);
    assert!(matches!(FilterSpec::parse("Sales", "~", "10"), Err(Error::UnsupportedOperator(_))));
}

#[test]
fn missing_value_markers_keep_column_numeric() {
    let dir = TempDir::new().unwrap();
    let mut store = DatasetStore::new();
    let path = write_csv(dir.path(), "gaps.csv", "Product,Sales\nA,100\nB,NA\nC,N/A\nD,250\n");
    store.load(&path).unwrap();
    assert_eq!(store.get("gaps").unwrap().column("Sales").unwrap().kind, ColumnKind::Numeric);

    let mut viz = rusty_lens::viz::Visualizer::default();
    viz.render(&store, &["gaps"], rusty_lens::viz::ChartKind::Histogram)
        .unwrap();

    filter::apply(&mut store, &FilterSpec::new("Sales", Operator::Gt, "50")).unwrap();
    let ds = store.get("gaps").unwrap();
    assert_eq!(ds.column("Sales").unwrap().finite_values(), vec![Some(100.0), Some(250.0)]);
    assert_eq!(ds.index, vec![0, 3]);
}
