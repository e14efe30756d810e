use std::fs;

use rusty_lens::data::Operator;
use rusty_lens::state::AppState;
use rusty_lens::viz::ChartKind;
use tempfile::TempDir;

const SALES: &str = "Product,Region,Sales\nBig,North,100\nsmall,South,250\nCab,East,80\n";

#[test]
fn load_paths_reports_failures_and_keeps_going() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("sales.csv");
    fs::write(&good, SALES).unwrap();
    let bad = dir.path().join("notes.txt");
    fs::write(&bad, "nothing").unwrap();

    let mut state = AppState::default();
    let loaded = state.load_paths(&[bad, good]);

    assert_eq!(loaded, vec!["sales"]);
    assert!(state.store.contains("sales"));
    assert!(state.status_message.as_deref().unwrap().contains("notes.txt"));
    assert_eq!(state.filter_form.column, "Product");
}

#[test]
fn selecting_a_dataset_draws_the_active_kind() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sales.csv");
    fs::write(&path, SALES).unwrap();

    let mut state = AppState::default();
    state.load_paths(&[path]);
    assert!(state.figure().is_none());

    state.toggle_selection("sales");
    assert_eq!(state.figure().unwrap().kind, ChartKind::Line);

    state.set_chart_kind(ChartKind::Bar);
    assert_eq!(state.figure().unwrap().kind, ChartKind::Bar);

    // Deselecting keeps the last figure on screen.
    state.toggle_selection("sales");
    assert!(state.selected.is_empty());
    assert_eq!(state.figure().unwrap().kind, ChartKind::Bar);
}

#[test]
fn rejected_filter_sets_status_and_keeps_rows() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sales.csv");
    fs::write(&path, SALES).unwrap();

    let mut state = AppState::default();
    state.load_paths(&[path]);
    state.filter_form.column = "Product".into();
    state.filter_form.operator = Operator::Gt;
    state.filter_form.value = "10".into();

    assert!(state.apply_filter().is_err());
    assert!(state.status_message.as_deref().unwrap().starts_with("Filter error"));
    assert_eq!(state.store.get("sales").unwrap().len(), 3);

    state.filter_form.column = "Sales".into();
    state.filter_form.value = "90".into();
    state.apply_filter().unwrap();
    assert!(state.status_message.is_none());
    assert_eq!(state.store.get("sales").unwrap().len(), 2);
}

#[test]
fn export_reports_missing_figure() {
    let dir = TempDir::new().unwrap();
    let mut state = AppState::default();

    assert!(state.export(&dir.path().join("chart.png")).is_err());
    assert!(state.status_message.as_deref().unwrap().starts_with("Export error"));
}

#[test]
fn successful_render_clears_visualization_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("text.csv");
    fs::write(&path, "label,region\na,N\nb,S\n").unwrap();

    let mut state = AppState::default();
    state.load_paths(&[path]);
    state.set_chart_kind(ChartKind::Bar);
    state.toggle_selection("text");
    assert!(state.figure().is_none());
    assert!(state.status_message.as_deref().unwrap().starts_with("Visualization error"));

    state.set_chart_kind(ChartKind::Line);
    assert_eq!(state.figure().unwrap().kind, ChartKind::Line);
    assert!(state.status_message.is_none());
}

#[test]
fn load_errors_survive_a_successful_render() {
    let dir = TempDir::new().unwrap();
    let good = dir.path().join("sales.csv");
    fs::write(&good, SALES).unwrap();

    let mut state = AppState::default();
    state.load_paths(&[good]);
    state.toggle_selection("sales");
    state.load_paths(&[dir.path().join("notes.txt")]);

    state.set_chart_kind(ChartKind::Scatter);
    assert!(state.status_message.as_deref().unwrap().contains("notes.txt"));
}

#[test]
fn selection_keeps_the_order_it_was_made_in() {
    let dir = TempDir::new().unwrap();
    let zeta = dir.path().join("zeta.csv");
    let alpha = dir.path().join("alpha.csv");
    fs::write(&zeta, SALES).unwrap();
    fs::write(&alpha, SALES).unwrap();

    let mut state = AppState::default();
    state.load_paths(&[zeta, alpha]);
    state.set_chart_kind(ChartKind::Bar);
    state.toggle_selection("zeta");
    state.toggle_selection("alpha");

    assert_eq!(state.selected, vec!["zeta", "alpha"]);
    let titles: Vec<&str> = state.figure().unwrap().panels.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["zeta", "alpha"]);
}
