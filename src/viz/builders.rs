//! One builder per chart kind. Builders read datasets and never mutate them.
//!
//! Missing-data policy per kind:
//! * line, scatter, box – datasets or columns without usable numbers are
//!   skipped (scatter keeps an empty panel for the dataset)
//! * bar, histogram, heatmap – a dataset without a numeric column fails with
//!   [`Error::InsufficientData`]

use crate::color::generate_palette;
use crate::data::Dataset;
use crate::error::{Error, Result};

use super::figure::{CorrelationMatrix, Figure, Geometry, Panel, Trace};
use super::stats::{self, BoxStats};
use super::{BuildOptions, ChartKind};

const STACKED_PANEL_HEIGHT: u32 = 300;
const HEATMAP_PANEL_HEIGHT: u32 = 400;
const SINGLE_PANEL_HEIGHT: u32 = 450;

/// Build the figure for `kind` from the selected datasets, in selection order.
pub fn build(kind: ChartKind, datasets: &[&Dataset], options: &BuildOptions) -> Result<Figure> {
    match kind {
        ChartKind::Line => line(datasets),
        ChartKind::Scatter => scatter(datasets),
        ChartKind::Bar => bar(datasets),
        ChartKind::Histogram => histogram(datasets, options.histogram_bins),
        ChartKind::Box => box_plot(datasets),
        ChartKind::Heatmap => heatmap(datasets),
    }
}

fn insufficient(dataset: &Dataset, kind: ChartKind, reason: &str) -> Error {
    Error::InsufficientData {
        dataset: dataset.name.clone(),
        chart: kind.label(),
        reason: reason.to_string(),
    }
}

fn stacked(kind: ChartKind, title: &str, panels: Vec<Panel>, panel_height: u32) -> Figure {
    Figure {
        kind,
        title: title.to_string(),
        panels,
        panel_height,
    }
}

// ---------------------------------------------------------------------------
// Line: every numeric column of every dataset on one shared plot
// ---------------------------------------------------------------------------

fn line(datasets: &[&Dataset]) -> Result<Figure> {
    let series: Vec<(String, Vec<[f64; 2]>)> = datasets
        .iter()
        .flat_map(|ds| {
            let index = ds.index_f64();
            ds.numeric_columns().into_iter().map(move |col| {
                let points = index
                    .iter()
                    .zip(col.finite_values())
                    .filter_map(|(&x, y)| Some([x, y?]))
                    .collect();
                (format!("{} - {}", ds.name, col.name), points)
            })
        })
        .collect();

    let colors = generate_palette(series.len());
    let mut panel = Panel::new("", "Index", "Value");
    panel.traces = series
        .into_iter()
        .zip(colors)
        .map(|((name, points), color)| Trace {
            name,
            color,
            geometry: Geometry::Line(points),
        })
        .collect();

    Ok(stacked(ChartKind::Line, "Line Plot", vec![panel], SINGLE_PANEL_HEIGHT))
}

// ---------------------------------------------------------------------------
// Scatter: first two numeric columns, one panel per dataset
// ---------------------------------------------------------------------------

fn scatter(datasets: &[&Dataset]) -> Result<Figure> {
    let colors = generate_palette(datasets.len());
    let panels = datasets
        .iter()
        .zip(colors)
        .map(|(ds, color)| {
            let numeric = ds.numeric_columns();
            let [x_col, y_col] = match numeric.as_slice() {
                [x, y, ..] => [*x, *y],
                _ => {
                    log::debug!("Scatter: '{}' has fewer than two numeric columns", ds.name);
                    return Panel::new(&ds.name, "", "");
                }
            };

            let mut panel = Panel::new(&ds.name, &x_col.name, &y_col.name);
            let points = x_col
                .finite_values()
                .into_iter()
                .zip(y_col.finite_values())
                .filter_map(|(x, y)| Some([x?, y?]))
                .collect();
            panel.traces.push(Trace {
                name: ds.name.clone(),
                color,
                geometry: Geometry::Markers(points),
            });
            panel
        })
        .collect();

    Ok(stacked(ChartKind::Scatter, "Scatter Plots", panels, STACKED_PANEL_HEIGHT))
}

// ---------------------------------------------------------------------------
// Bar: first numeric column against the row index
// ---------------------------------------------------------------------------

fn bar(datasets: &[&Dataset]) -> Result<Figure> {
    let colors = generate_palette(datasets.len());
    let mut panels = Vec::with_capacity(datasets.len());
    for (ds, color) in datasets.iter().zip(colors) {
        let col = *ds
            .numeric_columns()
            .first()
            .ok_or_else(|| insufficient(ds, ChartKind::Bar, "no numeric column"))?;

        let bars = ds
            .index_f64()
            .into_iter()
            .zip(col.finite_values())
            .filter_map(|(x, h)| Some([x, h?]))
            .collect();

        let mut panel = Panel::new(&ds.name, "Index", &col.name);
        panel.traces.push(Trace {
            name: ds.name.clone(),
            color,
            geometry: Geometry::Bars(bars),
        });
        panels.push(panel);
    }
    Ok(stacked(ChartKind::Bar, "Bar Charts", panels, STACKED_PANEL_HEIGHT))
}

// ---------------------------------------------------------------------------
// Histogram: distribution of the first numeric column
// ---------------------------------------------------------------------------

fn histogram(datasets: &[&Dataset], bins: Option<usize>) -> Result<Figure> {
    let colors = generate_palette(datasets.len());
    let mut panels = Vec::with_capacity(datasets.len());
    for (ds, color) in datasets.iter().zip(colors) {
        let col = *ds
            .numeric_columns()
            .first()
            .ok_or_else(|| insufficient(ds, ChartKind::Histogram, "no numeric column"))?;

        let values: Vec<f64> = col.finite_values().into_iter().flatten().collect();
        let hist = stats::histogram(&values, bins);
        if hist.is_empty() {
            return Err(insufficient(
                ds,
                ChartKind::Histogram,
                &format!("column '{}' has no finite values", col.name),
            ));
        }

        let mut panel = Panel::new(&ds.name, &col.name, "Count");
        panel.traces.push(Trace {
            name: ds.name.clone(),
            color,
            geometry: Geometry::Histogram(hist),
        });
        panels.push(panel);
    }
    Ok(stacked(ChartKind::Histogram, "Histograms", panels, STACKED_PANEL_HEIGHT))
}

// ---------------------------------------------------------------------------
// Box: one box per (dataset, numeric column) on one shared plot
// ---------------------------------------------------------------------------

fn box_plot(datasets: &[&Dataset]) -> Result<Figure> {
    let mut boxes = Vec::new();
    for ds in datasets {
        for col in ds.numeric_columns() {
            let name = format!("{} - {}", ds.name, col.name);
            match BoxStats::from_values(col.finite_values().into_iter().flatten()) {
                Some(stats) => boxes.push((name, stats)),
                None => log::debug!("Box: '{name}' has no finite values, skipped"),
            }
        }
    }

    let colors = generate_palette(boxes.len());
    let mut panel = Panel::new("", "", "Value");
    panel.traces = boxes
        .into_iter()
        .zip(colors)
        .map(|((name, stats), color)| Trace {
            name,
            color,
            geometry: Geometry::Box(stats),
        })
        .collect();

    Ok(stacked(ChartKind::Box, "Box Plots", vec![panel], SINGLE_PANEL_HEIGHT))
}

// ---------------------------------------------------------------------------
// Heatmap: correlation matrix of the numeric columns, one panel per dataset
// ---------------------------------------------------------------------------

fn heatmap(datasets: &[&Dataset]) -> Result<Figure> {
    let mut panels = Vec::with_capacity(datasets.len());
    for ds in datasets {
        let numeric = ds.numeric_columns();
        if numeric.is_empty() {
            return Err(insufficient(ds, ChartKind::Heatmap, "no numeric column"));
        }
        let labels: Vec<String> = numeric.iter().map(|c| c.name.clone()).collect();
        let columns: Vec<Vec<Option<f64>>> = numeric.iter().map(|c| c.finite_values()).collect();

        let mut panel = Panel::new(&ds.name, "", "");
        panel.traces.push(Trace {
            name: ds.name.clone(),
            color: crate::color::MISSING,
            geometry: Geometry::Heatmap(CorrelationMatrix {
                labels,
                values: stats::correlation_matrix(&columns),
            }),
        });
        panels.push(panel);
    }
    Ok(stacked(ChartKind::Heatmap, "Correlation Heatmaps", panels, HEATMAP_PANEL_HEIGHT))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Column, Value};

    fn numeric(name: &str, values: &[f64]) -> Column {
        Column::new(name, values.iter().map(|v| Value::Float(*v)).collect())
    }

    fn text(name: &str, values: &[&str]) -> Column {
        Column::new(name, values.iter().map(|v| Value::Text(v.to_string())).collect())
    }

    fn sales() -> Dataset {
        Dataset::new(
            "sales",
            vec![
                text("region", &["N", "S", "E"]),
                numeric("units", &[1.0, 2.0, 3.0]),
                numeric("revenue", &[10.0, 20.0, 30.0]),
            ],
        )
        .unwrap()
    }

    fn labels_only() -> Dataset {
        Dataset::new("labels", vec![text("region", &["N", "S"])]).unwrap()
    }

    #[test]
    fn line_has_one_trace_per_numeric_column() {
        let a = sales();
        let b = labels_only();
        let fig = build(ChartKind::Line, &[&a, &b], &BuildOptions::default()).unwrap();
        assert_eq!(fig.panels.len(), 1);
        let names: Vec<&str> = fig.panels[0].traces.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["sales - units", "sales - revenue"]);
    }

    #[test]
    fn scatter_keeps_empty_panel_for_short_dataset() {
        let a = sales();
        let b = labels_only();
        let fig = build(ChartKind::Scatter, &[&a, &b], &BuildOptions::default()).unwrap();
        assert_eq!(fig.panels.len(), 2);
        assert_eq!(fig.panels[0].x_label, "units");
        assert!(fig.panels[1].traces.is_empty());
        match &fig.panels[0].traces[0].geometry {
            Geometry::Markers(pts) => assert_eq!(pts[2], [3.0, 30.0]),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn bar_fails_without_numeric_column() {
        let a = sales();
        let b = labels_only();
        let err = build(ChartKind::Bar, &[&a, &b], &BuildOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InsufficientData { dataset, .. } if dataset == "labels"));
    }

    #[test]
    fn bars_use_original_row_labels() {
        let filtered = sales().take_rows(&[0, 2]);
        let fig = build(ChartKind::Bar, &[&filtered], &BuildOptions::default()).unwrap();
        match &fig.panels[0].traces[0].geometry {
            Geometry::Bars(bars) => assert_eq!(bars, &vec![[0.0, 1.0], [2.0, 3.0]]),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn histogram_honours_configured_bins() {
        let a = sales();
        let options = BuildOptions { histogram_bins: Some(3) };
        let fig = build(ChartKind::Histogram, &[&a], &options).unwrap();
        match &fig.panels[0].traces[0].geometry {
            Geometry::Histogram(bins) => assert_eq!(bins.len(), 3),
            other => panic!("unexpected geometry {other:?}"),
        }
    }

    #[test]
    fn box_skips_datasets_without_numbers() {
        let a = sales();
        let b = labels_only();
        let fig = build(ChartKind::Box, &[&b, &a], &BuildOptions::default()).unwrap();
        assert_eq!(fig.trace_count(), 2);
    }

    #[test]
    fn heatmap_matrix_is_square() {
        let a = sales();
        let fig = build(ChartKind::Heatmap, &[&a], &BuildOptions::default()).unwrap();
        match &fig.panels[0].traces[0].geometry {
            Geometry::Heatmap(m) => {
                assert_eq!(m.labels, vec!["units", "revenue"]);
                assert!((m.get(0, 1).unwrap() - 1.0).abs() < 1e-12);
            }
            other => panic!("unexpected geometry {other:?}"),
        }
        let b = labels_only();
        assert!(build(ChartKind::Heatmap, &[&b], &BuildOptions::default()).is_err());
    }
}
