use std::ops::RangeInclusive;

use eframe::egui::{Color32, ScrollArea, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, Plot, PlotPoints, Points,
    Polygon,
};

use rusty_lens::color::{self, Rgb};
use rusty_lens::state::AppState;
use rusty_lens::viz::{label_at, CorrelationMatrix, Figure, Geometry, Panel};

// ---------------------------------------------------------------------------
// Figure view (central panel)
// ---------------------------------------------------------------------------

fn color32(c: Rgb) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

/// Render the current figure in the central panel.
pub fn figure_view(ui: &mut Ui, state: &AppState) {
    let figure = match state.figure() {
        Some(fig) => fig,
        None => {
            ui.centered_and_justified(|ui: &mut Ui| {
                ui.heading("Load datasets and select them to draw a chart");
            });
            return;
        }
    };

    ui.heading(figure.title.as_str());
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (i, panel) in figure.panels.iter().enumerate() {
                if !panel.title.is_empty() {
                    ui.strong(panel.title.as_str());
                }
                panel_plot(ui, figure, panel, i);
                ui.add_space(6.0);
            }
        });
}

fn panel_plot(ui: &mut Ui, figure: &Figure, panel: &Panel, index: usize) {
    let mut plot = Plot::new(("figure_panel", index))
        .height(figure.panel_height as f32)
        .legend(Legend::default())
        .x_axis_label(panel.x_label.clone())
        .y_axis_label(panel.y_label.clone())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true);

    // Categorical axes: name the integral grid positions.
    let names: Option<Vec<String>> = match panel.traces.first().map(|t| &t.geometry) {
        Some(Geometry::Box(_)) => Some(panel.traces.iter().map(|t| t.name.clone()).collect()),
        Some(Geometry::Heatmap(m)) => Some(m.labels.clone()),
        _ => None,
    };
    if let Some(names) = names {
        let y_names = names.clone();
        plot = plot
            .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| label_at(&names, mark.value));
        if matches!(panel.traces.first().map(|t| &t.geometry), Some(Geometry::Heatmap(_))) {
            plot = plot.y_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
                label_at(&y_names, mark.value)
            });
        }
    }

    plot.show(ui, |plot_ui| {
        for (i, trace) in panel.traces.iter().enumerate() {
            let color = color32(trace.color);
            match &trace.geometry {
                Geometry::Line(pts) => {
                    let points: PlotPoints = pts.iter().copied().collect();
                    plot_ui.line(Line::new(points).name(&trace.name).color(color).width(1.5));
                }
                Geometry::Markers(pts) => {
                    let points: PlotPoints = pts.iter().copied().collect();
                    plot_ui.points(Points::new(points).name(&trace.name).color(color).radius(3.0));
                }
                Geometry::Bars(bars) => {
                    let bars = bars.iter().map(|b| Bar::new(b[0], b[1]).width(0.8)).collect();
                    plot_ui.bar_chart(BarChart::new(bars).name(&trace.name).color(color));
                }
                Geometry::Histogram(bins) => {
                    let bars = bins
                        .iter()
                        .map(|b| Bar::new((b.start + b.end) / 2.0, b.count as f64).width(b.end - b.start))
                        .collect();
                    plot_ui.bar_chart(BarChart::new(bars).name(&trace.name).color(color));
                }
                Geometry::Box(stats) => {
                    let spread = BoxSpread::new(
                        stats.lower_whisker,
                        stats.q1,
                        stats.median,
                        stats.q3,
                        stats.upper_whisker,
                    );
                    let elem = BoxElem::new(i as f64, spread).name(&trace.name).box_width(0.6);
                    plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&trace.name).color(color));
                    if !stats.outliers.is_empty() {
                        let outliers: PlotPoints = stats.outliers.iter().map(|&o| [i as f64, o]).collect();
                        plot_ui.points(Points::new(outliers).color(color).radius(2.5));
                    }
                }
                Geometry::Heatmap(matrix) => heatmap_cells(plot_ui, matrix),
            }
        }
    });
}

fn heatmap_cells(plot_ui: &mut egui_plot::PlotUi, matrix: &CorrelationMatrix) {
    for (r, row) in matrix.values.iter().enumerate() {
        for (c, &v) in row.iter().enumerate() {
            let (x, y) = (c as f64, r as f64);
            let corners: PlotPoints = vec![
                [x - 0.5, y - 0.5],
                [x + 0.5, y - 0.5],
                [x + 0.5, y + 0.5],
                [x - 0.5, y + 0.5],
            ]
            .into();
            let fill = color32(color::viridis(v, -1.0, 1.0));
            plot_ui.polygon(
                Polygon::new(corners)
                    .fill_color(fill)
                    .stroke(Stroke::new(0.5, Color32::WHITE)),
            );
        }
    }
}
