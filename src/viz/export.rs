//! Render a [`Figure`] to **PNG**/**JPEG**/**BMP** or **SVG** with plotters.

use std::path::Path;
use std::sync::Once;

use plotters::coord::Shift;
use plotters::prelude::*;
use serde::{Deserialize, Serialize};

use super::figure::{label_at, CorrelationMatrix, Figure, Geometry, Panel};
use super::ChartKind;
use crate::color::{self, Rgb};
use crate::error::{Error, Result};

const TITLE_FONT_PX: u32 = 24;
const TITLE_AREA_PX: u32 = 40;

/// Output image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Image width in pixels.
    pub width: u32,
    /// Overrides the figure's own panel height.
    pub panel_height: Option<u32>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            width: 1000,
            panel_height: None,
        }
    }
}

/// Image encodings picked from the output extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Svg,
    /// PNG, JPEG or BMP; the encoder follows the extension.
    Bitmap,
}

impl ImageFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "svg" => Ok(ImageFormat::Svg),
            "png" | "jpg" | "jpeg" | "bmp" => Ok(ImageFormat::Bitmap),
            other => Err(Error::UnsupportedFormat {
                extension: other.to_string(),
            }),
        }
    }
}

/// One-time registration of the bundled "sans-serif" font.
/// `ab_glyph` does not discover OS fonts.
static INIT_FONTS: Once = Once::new();

fn ensure_fonts_registered() {
    INIT_FONTS.call_once(|| {
        let registered = plotters::style::register_font(
            "sans-serif",
            plotters::style::FontStyle::Normal,
            include_bytes!("../../assets/DejaVuSans.ttf"),
        );
        if registered.is_err() {
            log::warn!("Bundled font could not be registered, exported text will be missing");
        }
    });
}

fn render_err<E: std::fmt::Debug>(e: E) -> Error {
    Error::Render(format!("{e:?}"))
}

fn rgb(c: Rgb) -> RGBColor {
    RGBColor(c.red, c.green, c.blue)
}

/// Write `figure` to `path`. Width comes from `options`, height is one panel
/// height per panel plus the title band.
pub fn export(figure: &Figure, path: &Path, options: &ExportOptions) -> Result<()> {
    let format = ImageFormat::from_path(path)?;
    ensure_fonts_registered();

    let panel_height = options.panel_height.unwrap_or(figure.panel_height);
    let size = (
        options.width,
        panel_height * figure.panels.len().max(1) as u32 + TITLE_AREA_PX,
    );

    match format {
        ImageFormat::Svg => draw_figure(SVGBackend::new(path, size).into_drawing_area(), figure)?,
        ImageFormat::Bitmap => draw_figure(BitMapBackend::new(path, size).into_drawing_area(), figure)?,
    }

    log::info!(
        "Exported {} ({}x{}) to {}",
        figure.title,
        size.0,
        size.1,
        path.display()
    );
    Ok(())
}

fn draw_figure<DB: DrawingBackend>(root: DrawingArea<DB, Shift>, figure: &Figure) -> Result<()> {
    root.fill(&WHITE).map_err(render_err)?;
    let body = root
        .titled(&figure.title, ("sans-serif", TITLE_FONT_PX))
        .map_err(render_err)?;

    if !figure.panels.is_empty() {
        let areas = body.split_evenly((figure.panels.len(), 1));
        for (area, panel) in areas.iter().zip(&figure.panels) {
            match panel.traces.first().map(|t| &t.geometry) {
                Some(Geometry::Heatmap(matrix)) => draw_heatmap(area, panel, matrix)?,
                _ if figure.kind == ChartKind::Box => draw_boxes(area, panel)?,
                _ => draw_cartesian(area, panel)?,
            }
        }
    }

    root.present().map_err(render_err)?;
    Ok(())
}

/// Common chart frame; the caption is left out for untitled panels.
fn chart_builder<'a, 'b, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    panel: &Panel,
    y_label_px: u32,
) -> ChartBuilder<'a, 'b, DB> {
    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(y_label_px);
    if !panel.title.is_empty() {
        builder.caption(&panel.title, ("sans-serif", 16));
    }
    builder
}

// ---------------------------------------------------------------------------
// Line / scatter / bar / histogram panels
// ---------------------------------------------------------------------------

fn draw_cartesian<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, panel: &Panel) -> Result<()> {
    let (x0, x1, y0, y1) = panel.bounds().unwrap_or((0.0, 1.0, 0.0, 1.0));
    let mut chart = chart_builder(area, panel, 60)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_err)?;

    {
        let mut mesh = chart.configure_mesh();
        if !panel.x_label.is_empty() {
            mesh.x_desc(panel.x_label.as_str());
        }
        if !panel.y_label.is_empty() {
            mesh.y_desc(panel.y_label.as_str());
        }
        mesh.draw().map_err(render_err)?;
    }

    for trace in &panel.traces {
        let color = rgb(trace.color);
        let anno = match &trace.geometry {
            Geometry::Line(pts) => chart.draw_series(LineSeries::new(
                pts.iter().map(|p| (p[0], p[1])),
                color.stroke_width(2),
            )),
            Geometry::Markers(pts) => chart.draw_series(
                pts.iter()
                    .map(|p| Circle::new((p[0], p[1]), 3, color.filled())),
            ),
            Geometry::Bars(bars) => chart.draw_series(bars.iter().map(|b| {
                Rectangle::new([(b[0] - 0.4, 0.0), (b[0] + 0.4, b[1])], color.filled())
            })),
            Geometry::Histogram(bins) => chart.draw_series(bins.iter().map(|b| {
                Rectangle::new([(b.start, 0.0), (b.end, b.count as f64)], color.mix(0.8).filled())
            })),
            Geometry::Box(_) | Geometry::Heatmap(_) => continue,
        }
        .map_err(render_err)?;

        anno.label(trace.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    if !panel.traces.is_empty() {
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.85))
            .draw()
            .map_err(render_err)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Box panel: trace `i` sits at x = i
// ---------------------------------------------------------------------------

fn draw_boxes<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>, panel: &Panel) -> Result<()> {
    let (x0, x1, y0, y1) = panel.bounds().unwrap_or((-0.5, 0.5, 0.0, 1.0));
    let names: Vec<String> = panel.traces.iter().map(|t| t.name.clone()).collect();
    let x_fmt = |v: &f64| label_at(&names, *v);

    let mut chart = chart_builder(area, panel, 60)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len().max(1))
        .x_label_formatter(&x_fmt)
        .y_desc(panel.y_label.as_str())
        .draw()
        .map_err(render_err)?;

    for (i, trace) in panel.traces.iter().enumerate() {
        let Geometry::Box(stats) = &trace.geometry else {
            continue;
        };
        let color = rgb(trace.color);
        let x = i as f64;
        let (left, right) = (x - 0.3, x + 0.3);

        chart
            .draw_series(std::iter::once(Rectangle::new(
                [(left, stats.q1), (right, stats.q3)],
                color.mix(0.3).filled(),
            )))
            .map_err(render_err)?
            .label(trace.name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

        let segments = [
            vec![(left, stats.q1), (right, stats.q1), (right, stats.q3), (left, stats.q3), (left, stats.q1)],
            vec![(left, stats.median), (right, stats.median)],
            vec![(x, stats.q3), (x, stats.upper_whisker)],
            vec![(x, stats.q1), (x, stats.lower_whisker)],
            vec![(x - 0.15, stats.upper_whisker), (x + 0.15, stats.upper_whisker)],
            vec![(x - 0.15, stats.lower_whisker), (x + 0.15, stats.lower_whisker)],
        ];
        chart
            .draw_series(
                segments
                    .into_iter()
                    .map(|path| PathElement::new(path, color.stroke_width(2))),
            )
            .map_err(render_err)?;

        chart
            .draw_series(
                stats
                    .outliers
                    .iter()
                    .map(|&o| Circle::new((x, o), 3, color.stroke_width(1))),
            )
            .map_err(render_err)?;
    }

    if !panel.traces.is_empty() {
        chart
            .configure_series_labels()
            .border_style(BLACK)
            .background_style(WHITE.mix(0.85))
            .draw()
            .map_err(render_err)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Heatmap panel: cell (row, col) centred on (col, row)
// ---------------------------------------------------------------------------

fn draw_heatmap<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    matrix: &CorrelationMatrix,
) -> Result<()> {
    let n = matrix.labels.len().max(1);
    let span = -0.5..(n as f64 - 0.5);
    let fmt = |v: &f64| label_at(&matrix.labels, *v);

    let mut chart = chart_builder(area, panel, 120)
        .build_cartesian_2d(span.clone(), span)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&fmt)
        .y_label_formatter(&fmt)
        .draw()
        .map_err(render_err)?;

    let cells: Vec<(usize, usize, f64)> = matrix
        .values
        .iter()
        .enumerate()
        .flat_map(|(r, row)| row.iter().enumerate().map(move |(c, &v)| (r, c, v)))
        .collect();

    chart
        .draw_series(cells.iter().map(|&(r, c, v)| {
            let (x, y) = (c as f64, r as f64);
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                rgb(color::viridis(v, -1.0, 1.0)).filled(),
            )
        }))
        .map_err(render_err)?;

    chart
        .draw_series(cells.iter().filter(|(_, _, v)| v.is_finite()).map(|&(r, c, v)| {
            Text::new(
                format!("{v:.2}"),
                (c as f64 - 0.15, r as f64),
                ("sans-serif", 12).into_font().color(&BLACK),
            )
        }))
        .map_err(render_err)?;
    Ok(())
}
